//! Annotation statistics and reports.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};

use crate::model::{Annotation, AnnotationKind};

/// Author bucket for annotations without `/T`.
const UNKNOWN_AUTHOR: &str = "Unknown";

/// Summary statistics over a set of annotations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationStats {
    /// Number of annotations
    pub total_annotations: usize,

    /// Number of distinct pages carrying at least one annotation
    pub pages_with_annotations: usize,

    /// Count per type label, in first-seen order (a JSON object)
    #[serde(serialize_with = "serialize_counts")]
    pub annotation_types: Vec<(String, usize)>,

    /// Count per author, in first-seen order (a JSON object)
    #[serde(serialize_with = "serialize_counts")]
    pub authors: Vec<(String, usize)>,

    /// Page (0-based) with the most annotations; earliest page wins ties
    pub page_with_most_annotations: Option<u32>,

    /// Most frequent type label; first-seen type wins ties
    pub most_common_type: Option<String>,
}

impl AnnotationStats {
    /// Number of annotations of type `label`.
    pub fn type_count(&self, label: &str) -> usize {
        count_of(&self.annotation_types, label)
    }

    /// Number of annotations by `author` (`"Unknown"` for none).
    pub fn author_count(&self, author: &str) -> usize {
        count_of(&self.authors, author)
    }
}

fn count_of(counts: &[(String, usize)], key: &str) -> usize {
    counts
        .iter()
        .find(|(known, _)| known == key)
        .map_or(0, |(_, count)| *count)
}

#[allow(clippy::ptr_arg)]
fn serialize_counts<S: Serializer>(
    counts: &Vec<(String, usize)>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_map(counts.iter().map(|(key, count)| (key, count)))
}

/// A highlight and the note attached to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    /// Page index (0-based)
    pub page: u32,
    /// Text content of the highlight annotation
    pub comment: String,
    /// Author, if the annotation names one
    pub author: Option<String>,
    /// Highlighted area
    pub rect: [f32; 4],
}

/// Everything written to a report directory.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Name of the PDF or annotations file the report describes
    pub source: String,
    pub generated_at: DateTime<Local>,
    pub statistics: AnnotationStats,
    pub highlights: Vec<Highlight>,
    /// Annotations grouped by page, keyed by 0-based page index
    pub by_page: BTreeMap<u32, Vec<Annotation>>,
}

impl AnalysisReport {
    /// Render the human-readable report.
    pub fn to_text(&self) -> String {
        let stats = &self.statistics;
        let mut out = String::new();

        out.push_str("ANNOTATION REPORT\n");
        out.push_str(&format!(
            "Date: {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str(&format!("File: {}\n\n", self.source));

        out.push_str("GENERAL STATISTICS\n");
        out.push_str(&format!("Total annotations: {}\n", stats.total_annotations));
        out.push_str(&format!(
            "Pages with annotations: {}\n",
            stats.pages_with_annotations
        ));
        let busiest = stats
            .page_with_most_annotations
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!("Page with most annotations: {}\n", busiest));
        out.push_str(&format!(
            "Most common annotation type: {}\n\n",
            stats.most_common_type.as_deref().unwrap_or("-")
        ));

        out.push_str("ANNOTATION TYPES\n");
        for (kind, count) in &stats.annotation_types {
            out.push_str(&format!("- {}: {}\n", kind, count));
        }
        out.push('\n');

        out.push_str("AUTHORS\n");
        for (author, count) in &stats.authors {
            out.push_str(&format!("- {}: {} annotations\n", author, count));
        }

        if !self.highlights.is_empty() {
            out.push_str(&format!("\nHIGHLIGHTS ({})\n", self.highlights.len()));
            for (i, highlight) in self.highlights.iter().enumerate() {
                out.push_str(&format!("{}. Page {}\n", i + 1, highlight.page));
                if !highlight.comment.is_empty() {
                    out.push_str(&format!("   Comment: {}\n", highlight.comment));
                }
            }
        }

        out
    }
}

/// Computes statistics over an annotation slice.
pub struct Analyzer<'a> {
    annotations: &'a [Annotation],
}

impl<'a> Analyzer<'a> {
    pub fn new(annotations: &'a [Annotation]) -> Self {
        Self { annotations }
    }

    /// Summary statistics.
    pub fn statistics(&self) -> AnnotationStats {
        let types = first_seen_counts(self.annotations.iter().map(|a| a.kind.label().to_string()));
        let authors = first_seen_counts(self.annotations.iter().map(|a| {
            a.author
                .clone()
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
        }));
        let pages = first_seen_counts(self.annotations.iter().map(|a| a.page));

        // Annotations arrive page-ascending, so first-seen is the earliest page
        let page_with_most_annotations = most_frequent(&pages).copied();
        let most_common_type = most_frequent(&types).cloned();

        AnnotationStats {
            total_annotations: self.annotations.len(),
            pages_with_annotations: pages.len(),
            annotation_types: types,
            authors,
            page_with_most_annotations,
            most_common_type,
        }
    }

    /// Highlight annotations, in document order.
    pub fn highlights(&self) -> Vec<Highlight> {
        self.annotations
            .iter()
            .filter(|a| a.kind == AnnotationKind::Highlight)
            .map(|a| Highlight {
                page: a.page,
                comment: a.content.clone(),
                author: a.author.clone(),
                rect: a.rect,
            })
            .collect()
    }

    /// Annotations grouped by page.
    pub fn by_page(&self) -> BTreeMap<u32, Vec<Annotation>> {
        let mut grouped: BTreeMap<u32, Vec<Annotation>> = BTreeMap::new();
        for annot in self.annotations {
            grouped.entry(annot.page).or_default().push(annot.clone());
        }
        grouped
    }

    /// Build the full report for `source`.
    pub fn report(&self, source: impl Into<String>) -> AnalysisReport {
        AnalysisReport {
            source: source.into(),
            generated_at: Local::now(),
            statistics: self.statistics(),
            highlights: self.highlights(),
            by_page: self.by_page(),
        }
    }
}

fn first_seen_counts<K: PartialEq>(keys: impl Iterator<Item = K>) -> Vec<(K, usize)> {
    let mut counts: Vec<(K, usize)> = Vec::new();
    for key in keys {
        match counts.iter_mut().find(|(known, _)| *known == key) {
            Some((_, count)) => *count += 1,
            None => counts.push((key, 1)),
        }
    }
    counts
}

/// Key with the highest count; the earliest key wins ties.
fn most_frequent<K>(counts: &[(K, usize)]) -> Option<&K> {
    let mut best: Option<&(K, usize)> = None;
    for entry in counts {
        if best.map_or(true, |(_, count)| entry.1 > *count) {
            best = Some(entry);
        }
    }
    best.map(|(key, _)| key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Annotation> {
        let rect = [0.0, 0.0, 1.0, 1.0];
        vec![
            Annotation::new(0, AnnotationKind::Comment, rect).with_author("Ana"),
            Annotation::new(2, AnnotationKind::Highlight, rect)
                .with_author("Ana")
                .with_content("important"),
            Annotation::new(2, AnnotationKind::Highlight, rect),
            Annotation::new(2, AnnotationKind::Comment, rect).with_author("Luis"),
            Annotation::new(4, AnnotationKind::Underline, rect),
        ]
    }

    #[test]
    fn test_statistics() {
        let annotations = sample();
        let stats = Analyzer::new(&annotations).statistics();

        assert_eq!(stats.total_annotations, 5);
        assert_eq!(stats.pages_with_annotations, 3);
        assert_eq!(stats.type_count("comment"), 2);
        assert_eq!(stats.type_count("highlight"), 2);
        assert_eq!(stats.type_count("underline"), 1);
        assert_eq!(stats.type_count("ink"), 0);
        assert_eq!(stats.author_count("Ana"), 2);
        assert_eq!(stats.author_count("Unknown"), 2);
        assert_eq!(stats.page_with_most_annotations, Some(2));
        // comment and highlight tie; comment was seen first
        assert_eq!(stats.most_common_type.as_deref(), Some("comment"));
    }

    #[test]
    fn test_counts_in_first_seen_order() {
        let annotations = sample();
        let stats = Analyzer::new(&annotations).statistics();

        let types: Vec<&str> = stats.annotation_types.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(types, vec!["comment", "highlight", "underline"]);
        let authors: Vec<&str> = stats.authors.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(authors, vec!["Ana", "Unknown", "Luis"]);

        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains(r#""annotation_types":{"comment":2,"highlight":2,"underline":1}"#));

        let text = Analyzer::new(&annotations).report("paper.pdf").to_text();
        let ana = text.find("- Ana:").unwrap();
        let unknown = text.find("- Unknown:").unwrap();
        let luis = text.find("- Luis:").unwrap();
        assert!(ana < unknown && unknown < luis);
    }

    #[test]
    fn test_empty_statistics() {
        let stats = Analyzer::new(&[]).statistics();
        assert_eq!(stats.total_annotations, 0);
        assert_eq!(stats.pages_with_annotations, 0);
        assert_eq!(stats.page_with_most_annotations, None);
        assert_eq!(stats.most_common_type, None);
    }

    #[test]
    fn test_highlights() {
        let annotations = sample();
        let highlights = Analyzer::new(&annotations).highlights();
        assert_eq!(highlights.len(), 2);
        assert_eq!(highlights[0].comment, "important");
        assert_eq!(highlights[0].author.as_deref(), Some("Ana"));
    }

    #[test]
    fn test_by_page() {
        let annotations = sample();
        let grouped = Analyzer::new(&annotations).by_page();
        assert_eq!(grouped.keys().copied().collect::<Vec<_>>(), vec![0, 2, 4]);
        assert_eq!(grouped[&2].len(), 3);
    }

    #[test]
    fn test_report_text() {
        let annotations = sample();
        let report = Analyzer::new(&annotations).report("paper.pdf");
        let text = report.to_text();

        assert!(text.starts_with("ANNOTATION REPORT\n"));
        assert!(text.contains("File: paper.pdf"));
        assert!(text.contains("Total annotations: 5"));
        assert!(text.contains("- highlight: 2"));
        assert!(text.contains("- Luis: 1 annotations"));
        assert!(text.contains("HIGHLIGHTS (2)"));
        assert!(text.contains("   Comment: important"));
    }
}
