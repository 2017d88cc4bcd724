//! Extraction results tied to one source document.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Annotation;

/// A recoverable problem met while extracting: a page or an annotation that
/// could not be read and was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionWarning {
    /// Page index (0-based)
    pub page: u32,

    /// Position of the annotation in the page's list, for annotation warnings
    pub annotation: Option<usize>,

    /// What went wrong
    pub message: String,
}

impl ExtractionWarning {
    /// Warning about a whole page.
    pub fn page(page: u32, message: impl Into<String>) -> Self {
        Self {
            page,
            annotation: None,
            message: message.into(),
        }
    }

    /// Warning about one annotation on a page.
    pub fn annotation(page: u32, index: usize, message: impl Into<String>) -> Self {
        Self {
            page,
            annotation: Some(index),
            message: message.into(),
        }
    }
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.annotation {
            Some(index) => write!(
                f,
                "page {}, annotation {}: {}",
                self.page, index, self.message
            ),
            None => write!(f, "page {}: {}", self.page, self.message),
        }
    }
}

/// Text extracted from every page of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct TextExtraction {
    /// Source file name, without directory
    pub source: String,

    /// Concatenated page text
    pub text: String,

    /// Number of pages read
    pub page_count: u32,

    /// Pages that contributed empty text because they could not be decoded
    pub warnings: Vec<ExtractionWarning>,
}

/// Annotations collected from every page of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationExtraction {
    /// Source file name, without directory
    pub source: String,

    /// Records in page order, then discovery order within a page
    pub annotations: Vec<Annotation>,

    /// Number of pages read
    pub page_count: u32,

    /// Annotations or pages that were skipped
    pub warnings: Vec<ExtractionWarning>,
}

impl AnnotationExtraction {
    /// Number of annotations extracted.
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Whether no annotation was found.
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Count of annotations per type label, in first-seen order.
    pub fn type_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for annot in &self.annotations {
            let label = annot.kind.label();
            match counts.iter_mut().find(|(known, _)| known == label) {
                Some((_, count)) => *count += 1,
                None => counts.push((label.to_string(), 1)),
            }
        }
        counts
    }
}
