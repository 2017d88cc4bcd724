//! Annotation extraction.

use crate::model::{Annotation, AnnotationExtraction, AnnotationKind, ExtractionWarning};
use crate::parser::{PdfBackend, RawAnnotation};

/// Type reported for annotations that carry no `/Subtype`.
const UNKNOWN_SUBTYPE: &str = "Unknown";

/// Collect every annotation of the document.
///
/// Pages are visited in ascending order and each page's annotations in their
/// `/Annots` order; the result keeps that order. Unreadable entries (and
/// pages whose annotation list cannot be read) are skipped with a warning.
pub fn extract_annotations<B: PdfBackend + ?Sized>(doc: &B) -> AnnotationExtraction {
    let page_count = doc.page_count();
    let mut annotations = Vec::new();
    let mut warnings = Vec::new();

    for page in 0..page_count {
        let entries = match doc.page_annotations(page) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("{}: page {}: {}", doc.source_name(), page, e);
                warnings.push(ExtractionWarning::page(page, e.to_string()));
                continue;
            }
        };

        for (index, entry) in entries.into_iter().enumerate() {
            match entry {
                Ok(raw) => annotations.push(to_record(page, raw)),
                Err(reason) => {
                    log::warn!(
                        "{}: page {}, annotation {} skipped: {}",
                        doc.source_name(),
                        page,
                        index,
                        reason
                    );
                    warnings.push(ExtractionWarning::annotation(page, index, reason));
                }
            }
        }
    }

    log::debug!(
        "{}: {} annotations on {} pages",
        doc.source_name(),
        annotations.len(),
        page_count
    );

    AnnotationExtraction {
        source: doc.source_name().to_string(),
        annotations,
        page_count,
        warnings,
    }
}

fn to_record(page: u32, raw: RawAnnotation) -> Annotation {
    let kind = AnnotationKind::from_subtype(raw.subtype.as_deref().unwrap_or(UNKNOWN_SUBTYPE));
    Annotation {
        page,
        kind,
        content: raw.contents.unwrap_or_default(),
        author: raw.author,
        rect: raw.rect,
    }
}
