//! Plain text extraction.

use crate::config::TextOptions;
use crate::model::{ExtractionWarning, TextExtraction};
use crate::parser::PdfBackend;

/// Header written before a page when page headers are enabled.
pub fn page_header(page: u32) -> String {
    format!("=== PAGE {} ===\n\n", page + 1)
}

/// Extract the text layer of every page, in page order.
///
/// Page segments are joined with `options.separator`. Text is passed through
/// as the PDF library reports it. A page that fails to decode contributes an
/// empty segment and a warning.
pub fn extract_text<B: PdfBackend + ?Sized>(doc: &B, options: &TextOptions) -> TextExtraction {
    let page_count = doc.page_count();
    let mut segments = Vec::with_capacity(page_count as usize);
    let mut warnings = Vec::new();

    for page in 0..page_count {
        let text = match doc.page_text(page) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("{}: page {}: {}", doc.source_name(), page, e);
                warnings.push(ExtractionWarning::page(page, e.to_string()));
                String::new()
            }
        };

        if options.page_headers {
            segments.push(format!("{}{}", page_header(page), text));
        } else {
            segments.push(text);
        }
    }

    TextExtraction {
        source: doc.source_name().to_string(),
        text: segments.join(&options.separator),
        page_count,
        warnings,
    }
}
