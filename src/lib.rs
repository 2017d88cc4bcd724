//! # pdfextract
//!
//! Extract plain text and annotations (comments, highlights, ...) from PDF
//! files and write them to a predictable output layout.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfextract::{Config, Mode, Pipeline};
//!
//! let config = Config::new()
//!     .with_input_dir("data/input")
//!     .with_output_dir("data/output");
//!
//! // Every PDF in data/input → data/output/annotations/<stem>_annotations.json
//! let report = Pipeline::new(config).run(Mode::Annotations, None);
//! std::process::exit(report.exit_code());
//! ```
//!
//! ## Working with a single document
//!
//! ```no_run
//! use pdfextract::{extract_annotations, PdfDocument};
//!
//! let doc = PdfDocument::open("paper.pdf")?;
//! for annot in extract_annotations(&doc).annotations {
//!     println!("page {} {}: {}", annot.page, annot.kind, annot.content);
//! }
//! # Ok::<(), pdfextract::Error>(())
//! ```
//!
//! The PDF object model comes from [`lopdf`]; this crate only walks it.

pub mod analyze;
pub mod config;
pub mod detect;
pub mod error;
pub mod extract;
pub mod locate;
pub mod model;
pub mod output;
pub mod parser;
pub mod pipeline;

// Re-export commonly used types
pub use analyze::{AnalysisReport, Analyzer, AnnotationStats, Highlight};
pub use config::{Config, TextOptions};
pub use detect::{detect_format_from_bytes, detect_format_from_path, has_pdf_extension, PdfFormat};
pub use error::{Error, Result};
pub use extract::{extract_annotations, extract_text};
pub use locate::Locator;
pub use model::{
    Annotation, AnnotationExtraction, AnnotationKind, ExtractionWarning, Rect, TextExtraction,
};
pub use output::{output_stem, read_annotations, OutputWriter};
pub use parser::{PdfBackend, PdfDocument};
pub use pipeline::{Failure, Mode, Pipeline, RunReport, RunState};

use std::path::Path;

/// Extract the text of a PDF file with default options.
///
/// # Example
///
/// ```no_run
/// let text = pdfextract::text_from_file("document.pdf")?;
/// println!("{}", text.text);
/// # Ok::<(), pdfextract::Error>(())
/// ```
pub fn text_from_file<P: AsRef<Path>>(path: P) -> Result<TextExtraction> {
    let doc = PdfDocument::open(path)?;
    Ok(extract_text(&doc, &TextOptions::default()))
}

/// Extract the annotations of a PDF file.
pub fn annotations_from_file<P: AsRef<Path>>(path: P) -> Result<AnnotationExtraction> {
    let doc = PdfDocument::open(path)?;
    Ok(extract_annotations(&doc))
}

/// Extract the text of a PDF held in memory.
pub fn text_from_bytes(data: &[u8], source: &str) -> Result<TextExtraction> {
    let doc = PdfDocument::from_bytes(data, source)?;
    Ok(extract_text(&doc, &TextOptions::default()))
}

/// Extract the annotations of a PDF held in memory.
pub fn annotations_from_bytes(data: &[u8], source: &str) -> Result<AnnotationExtraction> {
    let doc = PdfDocument::from_bytes(data, source)?;
    Ok(extract_annotations(&doc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_empty_data() {
        assert!(text_from_bytes(&[], "empty.pdf").is_err());
        assert!(annotations_from_bytes(&[], "empty.pdf").is_err());
    }

    #[test]
    fn test_bytes_unknown_magic() {
        let data = [0xFF, 0xFE, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        assert!(matches!(
            text_from_bytes(&data, "junk.pdf"),
            Err(Error::DocumentOpen { .. })
        ));
    }

    #[test]
    fn test_file_missing() {
        assert!(text_from_file("no/such/file.pdf").is_err());
    }
}
