//! PDF access layer.

mod backend;
mod pdf_document;

pub use backend::{decode_text_string, AnnotationRead, PdfBackend, RawAnnotation};
pub use pdf_document::PdfDocument;
