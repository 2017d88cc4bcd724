//! Text and annotation extractors.
//!
//! Both extractors are read-only passes over an open [`PdfBackend`]. They are
//! lenient: a page or annotation that cannot be read becomes an
//! [`ExtractionWarning`](crate::model::ExtractionWarning) on the result and
//! the pass continues.

mod annotations;
mod text;

pub use annotations::extract_annotations;
pub use text::{extract_text, page_header};
