//! Extraction model types.
//!
//! Records produced by the extractors and consumed by the output writer and
//! the analyzer. Everything here is plain data: it holds no reference to the
//! PDF document it came from.

mod annotation;
mod extraction;

pub use annotation::{Annotation, AnnotationKind, Rect};
pub use extraction::{AnnotationExtraction, ExtractionWarning, TextExtraction};
