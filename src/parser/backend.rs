//! PDF backend abstraction layer.
//!
//! Extractors work against the [`PdfBackend`] trait so they never see
//! concrete PDF library types. [`PdfDocument`](super::PdfDocument) is the
//! lopdf-backed implementation; tests supply their own.

use crate::error::Result;
use crate::model::Rect;

/// An annotation as read from a page dictionary, before it is tied to a page.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAnnotation {
    /// `/Subtype` name, if present
    pub subtype: Option<String>,
    /// `/Contents`, if present
    pub contents: Option<String>,
    /// `/T` (author), if present
    pub author: Option<String>,
    /// `/Rect`
    pub rect: Rect,
}

/// Outcome of reading one entry of a page's annotation list.
///
/// `Err` carries a description of why the entry was unreadable.
pub type AnnotationRead = std::result::Result<RawAnnotation, String>;

/// Abstract interface for an open PDF document.
///
/// Pages are addressed by 0-based index in document order.
pub trait PdfBackend {
    /// File name the document was opened from (no directory).
    fn source_name(&self) -> &str;

    /// Number of pages.
    fn page_count(&self) -> u32;

    /// Text layer of one page, exactly as the library reports it.
    fn page_text(&self, page: u32) -> Result<String>;

    /// Annotation list of one page, in `/Annots` order.
    ///
    /// The outer `Err` means the list itself could not be read; an inner
    /// `Err` marks a single unreadable entry.
    fn page_annotations(&self, page: u32) -> Result<Vec<AnnotationRead>>;
}

/// Decode a PDF text string.
///
/// Handles UTF-16BE with byte-order mark, then UTF-8, then falls back to
/// Latin-1 so decoding never fails.
pub fn decode_text_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}
