//! PDF file recognition: extension checks and header sniffing.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PDF format information read from the file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFormat {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
    /// Byte offset of the `%PDF-` marker (non-zero when the file has a preamble)
    pub header_offset: usize,
}

impl std::fmt::Display for PdfFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Readers accept the header anywhere in the first 1024 bytes.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Check whether a path carries a `.pdf` extension (case-insensitive).
///
/// This is a purely lexical check; the file is not touched.
///
/// # Example
/// ```
/// use pdfextract::detect::has_pdf_extension;
///
/// assert!(has_pdf_extension("Report.PDF"));
/// assert!(!has_pdf_extension("notes.txt"));
/// ```
pub fn has_pdf_extension<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Detect PDF format from a file path.
///
/// Reads at most the first kilobyte.
///
/// # Arguments
/// * `path` - Path to the PDF file
///
/// # Returns
/// * `Ok(PdfFormat)` if a `%PDF-x.y` header was found
/// * `Err(Error::DocumentOpen)` if there is no header, like any other
///   unopenable document
/// * `Err(Error::Io)` if the file cannot be read
///
/// # Example
/// ```no_run
/// use pdfextract::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("document.pdf").unwrap();
/// println!("PDF version: {}", format.version);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<PdfFormat> {
    let path = path.as_ref();
    let mut header = Vec::with_capacity(HEADER_SEARCH_WINDOW);
    File::open(path)?
        .take(HEADER_SEARCH_WINDOW as u64)
        .read_to_end(&mut header)?;

    detect_format_from_bytes(&header)
        .ok_or_else(|| Error::document_open(path, "missing %PDF- header"))
}

/// Detect PDF format from the leading bytes of a file.
///
/// # Arguments
/// * `data` - Leading bytes of the file; only the first kilobyte is searched
///
/// # Returns
/// * `Some(PdfFormat)` with the version and marker offset
/// * `None` when no valid `%PDF-x.y` marker is present
pub fn detect_format_from_bytes(data: &[u8]) -> Option<PdfFormat> {
    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW)];
    let offset = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)?;

    let start = offset + PDF_MAGIC.len();
    let version_bytes = window.get(start..start + VERSION_LEN)?;
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return None;
    }

    Some(PdfFormat {
        version,
        header_offset: offset,
    })
}

/// Check if a version string looks like "1.x" or "2.x".
fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}
