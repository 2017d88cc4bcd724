//! Error types for pdfextract library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdfextract operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while locating, extracting, or writing.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error outside of output writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No candidate PDF was found in the input directory.
    #[error("No PDF files found in {}", .0.display())]
    NoInput(PathBuf),

    /// An explicitly supplied path does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// An explicitly supplied path does not have a `.pdf` extension.
    #[error("Not a PDF file (expected .pdf extension): {}", .0.display())]
    InvalidFormat(PathBuf),

    /// The PDF library could not open or parse the document.
    #[error("Cannot open {}: {reason}", path.display())]
    DocumentOpen {
        /// Path of the document (empty for in-memory sources)
        path: PathBuf,
        /// Reason reported by the PDF library
        reason: String,
    },

    /// A single page of an open document could not be read.
    #[error("Cannot read page {page}: {reason}")]
    PageRead {
        /// Page index (0-based)
        page: u32,
        /// Reason reported by the PDF library
        reason: String,
    },

    /// The output location could not be written.
    #[error("Cannot write {}: {source}", path.display())]
    WritePermission {
        /// Target file or directory
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// Annotation JSON could not be serialized or parsed.
    #[error("JSON error: {0}")]
    Json(String),
}

impl Error {
    /// Build a [`Error::DocumentOpen`] for `path`.
    pub fn document_open(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::DocumentOpen {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error means "nothing to process".
    pub fn is_no_input(&self) -> bool {
        matches!(self, Error::NoInput(_) | Error::NotFound(_))
    }

    /// Whether this error is scoped to a single file, so a batch may continue.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Error::DocumentOpen { .. } | Error::WritePermission { .. } | Error::Json(_)
        )
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => {
                Error::document_open(PathBuf::new(), "document is encrypted")
            }
            _ => Error::document_open(PathBuf::new(), err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}
