//! Run configuration.

use std::path::{Path, PathBuf};

/// Default directory scanned for input PDFs.
pub const DEFAULT_INPUT_DIR: &str = "data/input";

/// Default root for text, annotation and report outputs.
pub const DEFAULT_OUTPUT_DIR: &str = "data/output";

/// Configuration shared by the locator, the extractors and the writer.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory scanned when no explicit PDF is given
    pub input_dir: PathBuf,

    /// Root directory for `text/`, `annotations/` and `reports/`
    pub output_dir: PathBuf,

    /// Text extraction options
    pub text: TextOptions,
}

impl Config {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input directory.
    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the page separator used by the text extractor.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.text.separator = separator.into();
        self
    }

    /// Prefix every page with a `=== PAGE n ===` header.
    pub fn with_page_headers(mut self, enabled: bool) -> Self {
        self.text.page_headers = enabled;
        self
    }

    /// Input directory as a path.
    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    /// Output directory as a path.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            text: TextOptions::default(),
        }
    }
}

/// Options for the text extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextOptions {
    /// Inserted between consecutive page segments
    pub separator: String,

    /// Whether each page segment starts with `=== PAGE n ===`
    pub page_headers: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            separator: "\n".to_string(),
            page_headers: false,
        }
    }
}
