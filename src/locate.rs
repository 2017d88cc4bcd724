//! Input discovery.
//!
//! Turns an optional explicit path into the ordered list of PDFs a run will
//! process.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::detect::has_pdf_extension;
use crate::error::{Error, Result};

/// Locates candidate PDFs for a run.
#[derive(Debug, Clone)]
pub struct Locator {
    input_dir: PathBuf,
}

impl Locator {
    /// Create a locator scanning `input_dir` when no explicit path is given.
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
        }
    }

    /// Create a locator from a run configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.input_dir())
    }

    /// Directory scanned by [`Locator::locate`] without an explicit path.
    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    /// Resolve the PDFs to process.
    ///
    /// With an explicit path the result has exactly one element; the path must
    /// carry a `.pdf` extension and name an existing file. Without one, the
    /// input directory is scanned (non-recursively) and the result is never
    /// empty.
    ///
    /// # Arguments
    /// * `explicit` - A PDF named by the user, or `None` to scan the input directory
    ///
    /// # Returns
    /// * `Ok(paths)` - The candidates, in directory-listing order for a scan
    /// * `Err(Error::InvalidFormat)` / `Err(Error::NotFound)` for a bad explicit path
    /// * `Err(Error::NoInput)` if the scan found nothing
    ///
    /// # Example
    /// ```no_run
    /// use pdfextract::Locator;
    ///
    /// let pdfs = Locator::new("data/input").locate(None)?;
    /// println!("{} PDFs to process", pdfs.len());
    /// # Ok::<(), pdfextract::Error>(())
    /// ```
    pub fn locate(&self, explicit: Option<&Path>) -> Result<Vec<PathBuf>> {
        match explicit {
            Some(path) => validate(path).map(|path| vec![path]),
            None => {
                let found = self.candidates();
                if found.is_empty() {
                    return Err(Error::NoInput(self.input_dir.clone()));
                }
                log::debug!("found {} PDFs in {}", found.len(), self.input_dir.display());
                Ok(found)
            }
        }
    }

    /// PDFs in the input directory, in directory-listing order.
    ///
    /// A missing or unreadable directory yields an empty list.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let entries = match fs::read_dir(&self.input_dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("cannot list {}: {}", self.input_dir.display(), e);
                return Vec::new();
            }
        };

        entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| has_pdf_extension(path) && path.is_file())
            .collect()
    }
}

/// Check an explicitly supplied path.
///
/// The extension is checked first, so a missing `notes.txt` is reported as
/// [`Error::InvalidFormat`] rather than [`Error::NotFound`].
///
/// # Arguments
/// * `path` - Path given on the command line or in the menu
///
/// # Returns
/// * `Ok(path)` if it names an existing `.pdf` file
/// * `Err(Error::InvalidFormat)` if the extension is not `.pdf`
/// * `Err(Error::NotFound)` if no such file exists
pub fn validate(path: &Path) -> Result<PathBuf> {
    if !has_pdf_extension(path) {
        return Err(Error::InvalidFormat(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    Ok(path.to_path_buf())
}
