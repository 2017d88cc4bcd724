//! Output layout and writing.
//!
//! ```text
//! {output_dir}/text/{stem}.txt
//! {output_dir}/annotations/{stem}_annotations.json
//! {output_dir}/reports/{stem}/...
//! ```
//!
//! Output paths are a pure function of the source file name, so re-running
//! overwrites earlier results instead of adding new files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::analyze::AnalysisReport;
use crate::error::{Error, Result};
use crate::model::{Annotation, AnnotationExtraction, TextExtraction};

/// Subdirectory for text results.
pub const TEXT_DIR: &str = "text";

/// Subdirectory for annotation results.
pub const ANNOTATIONS_DIR: &str = "annotations";

/// Subdirectory for analysis reports.
pub const REPORTS_DIR: &str = "reports";

/// Suffix appended to the stem of annotation files.
pub const ANNOTATIONS_SUFFIX: &str = "_annotations";

/// Derive the output stem from a source file name.
///
/// Strips a trailing `.pdf` (any case); other names lose their last
/// extension, if any. Directory components are ignored.
///
/// # Example
/// ```
/// use pdfextract::output_stem;
///
/// assert_eq!(output_stem("Report.PDF"), "Report");
/// assert_eq!(output_stem("in/my.notes.pdf"), "my.notes");
/// ```
pub fn output_stem(source: &str) -> String {
    let name = Path::new(source)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string());

    let len = name.len();
    if len > 4 && name.is_char_boundary(len - 4) && name[len - 4..].eq_ignore_ascii_case(".pdf") {
        return name[..len - 4].to_string();
    }

    Path::new(&name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or(name)
}

/// Writes extraction results under an output root.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    root: PathBuf,
}

impl OutputWriter {
    /// Create a writer rooted at `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: output_dir.into(),
        }
    }

    /// Where the text of `source` is written.
    pub fn text_path(&self, source: &str) -> PathBuf {
        self.root
            .join(TEXT_DIR)
            .join(format!("{}.txt", output_stem(source)))
    }

    /// Where the annotations of `source` are written.
    pub fn annotations_path(&self, source: &str) -> PathBuf {
        self.root
            .join(ANNOTATIONS_DIR)
            .join(format!("{}{}.json", output_stem(source), ANNOTATIONS_SUFFIX))
    }

    /// Directory holding the report for `source`.
    ///
    /// Accepts either the PDF name or an annotations file name; the
    /// `_annotations` suffix is dropped so both map to the same directory.
    pub fn report_dir(&self, source: &str) -> PathBuf {
        let stem = output_stem(source);
        let stem = stem.strip_suffix(ANNOTATIONS_SUFFIX).unwrap_or(&stem);
        self.root.join(REPORTS_DIR).join(stem)
    }

    /// Write extracted text as UTF-8, replacing any earlier file.
    pub fn write_text(&self, result: &TextExtraction) -> Result<PathBuf> {
        let path = self.text_path(&result.source);
        write_file(&path, result.text.as_bytes())?;
        log::info!("wrote {}", path.display());
        Ok(path)
    }

    /// Write annotations as a pretty-printed JSON array, replacing any
    /// earlier file.
    pub fn write_annotations(&self, result: &AnnotationExtraction) -> Result<PathBuf> {
        let path = self.annotations_path(&result.source);
        let json = serde_json::to_string_pretty(&result.annotations)?;
        write_file(&path, json.as_bytes())?;
        log::info!("wrote {} ({} annotations)", path.display(), result.len());
        Ok(path)
    }

    /// Write the report bundle and return its directory.
    pub fn write_report(&self, report: &AnalysisReport) -> Result<PathBuf> {
        let dir = self.report_dir(&report.source);

        let statistics = serde_json::to_string_pretty(&report.statistics)?;
        write_file(&dir.join("statistics.json"), statistics.as_bytes())?;

        let highlights = serde_json::to_string_pretty(&report.highlights)?;
        write_file(&dir.join("highlights.json"), highlights.as_bytes())?;

        let by_page = serde_json::to_string_pretty(&report.by_page)?;
        write_file(&dir.join("annotations_by_page.json"), by_page.as_bytes())?;

        write_file(&dir.join("report.txt"), report.to_text().as_bytes())?;

        log::info!("wrote report to {}", dir.display());
        Ok(dir)
    }
}

/// Read an annotations file written by [`OutputWriter::write_annotations`].
///
/// # Arguments
/// * `path` - A `<stem>_annotations.json` file
///
/// # Returns
/// * `Ok(records)` in file order
/// * `Err(Error::NotFound)` if the file does not exist
/// * `Err(Error::Json)` if it is not an annotation array
///
/// # Example
/// ```no_run
/// let annotations = pdfextract::read_annotations("data/output/annotations/paper_annotations.json")?;
/// println!("{} annotations", annotations.len());
/// # Ok::<(), pdfextract::Error>(())
/// ```
pub fn read_annotations<P: AsRef<Path>>(path: P) -> Result<Vec<Annotation>> {
    let path = path.as_ref();
    let data = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })?;
    Ok(serde_json::from_str(&data)?)
}

/// Create the parent directory (idempotent) and write `data` to `path`.
fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| Error::WritePermission {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, data).map_err(|source| Error::WritePermission {
        path: path.to_path_buf(),
        source,
    })
}
