//! Run orchestration.
//!
//! A run moves through
//! `Idle → Locating → Extracting → Writing → Done`, looping between
//! `Extracting` and `Writing` once per candidate. `Failed` is reachable from
//! `Locating` (nothing to process) and from `Extracting`/`Writing` when a
//! candidate could not be opened or written. Per-file failures
//! ([`Error::is_per_file`]) do not stop the batch: the remaining candidates
//! are still processed and the run ends in `Failed` only after all of them
//! have been tried. Any other error ends the run at once.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::analyze::Analyzer;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::extract::{extract_annotations, extract_text};
use crate::locate::Locator;
use crate::model::{AnnotationExtraction, ExtractionWarning};
use crate::output::{read_annotations, OutputWriter};
use crate::parser::PdfDocument;

/// What to extract from each candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Plain text only
    Text,
    /// Annotations only
    Annotations,
    /// Text, annotations and an annotation report, from a single open
    All,
}

impl Mode {
    fn wants_text(self) -> bool {
        matches!(self, Mode::Text | Mode::All)
    }

    fn wants_annotations(self) -> bool {
        matches!(self, Mode::Annotations | Mode::All)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Text => "text",
            Mode::Annotations => "annotations",
            Mode::All => "all",
        })
    }
}

/// Run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Locating,
    Extracting,
    Writing,
    Done,
    Failed,
}

impl RunState {
    /// Whether `self → next` is a legal step.
    pub fn can_transition_to(self, next: RunState) -> bool {
        use RunState::*;
        matches!(
            (self, next),
            (Idle, Locating)
                | (Locating, Extracting)
                | (Locating, Failed)
                | (Extracting, Writing)
                | (Extracting, Extracting)
                | (Extracting, Failed)
                | (Writing, Extracting)
                | (Writing, Done)
                | (Writing, Failed)
        )
    }
}

/// A candidate that could not be processed (or one of its outputs that could
/// not be written).
#[derive(Debug)]
pub struct Failure {
    pub path: PathBuf,
    pub error: Error,
}

/// A warning together with the file it came from.
#[derive(Debug, Clone)]
pub struct SourcedWarning {
    pub source: String,
    pub warning: ExtractionWarning,
}

impl fmt::Display for SourcedWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.warning)
    }
}

/// Outcome of one run.
#[derive(Debug)]
pub struct RunReport {
    pub mode: Mode,
    pub state: RunState,
    /// PDFs the locator produced
    pub candidates: Vec<PathBuf>,
    /// Files written, in write order
    pub outputs: Vec<PathBuf>,
    /// Partial-extraction warnings from every candidate
    pub warnings: Vec<SourcedWarning>,
    /// Annotations of every candidate that was extracted, in run order
    pub extractions: Vec<AnnotationExtraction>,
    /// Per-file failures; the batch continued past each of them
    pub failures: Vec<Failure>,
    /// Error that ended the run early
    pub fatal: Option<Error>,
}

impl RunReport {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            state: RunState::Idle,
            candidates: Vec::new(),
            outputs: Vec::new(),
            warnings: Vec::new(),
            extractions: Vec::new(),
            failures: Vec::new(),
            fatal: None,
        }
    }

    /// Whether the run reached `Done`.
    pub fn is_success(&self) -> bool {
        self.state == RunState::Done
    }

    /// Process exit code: 0 for `Done` (warnings allowed), 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    fn advance(&mut self, next: RunState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        if !self.state.can_transition_to(next) {
            log::error!("illegal state transition {:?} -> {:?}", self.state, next);
        }
        log::trace!("{:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

/// Progress callback: `(finished, total, current candidate)`.
pub type ProgressFn<'a> = Box<dyn FnMut(usize, usize, &Path) + 'a>;

/// Drives locating, extraction and writing for one invocation.
pub struct Pipeline<'a> {
    config: Config,
    locator: Locator,
    writer: OutputWriter,
    progress: Option<ProgressFn<'a>>,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline for `config`.
    pub fn new(config: Config) -> Self {
        Self {
            locator: Locator::from_config(&config),
            writer: OutputWriter::new(config.output_dir()),
            config,
            progress: None,
        }
    }

    /// Report progress after each candidate.
    pub fn with_progress(mut self, progress: impl FnMut(usize, usize, &Path) + 'a) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Run `mode` over `explicit`, or over the input directory when `None`.
    pub fn run(&mut self, mode: Mode, explicit: Option<&Path>) -> RunReport {
        let mut report = RunReport::new(mode);
        report.advance(RunState::Locating);

        let candidates = match self.locator.locate(explicit) {
            Ok(candidates) => candidates,
            Err(e) => {
                log::error!("{}", e);
                report.fatal = Some(e);
                report.advance(RunState::Failed);
                return report;
            }
        };
        report.candidates = candidates.clone();

        let total = candidates.len();
        for (done, path) in candidates.iter().enumerate() {
            report.advance(RunState::Extracting);
            if let Err(error) = self.process(path, mode, &mut report) {
                log::error!("{}", error);
                if !error.is_per_file() {
                    report.fatal = Some(error);
                    report.advance(RunState::Failed);
                    return report;
                }
                report.failures.push(Failure {
                    path: path.clone(),
                    error,
                });
            }
            if let Some(progress) = self.progress.as_mut() {
                progress(done + 1, total, path);
            }
        }

        let last = if report.failures.is_empty() {
            RunState::Done
        } else {
            RunState::Failed
        };
        report.advance(last);
        report
    }

    /// Open one candidate, run the requested extractors, write the results.
    ///
    /// Returns `Err` only when the document cannot be opened; write failures
    /// are recorded on `report` so that the other output still gets written.
    fn process(&self, path: &Path, mode: Mode, report: &mut RunReport) -> Result<()> {
        let (text, annotations) = {
            let doc = PdfDocument::open(path)?;
            let text = mode
                .wants_text()
                .then(|| extract_text(&doc, &self.config.text));
            let annotations = mode.wants_annotations().then(|| extract_annotations(&doc));
            (text, annotations)
            // doc dropped here, before any output is written
        };

        report.advance(RunState::Writing);

        if let Some(text) = text {
            collect_warnings(report, &text.source, &text.warnings);
            self.record(report, path, self.writer.write_text(&text));
        }

        if let Some(annotations) = annotations {
            collect_warnings(report, &annotations.source, &annotations.warnings);
            self.record(report, path, self.writer.write_annotations(&annotations));

            if mode == Mode::All {
                let analysis = Analyzer::new(&annotations.annotations).report(&annotations.source);
                self.record(report, path, self.writer.write_report(&analysis));
            }
            report.extractions.push(annotations);
        }

        Ok(())
    }

    fn record(&self, report: &mut RunReport, path: &Path, written: Result<PathBuf>) {
        match written {
            Ok(output) => report.outputs.push(output),
            Err(error) => {
                log::error!("{}", error);
                report.failures.push(Failure {
                    path: path.to_path_buf(),
                    error,
                });
            }
        }
    }

    /// Analyze a previously written annotations file and write its report.
    ///
    /// Returns the report directory.
    pub fn analyze(&self, annotations_file: &Path) -> Result<PathBuf> {
        let annotations = read_annotations(annotations_file)?;
        let source = annotations_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        log::info!("analyzing {} annotations from {}", annotations.len(), source);
        let report = Analyzer::new(&annotations).report(source);
        self.writer.write_report(&report)
    }
}

fn collect_warnings(report: &mut RunReport, source: &str, warnings: &[ExtractionWarning]) {
    report
        .warnings
        .extend(warnings.iter().cloned().map(|warning| SourcedWarning {
            source: source.to_string(),
            warning,
        }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_transitions() {
        use RunState::*;
        assert!(Idle.can_transition_to(Locating));
        assert!(Locating.can_transition_to(Failed));
        assert!(Writing.can_transition_to(Extracting));
        assert!(Writing.can_transition_to(Done));
        assert!(!Idle.can_transition_to(Extracting));
        assert!(!Locating.can_transition_to(Done));
        assert!(!Done.can_transition_to(Locating));
        assert!(!Failed.can_transition_to(Done));
    }

    #[test]
    fn test_no_input_fails_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new()
            .with_input_dir(dir.path().join("input"))
            .with_output_dir(dir.path().join("output"));

        let report = Pipeline::new(config).run(Mode::Text, None);
        assert_eq!(report.state, RunState::Failed);
        assert_eq!(report.exit_code(), 1);
        assert!(matches!(report.fatal, Some(Error::NoInput(_))));
        assert!(!dir.path().join("output").exists());
    }

    #[test]
    fn test_corrupt_pdf_is_a_per_file_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input");
        fs::create_dir(&input).unwrap();
        fs::write(input.join("broken.pdf"), b"%PDF-1.4\nthis is not a real pdf").unwrap();

        let config = Config::new()
            .with_input_dir(&input)
            .with_output_dir(dir.path().join("output"));

        let report = Pipeline::new(config).run(Mode::Annotations, None);
        assert_eq!(report.state, RunState::Failed);
        assert!(report.fatal.is_none());
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            report.failures[0].error,
            Error::DocumentOpen { .. }
        ));
        assert!(report.outputs.is_empty());
    }

    #[test]
    fn test_mode_flags() {
        assert!(Mode::Text.wants_text());
        assert!(!Mode::Text.wants_annotations());
        assert!(Mode::All.wants_text() && Mode::All.wants_annotations());
        assert_eq!(Mode::Annotations.to_string(), "annotations");
    }
}
