//! pdfextract CLI - PDF text and annotation extraction tool

mod menu;

use std::io;
use std::path::{Path, PathBuf};

use clap::{ArgGroup, Parser, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfextract::{locate, AnnotationExtraction, Config, Mode, Pipeline, RunReport};

use crate::menu::{Action, Menu};

#[derive(Parser)]
#[command(name = "pdfextract")]
#[command(version)]
#[command(about = "Extract text and annotations from PDF files", long_about = None)]
#[command(group(ArgGroup::new("mode").multiple(false)))]
struct Cli {
    /// PDF to pre-select before entering interactive mode
    #[arg(value_name = "PDF")]
    pdf: Option<PathBuf>,

    /// Extract text from the PDF
    #[arg(long, value_name = "PDF", group = "mode")]
    text: Option<PathBuf>,

    /// Extract annotations from the PDF
    #[arg(long, value_name = "PDF", group = "mode")]
    annotations: Option<PathBuf>,

    /// Extract text and annotations and write an annotation report
    #[arg(long, value_name = "PDF", group = "mode")]
    all: Option<PathBuf>,

    /// Analyze an annotations JSON file written by an earlier run
    #[arg(long, value_name = "JSON", group = "mode")]
    analyze: Option<PathBuf>,

    /// Process every PDF in the input directory without prompting
    #[arg(long, value_enum, value_name = "MODE", group = "mode")]
    batch: Option<BatchMode>,

    /// Directory scanned for PDFs
    #[arg(long, value_name = "DIR", env = "PDFEXTRACT_INPUT_DIR", default_value = "data/input")]
    input_dir: PathBuf,

    /// Root directory for text/, annotations/ and reports/
    #[arg(long, value_name = "DIR", env = "PDFEXTRACT_OUTPUT_DIR", default_value = "data/output")]
    output_dir: PathBuf,

    /// Separator between pages in text output (default: newline)
    #[arg(long, value_name = "TEXT")]
    separator: Option<String>,

    /// Start every page of text output with "=== PAGE n ==="
    #[arg(long)]
    page_headers: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum BatchMode {
    /// Plain text
    Text,
    /// Annotations
    Annotations,
    /// Text, annotations and reports
    All,
}

impl From<BatchMode> for Mode {
    fn from(mode: BatchMode) -> Self {
        match mode {
            BatchMode::Text => Mode::Text,
            BatchMode::Annotations => Mode::Annotations,
            BatchMode::All => Mode::All,
        }
    }
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::new()
            .with_input_dir(&self.input_dir)
            .with_output_dir(&self.output_dir)
            .with_page_headers(self.page_headers);
        if let Some(ref separator) = self.separator {
            config = config.with_separator(unescape(separator));
        }
        config
    }

    /// Mode flag and its path, if one was given.
    fn flagged(&self) -> Option<(Mode, &Path)> {
        if let Some(ref path) = self.text {
            return Some((Mode::Text, path));
        }
        if let Some(ref path) = self.annotations {
            return Some((Mode::Annotations, path));
        }
        if let Some(ref path) = self.all {
            return Some((Mode::All, path));
        }
        None
    }
}

/// Turn `\n` and `\t` typed on the command line into real characters.
fn unescape(raw: &str) -> String {
    raw.replace("\\n", "\n").replace("\\t", "\t")
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.config();

    let has_flag = cli.flagged().is_some() || cli.analyze.is_some() || cli.batch.is_some();
    if has_flag {
        if let Some(ref pdf) = cli.pdf {
            // Mode flags take precedence over the positional path
            log::warn!("ignoring positional {} (a mode flag was given)", pdf.display());
            eprintln!(
                "{}: ignoring {} because a mode flag was given",
                "Warning".yellow().bold(),
                pdf.display()
            );
        }
    }

    let code = if let Some((mode, path)) = cli.flagged() {
        cmd_run(config, mode, Some(path))
    } else if let Some(ref json) = cli.analyze {
        cmd_analyze(config, json)
    } else if let Some(batch) = cli.batch {
        cmd_run(config, batch.into(), None)
    } else {
        cmd_interactive(config, cli.pdf.clone())
    };

    std::process::exit(code);
}

fn cmd_run(config: Config, mode: Mode, path: Option<&Path>) -> i32 {
    let pb = match path {
        Some(_) => ProgressBar::hidden(),
        None => {
            let pb = ProgressBar::new(0);
            if let Ok(style) =
                ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb
        }
    };

    let report = {
        let mut pipeline = Pipeline::new(config).with_progress(|done, total, current: &Path| {
            pb.set_length(total as u64);
            pb.set_position(done as u64);
            if let Some(name) = current.file_name() {
                pb.set_message(name.to_string_lossy().into_owned());
            }
        });
        pipeline.run(mode, path)
    };
    pb.finish_and_clear();

    print_report(&report);
    report.exit_code()
}

fn cmd_analyze(config: Config, json: &Path) -> i32 {
    let pipeline = Pipeline::new(config);
    match pipeline.analyze(json) {
        Ok(dir) => {
            println!("{} {}", "Report written to".green(), dir.display());
            0
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            1
        }
    }
}

fn cmd_interactive(config: Config, selected: Option<PathBuf>) -> i32 {
    if let Some(ref pdf) = selected {
        if let Err(e) = locate::validate(pdf) {
            eprintln!("{}: {}", "Error".red().bold(), e);
            return 1;
        }
    }

    let stdin = io::stdin();
    let mut menu = Menu::new(stdin.lock(), io::stdout(), config, selected);
    let mut last = 0;

    loop {
        match menu.next_action() {
            Ok(Action::Run { mode, path }) => {
                last = cmd_run(menu.config().clone(), mode, path.as_deref());
            }
            Ok(Action::Analyze(json)) => {
                last = cmd_analyze(menu.config().clone(), &json);
            }
            Ok(Action::Exit) => {
                println!("Goodbye!");
                return last;
            }
            Err(e) => {
                eprintln!("{}: {}", "Error".red().bold(), e);
                return 1;
            }
        }
    }
}

fn print_report(report: &RunReport) {
    if let Some(ref fatal) = report.fatal {
        eprintln!("{}: {}", "Error".red().bold(), fatal);
        if fatal.is_no_input() {
            eprintln!("Put PDF files in the input directory or pass a path to a PDF.");
        }
        return;
    }

    for extraction in &report.extractions {
        println!("\n{}", annotation_summary(extraction));
    }

    for output in &report.outputs {
        println!("{} {}", "Saved to".green(), output.display());
    }

    if !report.warnings.is_empty() {
        println!(
            "\n{} ({})",
            "Warnings".yellow().bold(),
            report.warnings.len()
        );
        for warning in &report.warnings {
            println!("  {} {}", "├─".dimmed(), warning);
        }
    }

    for failure in &report.failures {
        eprintln!(
            "{}: {}: {}",
            "Failed".red().bold(),
            failure.path.display(),
            failure.error
        );
    }

    let processed = report.candidates.len() - failed_candidates(report);
    let summary = format!(
        "{} of {} PDF(s) processed ({} mode)",
        processed,
        report.candidates.len(),
        report.mode
    );
    if report.is_success() {
        println!("\n{} {}", "Done!".green().bold(), summary);
    } else {
        println!("\n{} {}", "Finished with errors:".red().bold(), summary);
    }
}

/// Per-type counts followed by a numbered listing of every annotation.
fn annotation_summary(extraction: &AnnotationExtraction) -> String {
    if extraction.is_empty() {
        return format!("No annotations found in {}.", extraction.source);
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Found {} annotations in {}\n",
        extraction.len(),
        extraction.source
    ));
    out.push_str(&format!("{}\n", "-".repeat(50)));

    out.push_str("Annotation types:\n");
    for (label, count) in extraction.type_counts() {
        out.push_str(&format!("  {}: {}\n", label, count));
    }

    out.push_str("\nDetailed annotations:\n");
    for (i, annot) in extraction.annotations.iter().enumerate() {
        out.push_str(&format!("\n{}. Page {} - {}\n", i + 1, annot.page, annot.kind));
        if let Some(ref author) = annot.author {
            out.push_str(&format!("   Author: {}\n", author));
        }
        if !annot.content.is_empty() {
            out.push_str(&format!("   Content: {}\n", annot.content));
        }
    }

    out
}

/// Number of distinct candidates with at least one failure.
fn failed_candidates(report: &RunReport) -> usize {
    let mut paths: Vec<&PathBuf> = report.failures.iter().map(|f| &f.path).collect();
    paths.sort();
    paths.dedup();
    paths.len()
}
