//! Interactive menu.
//!
//! A thin adapter over the pipeline: it only decides which mode to run on
//! which input, and leaves running to the caller.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use colored::Colorize;
use pdfextract::output::ANNOTATIONS_DIR;
use pdfextract::{Config, Locator, Mode};

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Run `mode` on `path`, or on the whole input directory when `None`
    Run { mode: Mode, path: Option<PathBuf> },
    /// Analyze an annotations JSON file
    Analyze(PathBuf),
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Run(Mode),
    Analyze,
    Settings,
    Exit,
}

fn parse_choice(line: &str) -> Option<Choice> {
    match line.trim().to_ascii_lowercase().as_str() {
        "1" | "text" => Some(Choice::Run(Mode::Text)),
        "2" | "annotations" => Some(Choice::Run(Mode::Annotations)),
        "3" | "all" => Some(Choice::Run(Mode::All)),
        "4" | "analyze" => Some(Choice::Analyze),
        "5" | "settings" => Some(Choice::Settings),
        "0" | "q" | "exit" | "quit" => Some(Choice::Exit),
        _ => None,
    }
}

/// Result of a file prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Selection {
    /// Blank line: every listed file
    All,
    File(PathBuf),
    Invalid,
}

/// Interpret a file prompt answer against a numbered list.
fn parse_selection(line: &str, listed: &[PathBuf]) -> Selection {
    let answer = line.trim();
    if answer.is_empty() {
        return Selection::All;
    }
    match answer.parse::<usize>() {
        Ok(n) if (1..=listed.len()).contains(&n) => Selection::File(listed[n - 1].clone()),
        Ok(_) => Selection::Invalid,
        Err(_) => Selection::File(PathBuf::from(answer)),
    }
}

pub struct Menu<R, W> {
    input: R,
    output: W,
    config: Config,
    selected: Option<PathBuf>,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W, config: Config, selected: Option<PathBuf>) -> Self {
        Self {
            input,
            output,
            config,
            selected,
        }
    }

    /// Configuration, including any changes made in the settings screen.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Show the menu until the user picks something runnable.
    ///
    /// End of input is treated as [`Action::Exit`].
    pub fn next_action(&mut self) -> io::Result<Action> {
        loop {
            self.print_menu()?;
            let Some(line) = self.prompt("Enter your choice (0-5): ")? else {
                return Ok(Action::Exit);
            };

            match parse_choice(&line) {
                Some(Choice::Run(mode)) => {
                    if let Some(path) = self.selected.clone() {
                        return Ok(Action::Run {
                            mode,
                            path: Some(path),
                        });
                    }
                    match self.select_pdf()? {
                        Some(selection) => {
                            return Ok(Action::Run {
                                mode,
                                path: selection,
                            })
                        }
                        None => return Ok(Action::Exit),
                    }
                }
                Some(Choice::Analyze) => match self.select_annotations()? {
                    Some(path) => return Ok(Action::Analyze(path)),
                    None => return Ok(Action::Exit),
                },
                Some(Choice::Settings) => {
                    if !self.settings()? {
                        return Ok(Action::Exit);
                    }
                }
                Some(Choice::Exit) => return Ok(Action::Exit),
                None => writeln!(self.output, "{}", "Invalid choice. Please try again.".yellow())?,
            }
        }
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", "PDF EXTRACT".cyan().bold())?;
        writeln!(self.output, "{}", "─".repeat(40).dimmed())?;
        if let Some(ref path) = self.selected {
            writeln!(self.output, "Selected PDF: {}", path.display())?;
        }
        writeln!(self.output, "1. Extract text")?;
        writeln!(self.output, "2. Extract annotations")?;
        writeln!(self.output, "3. Extract everything (text, annotations, report)")?;
        writeln!(self.output, "4. Analyze annotations")?;
        writeln!(self.output, "5. Settings")?;
        writeln!(self.output, "0. Exit")?;
        Ok(())
    }

    /// Print `question` and read one line; `None` at end of input.
    fn prompt(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn print_listing(&mut self, title: &str, files: &[PathBuf]) -> io::Result<()> {
        writeln!(self.output, "{}", title.bold())?;
        for (i, path) in files.iter().enumerate() {
            let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            writeln!(self.output, "{}. {}", i + 1, name)?;
        }
        Ok(())
    }

    /// Ask which PDF to process.
    ///
    /// `Ok(Some(None))` means the whole input directory; `Ok(None)` means
    /// input ended.
    fn select_pdf(&mut self) -> io::Result<Option<Option<PathBuf>>> {
        let candidates = Locator::from_config(&self.config).candidates();
        if candidates.is_empty() {
            writeln!(
                self.output,
                "No PDF files in {}.",
                self.config.input_dir().display()
            )?;
        } else {
            let title = format!("PDF files in {}:", self.config.input_dir().display());
            self.print_listing(&title, &candidates)?;
        }

        loop {
            let Some(line) = self.prompt(
                "Select a file number, enter a path, or press Enter to process all: ",
            )?
            else {
                return Ok(None);
            };
            match parse_selection(&line, &candidates) {
                Selection::All => return Ok(Some(None)),
                Selection::File(path) => return Ok(Some(Some(path))),
                Selection::Invalid => {
                    writeln!(self.output, "{}", "Invalid selection.".yellow())?
                }
            }
        }
    }

    /// Ask which annotations file to analyze; `None` when input ended.
    fn select_annotations(&mut self) -> io::Result<Option<PathBuf>> {
        let dir = self.config.output_dir().join(ANNOTATIONS_DIR);
        let files = json_files(&dir);
        if !files.is_empty() {
            let title = format!("Annotation files in {}:", dir.display());
            self.print_listing(&title, &files)?;
        }

        loop {
            let Some(line) = self.prompt("Select a file number or enter a path: ")? else {
                return Ok(None);
            };
            match parse_selection(&line, &files) {
                Selection::File(path) => return Ok(Some(path)),
                Selection::All | Selection::Invalid => {
                    writeln!(self.output, "{}", "Invalid selection.".yellow())?
                }
            }
        }
    }

    /// Settings screen; returns `false` when input ended.
    fn settings(&mut self) -> io::Result<bool> {
        writeln!(
            self.output,
            "Input directory:  {}",
            self.config.input_dir().display()
        )?;
        writeln!(
            self.output,
            "Output directory: {}",
            self.config.output_dir().display()
        )?;

        let Some(line) = self.prompt("New input directory (Enter to keep): ")? else {
            return Ok(false);
        };
        let answer = line.trim();
        if !answer.is_empty() {
            self.config = self.config.clone().with_input_dir(answer);
            writeln!(self.output, "{} {}", "Input directory set to".green(), answer)?;
        }
        Ok(true)
    }
}

fn json_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
                .collect()
        })
        .unwrap_or_default();
    files.sort();
    files
}
