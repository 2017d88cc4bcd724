//! End-to-end runs over a scratch data directory.

mod common;

use std::fs;
use std::path::Path;

use common::{write_pdf, AnnotSpec, Damage, PageSpec};
use pdfextract::{read_annotations, Config, Error, Mode, Pipeline, RunState};

fn config_for(root: &Path) -> Config {
    Config::new()
        .with_input_dir(root.join("input"))
        .with_output_dir(root.join("output"))
}

fn seed_inputs(root: &Path) {
    let input = root.join("input");
    fs::create_dir_all(&input).unwrap();
    write_pdf(&input.join("a.pdf"), &[PageSpec::text("no notes here")]);
    write_pdf(
        &input.join("b.pdf"),
        &[
            PageSpec::text("first").annotate(
                AnnotSpec::new("Highlight", [10, 10, 90, 30])
                    .contents("why?")
                    .author("Ana"),
            ),
            PageSpec::text("second").annotate(AnnotSpec::new("Text", [5, 5, 25, 25])),
        ],
    );
}

#[test]
fn test_batch_annotations() {
    let dir = tempfile::tempdir().unwrap();
    seed_inputs(dir.path());

    let report = Pipeline::new(config_for(dir.path())).run(Mode::Annotations, None);
    assert_eq!(report.state, RunState::Done);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.candidates.len(), 2);
    assert_eq!(report.outputs.len(), 2);

    let annotations_dir = dir.path().join("output").join("annotations");
    let a = fs::read_to_string(annotations_dir.join("a_annotations.json")).unwrap();
    assert_eq!(a, "[]");

    let b = read_annotations(annotations_dir.join("b_annotations.json")).unwrap();
    assert_eq!(b.len(), 2);
    assert_eq!(b[0].page, 0);
    assert_eq!(b[0].content, "why?");
    assert_eq!(b[1].page, 1);

    assert!(!dir.path().join("output").join("text").exists());
}

#[test]
fn test_batch_text_rerun_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    seed_inputs(dir.path());
    let text_dir = dir.path().join("output").join("text");

    let first = Pipeline::new(config_for(dir.path())).run(Mode::Text, None);
    assert!(first.is_success());
    let before = fs::read_to_string(text_dir.join("b.txt")).unwrap();

    let second = Pipeline::new(config_for(dir.path())).run(Mode::Text, None);
    assert!(second.is_success());

    let mut names: Vec<String> = fs::read_dir(&text_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["a.txt", "b.txt"]);
    assert_eq!(fs::read_to_string(text_dir.join("b.txt")).unwrap(), before);
    assert!(before.contains("first"));
}

#[test]
fn test_explicit_missing_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.pdf");

    let report = Pipeline::new(config_for(dir.path())).run(Mode::Text, Some(&missing));
    assert_eq!(report.state, RunState::Failed);
    assert_ne!(report.exit_code(), 0);
    assert!(matches!(report.fatal, Some(Error::NotFound(_))));
    assert!(!dir.path().join("output").exists());
}

#[test]
fn test_explicit_not_a_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let txt = dir.path().join("not-a-pdf.txt");
    fs::write(&txt, "plain text").unwrap();

    let report = Pipeline::new(config_for(dir.path())).run(Mode::Annotations, Some(&txt));
    assert_ne!(report.exit_code(), 0);
    assert!(matches!(report.fatal, Some(Error::InvalidFormat(_))));
}

#[test]
fn test_bad_pdf_does_not_abort_batch() {
    let dir = tempfile::tempdir().unwrap();
    seed_inputs(dir.path());
    fs::write(
        dir.path().join("input").join("corrupt.pdf"),
        b"%PDF-1.7\ntruncated",
    )
    .unwrap();

    let mut progress = Vec::new();
    let report = Pipeline::new(config_for(dir.path()))
        .with_progress(|done, total, _path: &Path| progress.push((done, total)))
        .run(Mode::Annotations, None);

    assert_eq!(report.state, RunState::Failed);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].path.ends_with("corrupt.pdf"));
    assert_eq!(report.outputs.len(), 2);
    assert_eq!(progress.len(), 3);
    assert_eq!(progress.last(), Some(&(3, 3)));

    let annotations_dir = dir.path().join("output").join("annotations");
    assert!(annotations_dir.join("a_annotations.json").is_file());
    assert!(annotations_dir.join("b_annotations.json").is_file());
}

#[test]
fn test_all_mode_single_file() {
    let dir = tempfile::tempdir().unwrap();
    seed_inputs(dir.path());
    let pdf = dir.path().join("input").join("b.pdf");

    let report = Pipeline::new(config_for(dir.path())).run(Mode::All, Some(&pdf));
    assert!(report.is_success());
    assert_eq!(report.candidates, vec![pdf]);

    let output = dir.path().join("output");
    assert!(output.join("text").join("b.txt").is_file());
    assert!(output.join("annotations").join("b_annotations.json").is_file());
    assert!(output.join("reports").join("b").join("report.txt").is_file());
    assert_eq!(report.outputs.len(), 3);
}

#[test]
fn test_analyze_written_annotations() {
    let dir = tempfile::tempdir().unwrap();
    seed_inputs(dir.path());

    let mut pipeline = Pipeline::new(config_for(dir.path()));
    assert!(pipeline.run(Mode::Annotations, None).is_success());

    let json = dir
        .path()
        .join("output")
        .join("annotations")
        .join("b_annotations.json");
    let report_dir = pipeline.analyze(&json).unwrap();
    assert_eq!(report_dir, dir.path().join("output").join("reports").join("b"));

    let stats: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(report_dir.join("statistics.json")).unwrap())
            .unwrap();
    assert_eq!(stats["total_annotations"], 2);
    assert_eq!(stats["pages_with_annotations"], 2);
    assert_eq!(stats["annotation_types"]["highlight"], 1);
}

#[test]
fn test_unwritable_output_fails_only_that_file() {
    let dir = tempfile::tempdir().unwrap();
    seed_inputs(dir.path());
    // A directory where b's annotations file should go
    let annotations_dir = dir.path().join("output").join("annotations");
    fs::create_dir_all(annotations_dir.join("b_annotations.json")).unwrap();

    let report = Pipeline::new(config_for(dir.path())).run(Mode::Annotations, None);

    assert_eq!(report.state, RunState::Failed);
    assert_eq!(report.exit_code(), 1);
    assert!(report.fatal.is_none());
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].path.ends_with("b.pdf"));
    assert!(matches!(
        report.failures[0].error,
        Error::WritePermission { .. }
    ));

    assert_eq!(report.outputs, vec![annotations_dir.join("a_annotations.json")]);
    assert_eq!(
        fs::read_to_string(annotations_dir.join("a_annotations.json")).unwrap(),
        "[]"
    );
}

#[test]
fn test_damaged_page_warns_but_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    fs::create_dir_all(&input).unwrap();
    write_pdf(
        &input.join("scan.pdf"),
        &[PageSpec::damaged(Damage::BadFlate), PageSpec::text("page1")],
    );

    let report = Pipeline::new(config_for(dir.path())).run(Mode::Text, None);

    assert_eq!(report.state, RunState::Done);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].source, "scan.pdf");
    assert_eq!(report.warnings[0].warning.page, 0);

    let text = fs::read_to_string(dir.path().join("output").join("text").join("scan.txt")).unwrap();
    assert!(text.contains("page1"));
}

#[test]
fn test_report_keeps_annotation_extractions() {
    let dir = tempfile::tempdir().unwrap();
    seed_inputs(dir.path());

    let text_only = Pipeline::new(config_for(dir.path())).run(Mode::Text, None);
    assert!(text_only.extractions.is_empty());

    let report = Pipeline::new(config_for(dir.path())).run(Mode::Annotations, None);
    let mut counts: Vec<(String, usize)> = report
        .extractions
        .iter()
        .map(|e| (e.source.clone(), e.len()))
        .collect();
    counts.sort();
    assert_eq!(
        counts,
        vec![("a.pdf".to_string(), 0), ("b.pdf".to_string(), 2)]
    );
}
