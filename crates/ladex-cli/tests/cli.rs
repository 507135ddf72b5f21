//! CLI-level tests for the batch driving loop.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn batch_with_no_documents_exits_cleanly_without_outputs() {
    let input = tempfile::tempdir().unwrap();
    let output = input.path().join("outputs");

    Command::cargo_bin("ladex")
        .unwrap()
        .env_remove("EXTRACTOR_MODE")
        .arg("batch")
        .arg("--input-dir")
        .arg(input.path())
        .arg("--output-dir")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("No input documents"));

    // zero discovered documents: terminate before creating any output files
    assert!(!output.exists());
}

#[test]
fn batch_isolates_ocr_failures_and_reports_them() {
    let input = tempfile::tempdir().unwrap();
    std::fs::write(input.path().join("broken.pdf"), b"not a pdf").unwrap();
    let output = input.path().join("outputs");

    Command::cargo_bin("ladex")
        .unwrap()
        .env_remove("EXTRACTOR_MODE")
        .arg("batch")
        .arg("--input-dir")
        .arg(input.path())
        .arg("--output-dir")
        .arg(&output)
        .arg("--pause")
        .arg("0")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 persisted, 1 failed of 1 documents"));

    // the unreadable document is skipped, not persisted
    assert!(!output.join("bol_headers.csv").exists());
}

#[test]
fn unknown_extractor_mode_is_rejected() {
    let input = tempfile::tempdir().unwrap();

    Command::cargo_bin("ladex")
        .unwrap()
        .env("EXTRACTOR_MODE", "turbo")
        .arg("batch")
        .arg("--input-dir")
        .arg(input.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("EXTRACTOR_MODE"));
}
