//! CLI integration tests for the implemented subcommands.
//!
//! Uses `assert_cmd` to spawn the `racket-road` binary and verify exit
//! codes, stdout content, and stderr content. The `eval` subcommand is
//! exercised only for its unconfigured-environment failure mode; live
//! evaluator runs need network credentials.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper: create a Command for the `racket-road` binary.
fn racket_road() -> Command {
    Command::cargo_bin("racket-road").expect("binary builds")
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

// ──────────────────────────────────────────────
// Help and catalog
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    racket_road()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Racket Road pill-to-code toolchain"));
}

#[test]
fn catalog_lists_pills() {
    racket_road()
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("filter"))
        .stdout(predicate::str::contains("define"));
}

#[test]
fn catalog_json_is_parseable() {
    let output = racket_road()
        .args(["catalog", "--output", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let specs: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert!(specs.as_array().map(|a| a.len() >= 20).unwrap_or(false));
}

// ──────────────────────────────────────────────
// generate
// ──────────────────────────────────────────────

#[test]
fn generate_renders_layout() {
    let dir = TempDir::new().unwrap();
    let layout = write_file(
        &dir,
        "layout.json",
        r#"{"lines": [["define", "x", "list", "num-1", "num-1", "num-0"], ["filter", "even?", "x"]]}"#,
    );
    racket_road()
        .arg("generate")
        .arg(&layout)
        .assert()
        .success()
        .stdout(predicate::str::contains("(define x (list 1 1 0))"))
        .stdout(predicate::str::contains("(filter even? x)"));
}

#[test]
fn generate_rejects_unknown_pill() {
    let dir = TempDir::new().unwrap();
    let layout = write_file(&dir, "layout.json", r#"{"lines": [["no-such-pill"]]}"#);
    racket_road()
        .arg("generate")
        .arg(&layout)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown pill id 'no-such-pill'"));
}

// ──────────────────────────────────────────────
// check
// ──────────────────────────────────────────────

#[test]
fn check_accepts_valid_source() {
    let dir = TempDir::new().unwrap();
    let source = write_file(&dir, "good.rkt", "(define x 10)\n(+ x 1)\n");
    racket_road()
        .arg("check")
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("Syntax appears plausible."));
}

#[test]
fn check_rejects_unbalanced_source_with_exit_1() {
    let dir = TempDir::new().unwrap();
    let source = write_file(&dir, "bad.rkt", "(+ 1 2");
    racket_road()
        .arg("check")
        .arg(&source)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Unmatched opening parenthesis"));
}

#[test]
fn check_json_carries_line_index() {
    let dir = TempDir::new().unwrap();
    let source = write_file(&dir, "bad.rkt", "(define x 10)\n(filter even?)");
    let output = racket_road()
        .args(["check", "--output", "json"])
        .arg(&source)
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();
    let result: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(result["is_valid"], serde_json::json!(false));
    assert_eq!(result["error_line_index"], serde_json::json!(1));
}

#[test]
fn check_missing_file_fails() {
    racket_road()
        .args(["check", "does-not-exist.rkt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

// ──────────────────────────────────────────────
// eval (unconfigured environment only)
// ──────────────────────────────────────────────

#[test]
fn eval_without_configuration_reports_missing_evaluator() {
    let dir = TempDir::new().unwrap();
    let source = write_file(&dir, "good.rkt", "(+ 1 2)");
    racket_road()
        .arg("eval")
        .arg(&source)
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("RACKET_ROAD_COMPILER_URL")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no evaluator configured"));
}
