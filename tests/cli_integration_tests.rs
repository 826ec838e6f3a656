//! CLI Integration Tests
//!
//! Tests the binary directly using assert_cmd.

#![allow(deprecated)] // Command::cargo_bin deprecation - no stable replacement yet

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

// ═══════════════════════════════════════════════════════════════════════════
// HELP AND VERSION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("equipment-portal").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("equipment-portal"))
        .stdout(predicate::str::contains("COMMANDS"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("equipment-portal").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("equipment-portal"));
}

#[test]
fn test_serve_help_lists_environment() {
    let mut cmd = Command::cargo_bin("equipment-portal").unwrap();
    cmd.args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ONEDRIVE_FOLDER_PATH"));
}

// ═══════════════════════════════════════════════════════════════════════════
// EXPORT / INSPECT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_export_then_inspect_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("records.json");
    let workbook = temp_dir.path().join("Acme_equipment_data.xlsx");

    fs::write(
        &input,
        r#"{
            "headerBlock": [["", "", "Acme Corp"], ["", "", "Jane"], ["", "", "Street"], ["", "", "Phone"]],
            "records": [
                {"deviceType": "Printer", "manufacturer": "Brother", "serial": "U640", "selected": true},
                {"deviceType": "Laptop", "model": "T14"}
            ]
        }"#,
    )
    .unwrap();

    Command::cargo_bin("equipment-portal")
        .unwrap()
        .args(["export", input.to_str().unwrap(), workbook.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Export Complete"));

    assert!(workbook.exists());

    Command::cargo_bin("equipment-portal")
        .unwrap()
        .args(["inspect", workbook.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"deviceType\": \"Printer\""))
        .stdout(predicate::str::contains("\"model\": \"T14\""))
        .stdout(predicate::str::contains("Acme Corp"));
}

#[test]
fn test_inspect_missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.xlsx");

    Command::cargo_bin("equipment-portal")
        .unwrap()
        .args(["inspect", missing.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
}

#[test]
fn test_export_rejects_bad_json() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("bad.json");
    fs::write(&input, r#"{"records": "nope"}"#).unwrap();

    Command::cargo_bin("equipment-portal")
        .unwrap()
        .args([
            "export",
            input.to_str().unwrap(),
            temp_dir.path().join("out.xlsx").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed input"));
}
