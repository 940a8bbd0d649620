//! Integration tests for the plantrack binary.
//!
//! These tests verify end-to-end behavior including:
//! - Program authoring workflow
//! - Export/import round-trips across data directories
//! - Rejection paths that must leave the store untouched

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("plantrack"))
}

fn create_program(data_dir: &Path, name: &str) {
    cli()
        .arg("create")
        .arg(name)
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created program"));
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Training plan manager"));
}

#[test]
fn test_create_then_list() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    create_program(data_dir, "Strength Builder");

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Strength Builder"));

    // The store file was created in the data directory
    assert!(data_dir.join("training.json").exists());
}

#[test]
fn test_default_command_lists() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No programs yet"));
}

#[test]
fn test_create_rejects_blank_name() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("create")
        .arg("   ")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_duplicate_program() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    create_program(data_dir, "Base Plan");

    let store: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(data_dir.join("training.json")).unwrap())
            .unwrap();
    let program_id = store["programs"]
        .as_object()
        .unwrap()
        .keys()
        .next()
        .unwrap()
        .clone();

    cli()
        .arg("duplicate")
        .arg(&program_id)
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Base Plan (Copy)"));

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Base Plan (Copy)"));
}

#[test]
fn test_delete_missing_program_fails() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("delete")
        .arg("no-such-id")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_export_writes_envelope_file() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let export_path = data_dir.join("backup.json");

    create_program(data_dir, "Exported Plan");

    cli()
        .arg("export")
        .arg("--output")
        .arg(&export_path)
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported to"));

    let envelope: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&export_path).unwrap()).unwrap();
    assert_eq!(envelope["version"], "1.0");
    assert_eq!(envelope["exportMode"], "full");
    assert_eq!(envelope["data"]["programs"].as_array().unwrap().len(), 1);
}

#[test]
fn test_export_import_round_trip_between_stores() {
    let source_dir = setup_test_dir();
    let target_dir = setup_test_dir();
    let export_path = source_dir.path().join("backup.json");

    create_program(source_dir.path(), "Portable Plan");

    cli()
        .arg("export")
        .arg("--output")
        .arg(&export_path)
        .arg("--data-dir")
        .arg(source_dir.path())
        .assert()
        .success();

    cli()
        .arg("import")
        .arg(&export_path)
        .arg("--mode")
        .arg("replace")
        .arg("--data-dir")
        .arg(target_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 programs"));

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(target_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Portable Plan"));
}

#[test]
fn test_import_unknown_mode_fails() {
    let temp_dir = setup_test_dir();
    let payload = temp_dir.path().join("backup.json");
    fs::write(&payload, "{}").unwrap();

    cli()
        .arg("import")
        .arg(&payload)
        .arg("--mode")
        .arg("overwrite")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_import_dangling_reference_leaves_store_empty() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let payload_path = data_dir.join("bad.json");

    let payload = r#"{
        "version": "1.0",
        "schemaVersion": "1.0.0",
        "exportMode": "full",
        "exportDate": "2024-01-01T00:00:00.000Z",
        "data": {
            "programs": [],
            "levels": [{
                "id": "level-1",
                "programId": "missing-program",
                "name": "Orphan",
                "description": "",
                "order": 1,
                "duration": "",
                "restDays": 0,
                "notes": "",
                "createdAt": "2024-01-01T00:00:00.000Z",
                "updatedAt": "2024-01-01T00:00:00.000Z",
                "customFields": {}
            }],
            "moves": [],
            "logs": [],
            "settings": {
                "id": "settings",
                "syncEnabled": false,
                "darkMode": true,
                "updatedAt": "2024-01-01T00:00:00.000Z"
            }
        }
    }"#;
    fs::write(&payload_path, payload).unwrap();

    cli()
        .arg("import")
        .arg(&payload_path)
        .arg("--mode")
        .arg("merge")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing program"));

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No programs yet"));
}
