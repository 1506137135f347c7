//! Integration tests for the TRT CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to get a trt command
fn trt() -> Command {
    Command::cargo_bin("trt").unwrap()
}

/// Helper to create a test project in a temp directory
fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    trt().current_dir(tmp.path()).arg("init").assert().success();
    tmp
}

/// Helper to write a CSV file into the project
fn write_csv(tmp: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = tmp.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Helper to read the single task file in the register
fn read_single_task_file(tmp: &TempDir) -> String {
    let mut files: Vec<PathBuf> = fs::read_dir(tmp.path().join("tasks"))
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.to_string_lossy().ends_with(".trt.yaml"))
        .collect();
    assert_eq!(files.len(), 1, "expected exactly one task file");
    fs::read_to_string(files.remove(0)).unwrap()
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    trt()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("task register"));
}

#[test]
fn test_version_displays() {
    trt()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("trt"));
}

#[test]
fn test_unknown_command_fails() {
    trt()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// ============================================================================
// Init Command Tests
// ============================================================================

#[test]
fn test_init_creates_project_structure() {
    let tmp = TempDir::new().unwrap();

    trt()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    assert!(tmp.path().join(".trt").exists());
    assert!(tmp.path().join(".trt/config.yaml").exists());
    assert!(tmp.path().join("tasks").is_dir());
}

#[test]
fn test_init_warns_if_project_exists() {
    let tmp = setup_test_project();

    trt()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

// ============================================================================
// Fields / Map Command Tests
// ============================================================================

#[test]
fn test_fields_lists_catalog() {
    trt()
        .arg("fields")
        .assert()
        .success()
        .stdout(predicate::str::contains("task_reference"))
        .stdout(predicate::str::contains("net_amount"))
        .stdout(predicate::str::contains("10 field(s)"));
}

#[test]
fn test_map_infers_alias_headers() {
    let tmp = setup_test_project();
    let csv = write_csv(&tmp, "sample.csv", "TO Ref.,TO Status\nABC-1,Done\n");

    trt()
        .current_dir(tmp.path())
        .args(["map", csv.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("task_reference"))
        .stdout(predicate::str::contains("0.99"))
        .stdout(predicate::str::contains("2 of 2 column(s) mapped"));
}

#[test]
fn test_map_writes_mapping_file() {
    let tmp = setup_test_project();
    let csv = write_csv(&tmp, "sample.csv", "TO Ref.,Mystery\nABC-1,xyz\n");

    trt()
        .current_dir(tmp.path())
        .args(["map", csv.to_str().unwrap(), "-o", "mapping.yaml"])
        .assert()
        .success();

    let mapping = fs::read_to_string(tmp.path().join("mapping.yaml")).unwrap();
    assert!(mapping.contains("task_reference"));
    assert!(mapping.contains("Mystery"));
}

#[test]
fn test_map_warns_on_unresolved_columns() {
    let tmp = setup_test_project();
    let csv = write_csv(&tmp, "sample.csv", "TO Ref.,Mystery\nABC-1,xyz\n");

    trt()
        .current_dir(tmp.path())
        .args(["map", csv.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("left unmapped"));
}

// ============================================================================
// Import Command Tests
// ============================================================================

#[test]
fn test_import_creates_task() {
    let tmp = setup_test_project();
    let csv = write_csv(&tmp, "sample.csv", "TO Ref.,TO Status\nABC-1,Done\n");

    trt()
        .current_dir(tmp.path())
        .args(["import", csv.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 created"));

    let task = read_single_task_file(&tmp);
    assert!(task.contains("task_reference: ABC-1"));
    assert!(task.contains("status: done"));
    assert!(task.contains("field: import"));
}

#[test]
fn test_reimport_updates_instead_of_duplicating() {
    let tmp = setup_test_project();
    let csv = write_csv(&tmp, "sample.csv", "TO Ref.,TO Status\nABC-1,Done\n");

    trt()
        .current_dir(tmp.path())
        .args(["import", csv.to_str().unwrap()])
        .assert()
        .success();

    let changed = write_csv(&tmp, "changed.csv", "TO Ref.,TO Status\nABC-1,Blocked\n");
    trt()
        .current_dir(tmp.path())
        .args(["import", changed.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 updated"));

    let task = read_single_task_file(&tmp);
    assert!(task.contains("status: blocked"));
    // the field-level diff is on the ledger alongside the import marker
    assert!(task.contains("old_value: done"));
    assert!(task.contains("new_value: blocked"));
}

#[test]
fn test_import_fails_without_required_mapping() {
    let tmp = setup_test_project();
    let csv = write_csv(&tmp, "sample.csv", "TO Status\nDone\n");

    trt()
        .current_dir(tmp.path())
        .args(["import", csv.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("task_reference"));

    // fail closed: nothing written
    assert_eq!(fs::read_dir(tmp.path().join("tasks")).unwrap().count(), 0);
}

#[test]
fn test_import_empty_csv_fails() {
    let tmp = setup_test_project();
    let csv = write_csv(&tmp, "empty.csv", "");

    trt()
        .current_dir(tmp.path())
        .args(["import", csv.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no header row"));
}

#[test]
fn test_import_dry_run_writes_nothing() {
    let tmp = setup_test_project();
    let csv = write_csv(&tmp, "sample.csv", "TO Ref.,TO Status\nABC-1,Done\n");

    trt()
        .current_dir(tmp.path())
        .args(["import", csv.to_str().unwrap(), "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would create"));

    assert_eq!(fs::read_dir(tmp.path().join("tasks")).unwrap().count(), 0);
}

#[test]
fn test_import_with_reviewed_mapping_file() {
    let tmp = setup_test_project();
    let csv = write_csv(&tmp, "sample.csv", "Ref Column,Note Column\nABC-9,urgent\n");
    fs::write(
        tmp.path().join("mapping.yaml"),
        "- csv_header: Ref Column\n  field: task_reference\n  confidence: 1.0\n- csv_header: Note Column\n  field: comments\n  confidence: 1.0\n",
    )
    .unwrap();

    trt()
        .current_dir(tmp.path())
        .args([
            "import",
            csv.to_str().unwrap(),
            "--mapping",
            "mapping.yaml",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 created"));

    let task = read_single_task_file(&tmp);
    assert!(task.contains("task_reference: ABC-9"));
    assert!(task.contains("comments: urgent"));
}

// ============================================================================
// Task / History Command Tests
// ============================================================================

#[test]
fn test_task_list_and_show() {
    let tmp = setup_test_project();
    let csv = write_csv(&tmp, "sample.csv", "TO Ref.,TO Status\nABC-1,Done\n");
    trt()
        .current_dir(tmp.path())
        .args(["import", csv.to_str().unwrap()])
        .assert()
        .success();

    trt()
        .current_dir(tmp.path())
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ABC-1"))
        .stdout(predicate::str::contains("1 task(s) found"));

    trt()
        .current_dir(tmp.path())
        .args(["task", "show", "ABC-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("task_reference: ABC-1"));
}

#[test]
fn test_task_list_status_filter() {
    let tmp = setup_test_project();
    let csv = write_csv(
        &tmp,
        "sample.csv",
        "TO Ref.,TO Status\nABC-1,Done\nABC-2,Blocked\n",
    );
    trt()
        .current_dir(tmp.path())
        .args(["import", csv.to_str().unwrap()])
        .assert()
        .success();

    trt()
        .current_dir(tmp.path())
        .args(["task", "list", "--status", "blocked"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ABC-2"))
        .stdout(predicate::str::contains("1 task(s) found"));
}

#[test]
fn test_task_set_records_history() {
    let tmp = setup_test_project();
    let csv = write_csv(&tmp, "sample.csv", "TO Ref.,TO Status\nABC-1,Done\n");
    trt()
        .current_dir(tmp.path())
        .args(["import", csv.to_str().unwrap()])
        .assert()
        .success();

    trt()
        .current_dir(tmp.path())
        .args(["task", "set", "ABC-1", "status=blocked", "comments=checked with carrier"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 change(s)"));

    trt()
        .current_dir(tmp.path())
        .args(["history", "ABC-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("import via csv-upload"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("blocked"));
}

#[test]
fn test_task_set_rejects_unknown_field() {
    let tmp = setup_test_project();
    let csv = write_csv(&tmp, "sample.csv", "TO Ref.\nABC-1\n");
    trt()
        .current_dir(tmp.path())
        .args(["import", csv.to_str().unwrap()])
        .assert()
        .success();

    trt()
        .current_dir(tmp.path())
        .args(["task", "set", "ABC-1", "bogus=1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown field"));
}

#[test]
fn test_history_for_unknown_task_fails() {
    let tmp = setup_test_project();
    trt()
        .current_dir(tmp.path())
        .args(["history", "NOPE-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
