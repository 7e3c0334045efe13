//! End-to-end CLI integration tests
//!
//! These tests use assert_cmd to run the scan-relocate binary inside a
//! scratch directory, so no configuration from the developer's machine leaks
//! in.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn data_file(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// The binary, run from an empty directory with the sample table
fn scan_relocate(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("scan-relocate").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .arg("--table")
        .arg(data_file("locations.csv"));
    cmd
}

#[test]
fn test_no_subcommand_shows_how_to_get_started() {
    let dir = TempDir::new().unwrap();

    scan_relocate(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("To get started:"))
        .stdout(predicate::str::contains("scan-relocate scan"));
}

#[test]
fn test_normalize_prints_each_code() {
    let dir = TempDir::new().unwrap();

    scan_relocate(&dir)
        .args(["normalize", "aa-1-23", "POUMON-AA-1", " b-01-01 "])
        .assert()
        .success()
        .stdout(predicate::str::contains("aa-1-23 → A-1-23"))
        .stdout(predicate::str::contains("POUMON-AA-1 → POUMON-AA-1"))
        .stdout(predicate::str::contains("→ B-01-01"));
}

#[test]
fn test_table_lists_loaded_rows() {
    let dir = TempDir::new().unwrap();

    scan_relocate(&dir)
        .args(["table", "--limit", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("6 row(s)"))
        .stdout(predicate::str::contains("L-10-06-5"))
        .stdout(predicate::str::contains("... 2 more row(s)"))
        .stdout(predicate::str::contains("Ancien").not());
}

#[test]
fn test_missing_table_uses_sample_rows() {
    let dir = TempDir::new().unwrap();

    Command::cargo_bin("scan-relocate")
        .unwrap()
        .current_dir(dir.path())
        .args(["table", "--table", "missing.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("built-in sample table"))
        .stdout(predicate::str::contains("TEST003"))
        .stderr(predicate::str::contains("Reference table unavailable"));
}

#[test]
fn test_lookup_json() {
    let dir = TempDir::new().unwrap();

    scan_relocate(&dir)
        .args(["lookup", "test001", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""destination_code":"A-01-01""#))
        .stdout(predicate::str::contains(r#""quantity":10"#));
}

#[test]
fn test_lookup_unknown_code_is_not_an_error() {
    let dir = TempDir::new().unwrap();

    scan_relocate(&dir)
        .args(["lookup", "unknown999"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Code not found: UNKNOWN999"));
}

#[test]
fn test_replay_emits_json_outcomes_and_summary() {
    let dir = TempDir::new().unwrap();

    scan_relocate(&dir)
        .args(["replay", "--json"])
        .arg(data_file("scan_log.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""outcome":"FOUND""#))
        .stdout(predicate::str::contains(r#""outcome":"MISMATCH""#))
        .stdout(predicate::str::contains(r#""outcome":"NOT_FOUND""#))
        .stdout(predicate::str::contains(r#""type":"reset""#))
        .stdout(predicate::str::contains(r#""type":"summary""#))
        .stdout(predicate::str::contains(r#""processed":2"#));
}

#[test]
fn test_replay_survives_undecodable_line() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("garbled.log");
    std::fs::write(&log, b"TEST001\nA-01-01\nBAD\xff\nTEST002\nA-01-02\n").unwrap();

    scan_relocate(&dir)
        .args(["replay", "--json"])
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""outcome":"NOT_FOUND""#))
        .stdout(predicate::str::contains(r#""type":"summary""#))
        .stdout(predicate::str::contains(r#""processed":2"#));
}

#[test]
fn test_replay_of_missing_log_fails() {
    let dir = TempDir::new().unwrap();

    scan_relocate(&dir)
        .args(["replay", "no-such-log.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open scan log"));
}

#[test]
fn test_scan_session_from_stdin() {
    let dir = TempDir::new().unwrap();

    scan_relocate(&dir)
        .arg("scan")
        .write_stdin("TEST001\nB-01-01\nA-01-01\n:history\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("GO TO A-01-01"))
        .stdout(predicate::str::contains("Wrong location: B-01-01"))
        .stdout(predicate::str::contains("SUCCESS! 10 piece(s) moved"))
        .stdout(predicate::str::contains("TEST001 → A-01-01 (10)"))
        .stdout(predicate::str::contains("SESSION SUMMARY"));
}

#[test]
fn test_scan_quit_command_ends_session() {
    let dir = TempDir::new().unwrap();

    scan_relocate(&dir)
        .args(["scan", "--input", "manual"])
        .write_stdin("TEST002\n:quit\nA-01-02\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unconfirmed move: TEST002 → A-01-02"))
        .stdout(predicate::str::contains("Processed: 0"));
}

#[test]
fn test_init_writes_config_once() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("scan-relocate.toml");

    scan_relocate(&dir)
        .args(["init", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would create configuration file"));
    assert!(!config_path.exists());

    scan_relocate(&dir).arg("init").assert().success();
    let written = std::fs::read_to_string(&config_path).unwrap();
    assert!(written.contains("[table]"));

    scan_relocate(&dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Use --force to overwrite"));
}

#[test]
fn test_config_file_sets_table_path() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("custom.toml");
    let table = data_file("locations.csv");
    std::fs::write(
        &config_path,
        format!("[table]\npath = {:?}\n", table.to_string_lossy()),
    )
    .unwrap();

    Command::cargo_bin("scan-relocate")
        .unwrap()
        .current_dir(dir.path())
        .arg("--config")
        .arg(&config_path)
        .args(["lookup", "L-10-06-5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Destination: C-02-03"));
}

#[test]
fn test_protected_markers_from_environment() {
    let dir = TempDir::new().unwrap();

    scan_relocate(&dir)
        .env("SCAN_RELOCATE__NORMALIZATION__PROTECTED_MARKERS", "QUAI,DELTA")
        .args(["normalize", "qq-1-quai", "bb-2-x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("qq-1-quai → QQ-1-QUAI"))
        .stdout(predicate::str::contains("bb-2-x → B-2-X"));
}

#[test]
fn test_malformed_env_file_is_reported_not_fatal() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".env"), "this is not an assignment\n").unwrap();

    scan_relocate(&dir)
        .args(["normalize", "aa-1-23"])
        .assert()
        .success()
        .stdout(predicate::str::contains("aa-1-23 → A-1-23"))
        .stderr(predicate::str::contains("Ignoring unreadable .env file"));
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let dir = TempDir::new().unwrap();

    Command::cargo_bin("scan-relocate")
        .unwrap()
        .current_dir(dir.path())
        .args(["--config", "absent.toml", "table"])
        .assert()
        .failure();
}
