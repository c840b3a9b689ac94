//! End-to-end tests for the peerbump CLI
//!
//! These tests verify:
//! - Help and version output
//! - Startup failures for missing or malformed package.json
//! - Runs that need no registry access leave files unchanged
//! - Registry failures abort before any write

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Closed local port, so registry requests fail fast
const UNREACHABLE_REGISTRY: &str = "http://127.0.0.1:9";

fn peerbump() -> Command {
    let mut cmd = Command::cargo_bin("peerbump").unwrap();
    cmd.env_remove("RUST_LOG").env("CLICOLOR", "0").env("NO_COLOR", "1");
    cmd
}

fn project(package_json: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    fs::write(dir.path().join("package.json"), package_json).unwrap();
    dir
}

#[test]
fn test_help_prints_usage() {
    peerbump()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--commit-prefix"));
}

#[test]
fn test_help_does_not_touch_manifest() {
    let content = r#"{"dependencies":{"a":"1.0.0"}}"#;
    let dir = project(content);

    peerbump().arg("-h").arg(dir.path()).assert().success();

    assert_eq!(fs::read_to_string(dir.path().join("package.json")).unwrap(), content);
}

#[test]
fn test_version() {
    peerbump()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("peerbump "));
}

#[test]
fn test_missing_package_json_is_fatal() {
    let dir = tempfile::tempdir().unwrap();

    peerbump()
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("manifest file not found"));
}

#[test]
fn test_invalid_package_json_is_fatal() {
    let dir = project("{ not json");

    peerbump()
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse JSON"));
}

#[test]
fn test_invalid_section_is_fatal() {
    let dir = project(r#"{"devDependencies": {"a": 1}}"#);

    peerbump()
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid devDependencies"));
}

#[test]
fn test_manifest_without_sections() {
    let content = "{\n  \"name\": \"empty\"\n}\n";
    let dir = project(content);

    peerbump()
        .args(["--registry", UNREACHABLE_REGISTRY])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("dependencies: not present"))
        .stdout(predicate::str::contains("devDependencies: not present"));

    assert_eq!(fs::read_to_string(dir.path().join("package.json")).unwrap(), content);
}

#[test]
fn test_empty_sections_need_no_update() {
    let dir = project(r#"{"dependencies": {}, "devDependencies": {}}"#);

    peerbump()
        .args(["--registry", UNREACHABLE_REGISTRY])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("dependencies: up to date"));
}

#[test]
fn test_registry_failure_aborts_without_writing() {
    let content = r#"{"dependencies": {"left-pad": "1.0.0"}}"#;
    let dir = project(content);

    peerbump()
        .args(["--registry", UNREACHABLE_REGISTRY])
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: failed to update dependencies"));

    assert_eq!(fs::read_to_string(dir.path().join("package.json")).unwrap(), content);
}
