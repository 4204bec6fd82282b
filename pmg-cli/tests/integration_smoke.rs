//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

fn pmg() -> Command {
    let mut cmd = Command::cargo_bin("pmg").unwrap();
    // Keep a developer's config file out of the tests
    cmd.env("PMG_CONFIG", "/nonexistent/pmg.toml");
    cmd
}

#[test]
fn test_help_lists_commands() {
    pmg()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("web"))
        .stdout(predicate::str::contains("migrate"))
        .stdout(predicate::str::contains("report"));
}

#[test]
fn test_serve_help() {
    pmg()
        .arg("serve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--no-migrate"))
        .stdout(predicate::str::contains("--cors-permissive"));
}

#[test]
fn test_web_help() {
    pmg()
        .arg("web")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Base URL of the JSON API"));
}

#[test]
fn test_report_run_help() {
    pmg()
        .arg("report")
        .arg("run")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--xlsx"));
}

#[test]
fn test_report_list_needs_no_database() {
    pmg()
        .arg("report")
        .arg("list")
        .env_remove("DATABASE_URL")
        .assert()
        .success()
        .stdout(predicate::str::contains("  1  "));
}

#[test]
fn test_unknown_report_fails() {
    pmg()
        .arg("report")
        .arg("run")
        .arg("999")
        .assert()
        .failure()
        .stderr(predicate::str::contains("report 999 not found"));
}

#[test]
fn test_report_id_must_be_numeric() {
    pmg().arg("report").arg("run").arg("abc").assert().failure();
}

#[test]
fn test_invalid_config_is_reported() {
    let config = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(config.path(), "[api\nbind = ").unwrap();

    Command::cargo_bin("pmg")
        .unwrap()
        .env("PMG_CONFIG", config.path())
        .arg("report")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
