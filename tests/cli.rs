// ABOUTME: Integration tests for the preview-wait CLI commands.
// ABOUTME: Validates --help output, init behavior, and early wait failures.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn preview_wait_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("preview-wait"));
    for var in [
        "GITHUB_TOKEN",
        "GITHUB_ACTIONS",
        "GITHUB_OUTPUT",
        "INPUT_TOKEN",
        "INPUT_VERCEL_PASSWORD",
        "INPUT_VERCEL_PROTECTION_BYPASS_HEADER",
        "INPUT_MAX_TIMEOUT",
        "INPUT_CHECK_INTERVAL",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn help_shows_commands() {
    preview_wait_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("wait"));
}

#[test]
fn wait_help_lists_inputs() {
    preview_wait_cmd()
        .args(["wait", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--max-timeout"))
        .stdout(predicate::str::contains("--vercel-password"))
        .stdout(predicate::str::contains("--allow-inactive"));
}

#[test]
fn init_creates_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("preview-wait.yml");

    preview_wait_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .success();

    assert!(config_path.exists(), "preview-wait.yml should be created");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("max_timeout:"));
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("preview-wait.yml"), "path: /\n").unwrap();

    preview_wait_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn wait_without_token_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    preview_wait_cmd()
        .current_dir(temp_dir.path())
        .args(["wait", "--repository", "acme/site", "--sha", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing GitHub token"));
}

#[test]
fn wait_rejects_zero_interval() {
    let temp_dir = tempfile::tempdir().unwrap();

    preview_wait_cmd()
        .current_dir(temp_dir.path())
        .args([
            "wait",
            "--token",
            "t",
            "--check-interval",
            "0",
            "--repository",
            "acme/site",
            "--sha",
            "abc",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("check_interval"));
}

#[test]
fn sha_and_pull_request_conflict() {
    preview_wait_cmd()
        .args(["wait", "--sha", "abc", "--pull-request", "3"])
        .assert()
        .failure();
}

#[test]
fn actions_runner_gets_error_annotation() {
    let temp_dir = tempfile::tempdir().unwrap();

    preview_wait_cmd()
        .current_dir(temp_dir.path())
        .env("GITHUB_ACTIONS", "true")
        .args(["wait", "--repository", "acme/site", "--sha", "abc"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("::error::missing GitHub token"));
}
