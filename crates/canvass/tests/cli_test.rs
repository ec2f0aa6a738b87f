//! Integration tests for the `canvass` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and error handling -- all without requiring a live platform.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `canvass` binary with env isolation.
///
/// Clears all `CANVASS_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn canvass_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("canvass");
    cmd.env("HOME", "/tmp/canvass-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/canvass-cli-test-nonexistent")
        .env_remove("CANVASS_PROFILE")
        .env_remove("CANVASS_URL")
        .env_remove("CANVASS_EMAIL")
        .env_remove("CANVASS_PASSWORD")
        .env_remove("CANVASS_OUTPUT")
        .env_remove("CANVASS_INSECURE")
        .env_remove("CANVASS_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = canvass_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    canvass_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("campaigns"))
        .stdout(predicate::str::contains("prospects"))
        .stdout(predicate::str::contains("landingpages"))
        .stdout(predicate::str::contains("outbox"));
}

#[test]
fn test_version_flag() {
    canvass_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("canvass"));
}

#[test]
fn test_unknown_subcommand_fails() {
    canvass_cmd()
        .arg("frobnicate")
        .assert()
        .failure()
        .code(2);
}

// ── Filter flag parsing ─────────────────────────────────────────────

#[test]
fn test_exact_age_conflicts_with_range() {
    let output = canvass_cmd()
        .args(["prospects", "count", "--age", "30", "--min-age", "25"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("cannot be used with"),
        "Expected conflict error:\n{text}"
    );
}

#[test]
fn test_list_all_conflicts_with_page() {
    let output = canvass_cmd()
        .args(["campaigns", "list", "--all", "--page", "3"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Connection-requiring commands without config ────────────────────

#[test]
fn test_whoami_without_config_fails_cleanly() {
    let output = canvass_cmd().arg("whoami").output().unwrap();
    assert_ne!(output.status.code(), Some(0));
    let text = combined_output(&output);
    assert!(
        text.contains("No configuration") || text.contains("config"),
        "Expected a config hint:\n{text}"
    );
}

#[test]
fn test_url_without_email_reports_missing_credentials() {
    let output = canvass_cmd()
        .args(["whoami", "--url", "https://example.com"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3), "auth exit code expected");
    let text = combined_output(&output);
    assert!(
        text.contains("credentials"),
        "Expected credentials hint:\n{text}"
    );
}

// ── Config commands (no connection needed) ──────────────────────────

#[test]
fn test_config_path_prints_a_path() {
    canvass_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_reports_empty_profiles() {
    canvass_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(none)"));
}

// ── Completions ─────────────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    canvass_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("canvass"));
}

#[test]
fn test_completions_rejects_unknown_shell() {
    canvass_cmd()
        .args(["completions", "tcsh"])
        .assert()
        .failure()
        .code(2);
}
