//! Shared test helpers for integration tests
//!
//! This module provides common utilities used across all test files.

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to get a tcf command isolated inside `tmp`
///
/// The store, export directory and config home all live in the temp dir.
pub fn tcf(tmp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("tcf"));
    cmd.current_dir(tmp.path())
        .env("HOME", tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path().join("config"))
        .env("XDG_DATA_HOME", tmp.path().join("data"))
        .env("TCF_STORE", store_path(tmp))
        .env("TCF_OUTPUT_DIR", tmp.path().join("out"))
        .env_remove("TCF_RENDERER")
        .env_remove("TCF_LOG");
    cmd
}

/// Path of the case store used by [`tcf`]
pub fn store_path(tmp: &TempDir) -> PathBuf {
    tmp.path().join("cases.yaml")
}

/// Helper to create a test case and return its id
pub fn create_test_case(tmp: &TempDir, title: &str, precondition: &str) -> String {
    let output = tcf(tmp)
        .args([
            "case",
            "new",
            "--title",
            title,
            "--precondition",
            precondition,
            "--format",
            "id",
        ])
        .output()
        .unwrap();

    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Helper to add a step to a case
pub fn add_step(tmp: &TempDir, case: &str, action: &str, status: &str, expected: &str) {
    tcf(tmp)
        .args([
            "step", "add", case, "--action", action, "--status", status, "--expected", expected,
        ])
        .assert()
        .success();
}

/// Build the "Login" case: enter creds, submit (after step 1, branch "invalid" back to step 1)
pub fn create_login_case(tmp: &TempDir) -> String {
    let id = create_test_case(tmp, "Login", "user exists");
    tcf(tmp)
        .args(["step", "set", &id, "1", "--action", "enter creds"])
        .assert()
        .success();
    tcf(tmp)
        .args([
            "step",
            "add",
            &id,
            "--action",
            "submit",
            "--expected",
            "redirect",
            "--depends-on",
            "1",
        ])
        .assert()
        .success();
    tcf(tmp)
        .args(["branch", "add", &id, "2", "--condition", "invalid", "--next", "1"])
        .assert()
        .success();
    id
}
