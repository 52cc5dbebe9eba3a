use assert_cmd::{cargo}; // handy crate for testing CLIs
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn git(dir: &Path, args: &[&str]) -> bool {
    Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// A fresh repository with an empty config file, or None when git is unavailable.
fn scratch_repo() -> Option<TempDir> {
    let temp = TempDir::new().unwrap();
    if !git(temp.path(), &["init", "-q"]) {
        return None;
    }
    fs::write(temp.path().join("gitscribe.toml"), "").unwrap();
    Some(temp)
}

#[test]
fn prints_help() {
    let mut cmd = cargo::cargo_bin_cmd!();

    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("--pr"))
        .stdout(predicate::str::contains("--amend"));
}

#[test]
fn prints_version() {
    let mut cmd = cargo::cargo_bin_cmd!();

    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn rejects_pr_with_amend() {
    let mut cmd = cargo::cargo_bin_cmd!();

    cmd.args(["--pr", "--amend"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn missing_explicit_config_is_an_error() {
    let temp = TempDir::new().unwrap();
    let mut cmd = cargo::cargo_bin_cmd!();

    cmd.current_dir(temp.path())
        .args(["--no-model", "--config", "does-not-exist.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load configuration"));
}

#[test]
fn empty_staged_diff_is_reported() {
    let Some(repo) = scratch_repo() else { return };
    let mut cmd = cargo::cargo_bin_cmd!();

    cmd.current_dir(repo.path())
        .args(["--no-model", "--config", "gitscribe.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no changes staged"));
}

#[test]
fn staged_change_produces_preview_without_model() {
    let Some(repo) = scratch_repo() else { return };
    fs::write(repo.path().join("hello.txt"), "hello\n").unwrap();
    assert!(git(repo.path(), &["add", "hello.txt"]));

    let mut cmd = cargo::cargo_bin_cmd!();

    cmd.current_dir(repo.path())
        .args(["--no-model", "--config", "gitscribe.toml", "--max-title-length", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("----- Commit Message Preview -----"))
        .stdout(predicate::str::contains("Dummy\n"))
        .stdout(predicate::str::contains("Last user turn: Here is the git diff:"));
}
