//! Integration tests for argument parsing and the command tree.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn fct() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fct"));
    cmd.env("NO_COLOR", "1");
    cmd
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    fct()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Developer-environment toolbelt"));
}

#[test]
fn test_cli_help_flag_shows_help() {
    fct()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    fct()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fct"));
}

// --- Command hierarchy tests ---

#[test]
fn test_help_lists_every_command() {
    let assert = fct().arg("--help").assert().success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    for command in [
        "repo", "jenkins", "tracker", "tickets", "join", "start", "config", "update", "git",
    ] {
        assert!(output.contains(command), "help is missing `{command}`:\n{output}");
    }
}

#[test]
fn test_repo_help_shows_subcommands() {
    fct()
        .args(["repo", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("assign"));
}

#[test]
fn test_join_requires_slug_and_developer() {
    fct()
        .args(["join", "shop"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("<DEVELOPER>"));
}

#[test]
fn test_tickets_rejects_query_with_version() {
    fct()
        .args(["tickets", "--query-id", "1", "--version-id", "2"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_repo_assign_rejects_unknown_role() {
    fct()
        .args(["repo", "assign", "shop", "dev@example.com", "--role", "owner"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value 'owner'"));
}

#[test]
fn test_jenkins_var_must_be_key_value() {
    fct()
        .args(["jenkins", "create-job", "shop", "shop-tests", "--var", "novalue"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn test_git_help_lists_prune_and_branch() {
    fct()
        .args(["git", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("prune"))
        .stdout(predicate::str::contains("branch"));
}

#[test]
fn test_git_branch_requires_mask() {
    fct()
        .args(["git", "branch"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("<MASK>"));
}

#[test]
fn test_unknown_command_fails() {
    fct()
        .arg("provision")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
