//! Local checkout helpers: `update`, `git prune` and `git branch`.

use anyhow::{Context, Result};
use regex::Regex;

use crate::application::ports::{CommandRunner, ProgressReporter, ShellRunner};
use crate::application::services::exec;
use crate::domain::{ShellCommand, ToolbeltError};

/// Branches never offered for deletion.
pub const PROTECTED_BRANCHES: &[&str] = &["HEAD", "dev", "master"];

/// Pull, install requirements, migrate, then poke the reload file.
///
/// A failing `git pull` (e.g. not a git checkout) is only a warning.
///
/// # Errors
///
/// Fails on the first failing install, migrate or touch.
pub async fn update_checkout(shell: &impl ShellRunner, reporter: &impl ProgressReporter) -> Result<()> {
    reporter.step("updating code");
    exec::run(shell, reporter, &ShellCommand::new("git").arg("pull").best_effort()).await?;

    reporter.step("installing packages");
    exec::run(
        shell,
        reporter,
        &ShellCommand::new("pip").args(["install", "-r", "requirements.txt"]),
    )
    .await?;

    reporter.step("migrating database");
    exec::run(
        shell,
        reporter,
        &ShellCommand::new("python").args(["manage.py", "migrate"]),
    )
    .await?;

    exec::run(shell, reporter, &ShellCommand::new("touch").arg("../reload.txt")).await?;
    reporter.success("application reloaded");
    Ok(())
}

/// Remote branches merged into `origin/master`, minus the protected ones.
///
/// # Errors
///
/// Fails if `git branch` cannot run or exits non-zero.
pub async fn merged_branches(runner: &impl CommandRunner) -> Result<Vec<String>> {
    let listing = git_stdout(runner, &["branch", "-r", "--merged", "origin/master"]).await?;
    Ok(parse_merged(&listing))
}

/// The most recently committed ref whose short name matches `mask` (a
/// regular expression, unanchored).
///
/// # Errors
///
/// Fails on an invalid mask, if `git for-each-ref` fails, or when no ref
/// matches.
pub async fn branch_by_mask(runner: &impl CommandRunner, mask: &str) -> Result<String> {
    let pattern = Regex::new(mask)
        .map_err(|e| ToolbeltError::InvalidInput(format!("bad branch mask {mask:?}: {e}")))?;
    let listing = git_stdout(
        runner,
        &["for-each-ref", "--sort=committerdate", "--format=%(refname:short)"],
    )
    .await?;
    newest_matching(&listing, &pattern)
        .map(str::to_string)
        .ok_or_else(|| ToolbeltError::NotFound(format!("no git branch matches {mask:?}")).into())
}

/// Last line of a `--sort=committerdate` listing that matches `pattern`.
#[must_use]
pub fn newest_matching<'a>(listing: &'a str, pattern: &Regex) -> Option<&'a str> {
    listing
        .lines()
        .rev()
        .map(str::trim)
        .find(|name| !name.is_empty() && pattern.is_match(name))
}

async fn git_stdout(runner: &impl CommandRunner, args: &[&str]) -> Result<String> {
    let output = runner
        .run("git", args)
        .await
        .with_context(|| format!("failed to run git {}", args.join(" ")))?;
    if !output.status.success() {
        return Err(ToolbeltError::remote_execution(
            format!("git {}", args.join(" ")),
            "local",
            output.status.code(),
            &String::from_utf8_lossy(&output.stderr),
        )
        .into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Branch names from `git branch -r` output, `origin/` stripped.
#[must_use]
pub fn parse_merged(listing: &str) -> Vec<String> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.contains("->"))
        .map(|line| line.strip_prefix("origin/").unwrap_or(line))
        .filter(|name| !PROTECTED_BRANCHES.contains(name))
        .map(str::to_string)
        .collect()
}

/// The push command that deletes `branches`, or `None` if there is nothing
/// to delete.
#[must_use]
pub fn prune_command(branches: &[String]) -> Option<String> {
    if branches.is_empty() {
        return None;
    }
    let refs: Vec<String> = branches.iter().map(|b| format!(":{b}")).collect();
    Some(format!("git push origin {}", refs.join(" ")))
}
