//! Ticket diff report: tracker issues referenced by commits between two refs.

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, IssueTracker};
use crate::domain::config::Settings;
use crate::domain::tickets::{self, IssueSelection, ReportMode};
use crate::domain::ToolbeltError;

/// Which commits to scan and how to report them.
#[derive(Debug, Clone)]
pub struct TicketReport {
    /// Commits reachable from here...
    pub from: String,
    /// ...but not from here.
    pub to: String,
    pub selection: IssueSelection,
    pub mode: ReportMode,
}

/// Subjects of the non-merge commits in `from` but not in `to`.
///
/// # Errors
///
/// Fails if `git log` cannot run or exits non-zero.
pub async fn commit_subjects(runner: &impl CommandRunner, from: &str, to: &str) -> Result<Vec<String>> {
    let args = ["log", from, "--not", to, "--format=%s", "--no-merges"];
    let output = runner.run("git", &args).await.context("failed to run git log")?;
    if !output.status.success() {
        return Err(ToolbeltError::remote_execution(
            format!("git {}", args.join(" ")),
            "local",
            output.status.code(),
            &String::from_utf8_lossy(&output.stderr),
        )
        .into());
    }
    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect())
}

/// Build the report lines.
///
/// The tracker is connected before git runs so a missing credential fails
/// fast. With no referenced tickets the tracker is never queried.
///
/// # Errors
///
/// Fails on an invalid filter, a missing setting, git errors or tracker
/// errors.
pub async fn report<T: IssueTracker>(
    settings: &Settings,
    connect: impl FnOnce(&Settings) -> Result<T>,
    runner: &impl CommandRunner,
    request: &TicketReport,
) -> Result<Vec<String>> {
    if let IssueSelection::Filter(filter) = &request.selection {
        filter.validate()?;
    }
    let tracker = connect(settings)?;

    let subjects = commit_subjects(runner, &request.from, &request.to).await?;
    let ids = tickets::extract_ticket_ids(&subjects);
    tracing::debug!(commits = subjects.len(), tickets = ids.len(), "scanned commits");
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let issues = match &request.selection {
        IssueSelection::ByIds => tracker.issues_by_ids(&ids)?,
        IssueSelection::Filter(filter) => tracker.list_issues(filter)?,
    };
    Ok(tickets::select_referenced(issues, &ids)
        .iter()
        .map(|issue| request.mode.format(issue, tracker.base_url()))
        .collect())
}
