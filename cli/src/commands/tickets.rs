//! `fct tickets`: tracker issues referenced by commits between two refs.

use anyhow::Result;
use clap::{Args, ValueEnum};

use crate::app::AppContext;
use crate::application::ports::ServiceClient;
use crate::application::services::tickets::{self, TicketReport};
use crate::domain::{IssueFilter, IssueSelection, ReportMode};
use crate::infra::redmine::RedmineClient;

/// Arguments for the tickets command.
#[derive(Args)]
pub struct TicketsArgs {
    /// Commits reachable from this ref...
    #[arg(long, default_value = "origin/dev")]
    pub from: String,
    /// ...and not from this one
    #[arg(long, default_value = "origin/master")]
    pub to: String,
    /// Saved query to list issues from
    #[arg(long, conflicts_with = "version_id")]
    pub query_id: Option<u32>,
    /// Target version (milestone) to list issues from
    #[arg(long)]
    pub version_id: Option<u32>,
    /// Restrict the listing to one project
    #[arg(long)]
    pub project: Option<String>,
    /// Look up each referenced ticket directly instead of listing
    #[arg(long, conflicts_with_all = ["query_id", "version_id", "project"])]
    pub by_ids: bool,
    /// Line format
    #[arg(long, value_enum, default_value_t = ModeArg::Subject)]
    pub mode: ModeArg,
}

/// Report line formats accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Bare link
    Url,
    /// `#id status`
    Status,
    /// `#id status link subject`
    Full,
    /// `#id subject`
    Subject,
}

impl From<ModeArg> for ReportMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Url => Self::Url,
            ModeArg::Status => Self::Status,
            ModeArg::Full => Self::Full,
            ModeArg::Subject => Self::Subject,
        }
    }
}

impl TicketsArgs {
    fn into_report(self) -> TicketReport {
        let selection = if self.by_ids {
            IssueSelection::ByIds
        } else {
            IssueSelection::Filter(IssueFilter {
                query_id: self.query_id,
                fixed_version_id: self.version_id,
                project_id: self.project,
            })
        };
        TicketReport {
            from: self.from,
            to: self.to,
            selection,
            mode: self.mode.into(),
        }
    }
}

/// Run the tickets command.
///
/// # Errors
///
/// Returns an error on missing settings, git failure or a failed Redmine call.
pub async fn run(app: &AppContext, args: TicketsArgs) -> Result<()> {
    let settings = app.settings()?;
    let runner = app.runner();
    let lines = tickets::report(
        &settings,
        RedmineClient::connect,
        &runner,
        &args.into_report(),
    )
    .await?;
    for line in &lines {
        app.output.line(line);
    }
    Ok(())
}
