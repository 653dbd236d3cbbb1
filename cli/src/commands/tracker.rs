//! `fct tracker`: Redmine projects and memberships.

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ServiceClient;
use crate::application::services::projects;
use crate::infra::redmine::RedmineClient;

/// Tracker subcommands.
#[derive(Subcommand)]
pub enum TrackerCommand {
    /// Create a tracker project
    CreateProject {
        /// Project identifier
        slug: String,
        /// Display name (defaults to the slug)
        #[arg(long)]
        name: Option<String>,
    },
    /// Grant the developer role to a user
    Assign {
        /// Project identifier
        slug: String,
        /// Email of an existing Redmine user
        email: String,
    },
}

/// Run the tracker command.
///
/// # Errors
///
/// Returns an error on missing settings or a failed Redmine call.
pub fn run(app: &AppContext, cmd: TrackerCommand) -> Result<()> {
    let settings = app.settings()?;
    let reporter = app.reporter();
    match cmd {
        TrackerCommand::CreateProject { slug, name } => {
            let client = RedmineClient::connect(&settings)?;
            projects::create_project(&client, &reporter, RedmineClient::NAME, &slug, name.as_deref())?;
        }
        TrackerCommand::Assign { slug, email } => {
            let role = RedmineClient::developer_role(&settings)?;
            let client = RedmineClient::connect(&settings)?;
            projects::assign_member(&client, &reporter, RedmineClient::NAME, &slug, &email, role)?;
        }
    }
    Ok(())
}
