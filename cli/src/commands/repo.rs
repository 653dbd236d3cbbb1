//! `fct repo`: GitLab repositories and their members.

use anyhow::Result;
use clap::{Subcommand, ValueEnum};

use crate::app::AppContext;
use crate::application::ports::{RepositoryHost, ServiceClient};
use crate::application::services::projects;
use crate::domain::AccessLevel;
use crate::infra::gitlab::GitLabClient;

/// Repository subcommands.
#[derive(Subcommand)]
pub enum RepoCommand {
    /// Create a repository (no members are assigned)
    Create {
        /// Project slug, used as the repository path
        slug: String,
        /// Display name (defaults to the slug)
        #[arg(long)]
        name: Option<String>,
    },
    /// Add a member to a repository
    Assign {
        /// Project slug
        slug: String,
        /// Email of an existing GitLab user
        email: String,
        /// Access level granted
        #[arg(long, value_enum, default_value_t = RoleArg::Developer)]
        role: RoleArg,
    },
}

/// GitLab access levels accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Guest,
    Reporter,
    Developer,
    Maintainer,
}

impl From<RoleArg> for AccessLevel {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Guest => Self::Guest,
            RoleArg::Reporter => Self::Reporter,
            RoleArg::Developer => Self::Developer,
            RoleArg::Maintainer => Self::Maintainer,
        }
    }
}

/// Run the repo command.
///
/// # Errors
///
/// Returns an error on missing settings or a failed GitLab call.
pub fn run(app: &AppContext, cmd: RepoCommand) -> Result<()> {
    let settings = app.settings()?;
    let client = GitLabClient::connect(&settings)?;
    let reporter = app.reporter();
    match cmd {
        RepoCommand::Create { slug, name } => {
            projects::create_project(
                &client,
                &reporter,
                GitLabClient::NAME,
                &slug,
                name.as_deref(),
            )?;
            app.output.kv("web", &client.web_url(&slug));
            app.output.kv("clone", &client.clone_url(&slug));
        }
        RepoCommand::Assign { slug, email, role } => {
            projects::assign_member(
                &client,
                &reporter,
                GitLabClient::NAME,
                &slug,
                &email,
                role.into(),
            )?;
        }
    }
    Ok(())
}
