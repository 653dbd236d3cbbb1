//! `fct git`: git housekeeping.

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::services::maintenance;

/// Git subcommands.
#[derive(Subcommand)]
pub enum GitCommand {
    /// Print the command that deletes remote branches merged into master
    Prune,
    /// Print the most recently committed branch whose name matches a mask
    Branch {
        /// Regular expression matched against short ref names
        mask: String,
    },
}

/// Run the git command.
///
/// # Errors
///
/// Returns an error if git fails, or if no branch matches the mask.
pub async fn run(app: &AppContext, cmd: GitCommand) -> Result<()> {
    match cmd {
        GitCommand::Prune => {
            let branches = maintenance::merged_branches(&app.runner()).await?;
            match maintenance::prune_command(&branches) {
                Some(command) => app.output.line(&command),
                None => app.output.success("No old branches"),
            }
        }
        GitCommand::Branch { mask } => {
            let branch = maintenance::branch_by_mask(&app.runner(), &mask).await?;
            app.output.line(&branch);
        }
    }
    Ok(())
}
