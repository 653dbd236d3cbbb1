//! `fct update`: refresh the project checkout in the current directory.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::maintenance;

/// Run the update command.
///
/// # Errors
///
/// Returns an error if installing packages, migrating or reloading fails.
pub async fn run(app: &AppContext) -> Result<()> {
    app.output.header("Update process started");
    maintenance::update_checkout(&app.local_shell(), &app.reporter()).await
}
