//! `fct join` and `fct start`: provision developer instances.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ServiceClient;
use crate::application::services::boilerplate;
use crate::application::services::join::{self, JoinRequest};
use crate::infra::gitlab::GitLabClient;
use crate::infra::templates;

/// Arguments shared by `join` and `start`.
#[derive(Args)]
pub struct JoinArgs {
    /// Project slug
    pub slug: String,
    /// Developer login on the provisioning host
    pub developer: String,
    /// Password for the developer's database account
    #[arg(long, default_value = "")]
    pub db_password: String,
    /// Write the nginx config without reloading nginx
    #[arg(long)]
    pub no_reload: bool,
}

/// Arguments for `start`.
#[derive(Args)]
pub struct StartArgs {
    #[command(flatten)]
    pub join: JoinArgs,
    /// Display name of the new repository (defaults to the slug)
    #[arg(long)]
    pub name: Option<String>,
}

impl JoinArgs {
    fn request(&self) -> JoinRequest {
        JoinRequest {
            slug: self.slug.clone(),
            developer: self.developer.clone(),
            db_password: self.db_password.clone(),
            reload: !self.no_reload,
        }
    }
}

/// Run the join command.
///
/// # Errors
///
/// Returns an error at the first failing provisioning step.
pub async fn run_join(app: &AppContext, args: &JoinArgs) -> Result<()> {
    let settings = app.settings()?;
    let shell = app.host_shell(&settings);
    let url = join::join(
        &settings,
        GitLabClient::connect,
        &shell,
        &app.reporter(),
        templates::server_templates()?,
        &args.request(),
    )
    .await?;
    app.output.line(&url);
    Ok(())
}

/// Run the start command.
///
/// # Errors
///
/// Returns an error at the first failing step.
pub async fn run_start(app: &AppContext, args: &StartArgs) -> Result<()> {
    let settings = app.settings()?;
    let shell = app.host_shell(&settings);
    let url = boilerplate::start(
        &settings,
        GitLabClient::connect,
        &shell,
        &app.reporter(),
        templates::server_templates()?,
        &args.join.request(),
        args.name.as_deref(),
    )
    .await?;
    app.output.line(&url);
    Ok(())
}
