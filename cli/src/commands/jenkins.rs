//! `fct jenkins`: CI jobs from a template job.

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ServiceClient;
use crate::application::services::jobs;
use crate::domain::ToolbeltError;
use crate::infra::jenkins::JenkinsClient;

/// Jenkins subcommands.
#[derive(Subcommand)]
pub enum JenkinsCommand {
    /// Copy the template job, fill in `{{project}}`, enable and build it
    CreateJob {
        /// Project slug substituted for `{{project}}`
        slug: String,
        /// Name of the new job
        job: String,
        /// Template job (defaults to JENKINS_TEMPLATE_JOB, then `example-tests`)
        template: Option<String>,
        /// Extra `key=value` substituted for `{{key}}`
        #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
        vars: Vec<(String, String)>,
    },
}

/// Parse a `key=value` pair.
///
/// # Errors
///
/// Fails when there is no `=` or the key is empty.
pub fn parse_var(raw: &str) -> Result<(String, String), ToolbeltError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(ToolbeltError::InvalidInput(format!(
            "expected KEY=VALUE, got '{raw}'"
        ))),
    }
}

/// Run the jenkins command.
///
/// # Errors
///
/// Returns an error on missing settings or a failed Jenkins call.
pub fn run(app: &AppContext, cmd: JenkinsCommand) -> Result<()> {
    let settings = app.settings()?;
    match cmd {
        JenkinsCommand::CreateJob {
            slug,
            job,
            template,
            vars,
        } => {
            let client = JenkinsClient::connect(&settings)?;
            let template = template.unwrap_or_else(|| client.default_template().to_string());
            jobs::create_job(&client, &app.reporter(), &template, &job, &slug, &vars)?;
        }
    }
    Ok(())
}
