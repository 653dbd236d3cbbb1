//! CI job creation from a template job.

use anyhow::Result;

use crate::application::ports::{JobServer, ProgressReporter};
use crate::domain::project;
use crate::domain::template::{self, TemplateContext};

/// Placeholder context for a job: `project` plus any extra variables.
/// Extra variables win over `project`.
#[must_use]
pub fn job_context(slug: &str, vars: &[(String, String)]) -> TemplateContext {
    let mut ctx = template::context([("project", slug)]);
    ctx.extend(vars.iter().cloned());
    ctx
}

/// Copy `template` into `job` for `slug` and kick off its first build.
/// Returns the job URL.
///
/// # Errors
///
/// Fails on an invalid slug or any failed Jenkins call.
pub fn create_job(
    server: &impl JobServer,
    reporter: &impl ProgressReporter,
    template: &str,
    job: &str,
    slug: &str,
    vars: &[(String, String)],
) -> Result<String> {
    project::validate_name("project slug", slug)?;
    let url = server.create_job(template, job, &job_context(slug, vars))?;
    reporter.success(&format!("created job {job} from {template}: {url}"));
    Ok(url)
}
