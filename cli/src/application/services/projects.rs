//! Project and membership provisioning on GitLab or Redmine.

use anyhow::Result;

use crate::application::ports::{ProgressReporter, ProjectHost};
use crate::domain::project;
use crate::domain::{Created, Membership};

/// Create `slug` on `host`. An existing project is reported, not an error.
///
/// # Errors
///
/// Fails on an invalid slug or an unexpected service answer.
pub fn create_project<H: ProjectHost>(
    host: &H,
    reporter: &impl ProgressReporter,
    service: &str,
    slug: &str,
    name: Option<&str>,
) -> Result<Created<String>> {
    project::validate_name("project slug", slug)?;
    let created = host.create_project(slug, name)?;
    match &created {
        Created::New(path) => reporter.success(&format!("created {service} project {path}")),
        Created::AlreadyExists => {
            tracing::warn!(service, slug, "project already exists");
            reporter.warn(&format!("{service} project {slug} already exists"));
        }
    }
    Ok(created)
}

/// Add the user with `email` to `slug`. A refused membership is reported,
/// not an error.
///
/// # Errors
///
/// Fails when the project or user does not exist, or on transport errors.
pub fn assign_member<H: ProjectHost>(
    host: &H,
    reporter: &impl ProgressReporter,
    service: &str,
    slug: &str,
    email: &str,
    role: H::Role,
) -> Result<Membership> {
    project::validate_name("project slug", slug)?;
    let membership = host.assign_member(slug, email, role)?;
    match &membership {
        Membership::Added => reporter.success(&format!("added {email} to {service} project {slug}")),
        Membership::NotAdded(body) => reporter.warn(&format!(
            "{service} did not add {email} to {slug} (already a member?): {}",
            body.trim()
        )),
    }
    Ok(membership)
}
