//! Join workflow: give a developer a running instance of a project.
//!
//! Plan → connect → clone URL → files → database → web server → URL.
//! Every step must succeed before the next one starts; nothing is rolled
//! back when a later step fails.

use anyhow::Result;

use crate::application::ports::{ProgressReporter, RepositoryHost, ShellRunner};
use crate::application::services::database;
use crate::application::services::exec;
use crate::application::services::webserver::{self, ServerTemplates};
use crate::domain::config::{self, Settings};
use crate::domain::database::DatabaseSpec;
use crate::domain::{DeveloperLayout, RunAs, ShellCommand};

/// Name prefix of the scratch directory a join clones into.
pub const CLONE_PREFIX: &str = "fct-join";

/// Operator input for one join.
#[derive(Debug, Clone)]
pub struct JoinRequest {
    pub slug: String,
    pub developer: String,
    pub db_password: String,
    /// Reload nginx after writing its config.
    pub reload: bool,
}

/// Everything resolved from settings before the first side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinPlan {
    pub layout: DeveloperLayout,
    pub mysql_admin: String,
    pub database: DatabaseSpec,
}

/// Resolve paths, names and the database account for `request`.
///
/// # Errors
///
/// Fails on invalid names or a missing setting. Nothing has run yet.
pub fn plan(settings: &Settings, request: &JoinRequest) -> Result<JoinPlan> {
    let layout = DeveloperLayout::resolve(settings, &request.slug, &request.developer)?;
    let database = DatabaseSpec {
        name: layout.db_name.clone(),
        user: layout.developer.clone(),
        password: request.db_password.clone(),
    };
    Ok(JoinPlan {
        mysql_admin: settings
            .get_or(config::MYSQL_ADMIN_USER, config::DEFAULT_MYSQL_ADMIN)
            .to_string(),
        layout,
        database,
    })
}

/// Run the whole join workflow and return the instance URL.
///
/// `connect` builds the repository host; it is called after planning so a
/// missing path setting is reported before any credential is needed.
///
/// # Errors
///
/// Stops at the first failing step.
pub async fn join<H: RepositoryHost>(
    settings: &Settings,
    connect: impl FnOnce(&Settings) -> Result<H>,
    shell: &impl ShellRunner,
    reporter: &impl ProgressReporter,
    templates: ServerTemplates<'_>,
    request: &JoinRequest,
) -> Result<String> {
    let plan = plan(settings, request)?;
    let host = connect(settings)?;
    let clone_url = host.clone_url(&plan.layout.slug);
    tracing::info!(slug = %plan.layout.slug, developer = %plan.layout.developer, %clone_url, "joining");

    materialize_files(shell, reporter, &plan.layout, &clone_url).await?;
    database::provision_database(shell, reporter, &plan.mysql_admin, &plan.database).await?;
    webserver::write_webserver_config(shell, reporter, &plan.layout, templates, request.reload)
        .await?;

    let url = plan.layout.access_url();
    reporter.success(&format!("{} is ready at {url}", plan.layout.server_name));
    Ok(url)
}

/// Check out the project and build its virtualenv, as the developer.
///
/// The clone goes to a fresh `mktemp -d` directory owned by the developer
/// and is copied over the project directory without its `.git`, so an
/// existing checkout is refreshed in place.
///
/// # Errors
///
/// Fails on any non-cleanup step.
pub async fn materialize_files(
    shell: &impl ShellRunner,
    reporter: &impl ProgressReporter,
    layout: &DeveloperLayout,
    clone_url: &str,
) -> Result<()> {
    let dev = layout.developer.as_str();
    let project = layout.project_dir.as_str();

    let mkdir = ShellCommand::new("mkdir").args(["-p", project]).as_user(dev);
    exec::run(shell, reporter, &mkdir).await?;
    let tmp =
        exec::make_scratch_dir(shell, reporter, CLONE_PREFIX, RunAs::User(dev.to_string())).await?;

    let steps = [
        ShellCommand::new("git").args(["clone", clone_url, tmp.as_str()]),
        ShellCommand::new("rm")
            .args(["-rf", format!("{tmp}/.git").as_str()])
            .best_effort(),
        ShellCommand::new("cp").args(["-a", format!("{tmp}/.").as_str(), project]),
        ShellCommand::new("rm").args(["-rf", tmp.as_str()]).best_effort(),
        ShellCommand::new("chgrp").args(["-R", layout.group.as_str(), project]),
        ShellCommand::new("virtualenv").arg(layout.env_dir.as_str()),
        ShellCommand::new(format!("{}/bin/pip", layout.env_dir))
            .args(["install", "-r", layout.requirements_file().as_str()]),
    ];
    for step in steps {
        exec::run(shell, reporter, &step.as_user(dev)).await?;
    }
    reporter.step(&format!("checked out {} into {project}", layout.slug));
    Ok(())
}
