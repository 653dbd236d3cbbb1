//! Start workflow: new repository, generated skeleton, then join.

use anyhow::Result;

use crate::application::ports::{ProgressReporter, RepositoryHost, ShellRunner};
use crate::application::services::exec;
use crate::application::services::join::{self, JoinRequest};
use crate::application::services::webserver::ServerTemplates;
use crate::domain::config::{self, Settings};
use crate::domain::project::DEFAULT_BRANCH;
use crate::domain::{Created, RunAs, ShellCommand};

/// Where the project skeleton comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkeletonSource {
    /// Git URL of the template repository.
    pub repo: String,
    /// Directory inside the template repository passed to `startproject`.
    pub package: String,
}

impl SkeletonSource {
    /// # Errors
    ///
    /// Fails naming the first missing template setting.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self {
            repo: settings.require(config::TEMPLATE_PROJECT_REPO)?.to_string(),
            package: settings.require(config::TEMPLATE_PROJECT_PACKAGE)?.to_string(),
        })
    }
}

/// Create the repository, push a generated skeleton when the repository is
/// new, then join `request.developer` to it. Returns the instance URL.
///
/// # Errors
///
/// Stops at the first failing step.
pub async fn start<H: RepositoryHost>(
    settings: &Settings,
    connect: impl FnOnce(&Settings) -> Result<H>,
    shell: &impl ShellRunner,
    reporter: &impl ProgressReporter,
    templates: ServerTemplates<'_>,
    request: &JoinRequest,
    display_name: Option<&str>,
) -> Result<String> {
    join::plan(settings, request)?;
    let source = SkeletonSource::from_settings(settings)?;
    let host = connect(settings)?;

    match host.create_project(&request.slug, display_name)? {
        Created::New(path) => {
            reporter.step(&format!("created repository {path}"));
            let clone_url = host.clone_url(&request.slug);
            generate_skeleton(shell, reporter, &source, &request.slug, &request.developer, &clone_url)
                .await?;
        }
        Created::AlreadyExists => {
            reporter.warn(&format!(
                "repository {} already exists, skipping project generation",
                request.slug
            ));
        }
    }

    join::join(settings, move |_| Ok(host), shell, reporter, templates, request).await
}

/// Name prefix of the scratch directory a skeleton is generated in.
pub const SCRATCH_PREFIX: &str = "fct-start";

/// Generate a project from the template and push it as the first commit on
/// the default branch.
///
/// # Errors
///
/// Fails on any non-cleanup step.
pub async fn generate_skeleton(
    shell: &impl ShellRunner,
    reporter: &impl ProgressReporter,
    source: &SkeletonSource,
    slug: &str,
    author: &str,
    clone_url: &str,
) -> Result<()> {
    let scratch =
        exec::make_scratch_dir(shell, reporter, SCRATCH_PREFIX, RunAs::Operator).await?;
    let template_dir = format!("{scratch}/project_template");
    let env_dir = format!("{scratch}/canned_env");
    let project_dir = format!("{scratch}/{slug}");
    let git = |args: &[&str]| {
        ShellCommand::new("git")
            .args(["-C", project_dir.as_str()])
            .args(args.iter().copied())
    };

    let steps = [
        ShellCommand::new("git").args(["clone", source.repo.as_str(), template_dir.as_str()]),
        ShellCommand::new("virtualenv").arg(env_dir.as_str()),
        ShellCommand::new(format!("{env_dir}/bin/pip")).args(["install", "django"]),
        ShellCommand::new("mkdir").args(["-p", project_dir.as_str()]),
        ShellCommand::new(format!("{env_dir}/bin/django-admin")).args([
            "startproject".to_string(),
            slug.to_string(),
            project_dir.clone(),
            format!("--template={template_dir}/{}", source.package),
            "--extension=py,gitignore".to_string(),
        ]),
        git(&["init"]),
        git(&["config", "user.email", format!("{author}@fct").as_str()]),
        git(&["config", "user.name", author]),
        git(&["add", "."]),
        git(&["commit", "-m", "Initial commit via fct"]),
        git(&["remote", "add", "origin", clone_url]),
        git(&["checkout", "-b", DEFAULT_BRANCH]),
        git(&["push", "--all", "--force"]),
        ShellCommand::new("rm").args(["-rf", scratch.as_str()]).best_effort(),
    ];
    for step in steps {
        exec::run(shell, reporter, &step).await?;
    }
    reporter.step(&format!("pushed initial {slug} skeleton to {DEFAULT_BRANCH}"));
    Ok(())
}
