//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::PathBuf;
use std::process::Output;

use anyhow::Result;

use crate::domain::{
    AccessLevel, Created, Issue, IssueFilter, Membership, RemoteUser, Settings, ShellCommand,
    TemplateContext,
};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts local process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: std::time::Duration,
    ) -> Result<Output>;
    /// Run a program with stdin piped from `stdin`.
    async fn run_with_stdin(&self, program: &str, args: &[&str], stdin: &[u8]) -> Result<Output>;
}

// ── Shell Runner Port ─────────────────────────────────────────────────────────

/// Executes structured commands on the provisioning host (or locally).
///
/// `execute` only reports what happened; deciding whether a non-zero exit is
/// fatal belongs to `application::services::exec`.
#[allow(async_fn_in_trait)]
pub trait ShellRunner {
    /// Run `cmd`, feeding `cmd.stdin` if set, and capture its output.
    async fn execute(&self, cmd: &ShellCommand) -> Result<Output>;
    /// Where commands run, for messages (`"local"` or the host name).
    fn target(&self) -> &str;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Configuration Ports ───────────────────────────────────────────────────────

/// Abstracts the configuration file.
pub trait ConfigStore {
    /// Parsed settings, with environment overrides applied. A missing file
    /// yields empty settings.
    fn load(&self) -> Result<Settings>;
    /// Raw file contents, `None` if the file does not exist.
    fn read_raw(&self) -> Result<Option<String>>;
    /// Replace the file contents.
    fn save_raw(&self, contents: &str) -> Result<()>;
    /// Location of the file.
    fn path(&self) -> Result<PathBuf>;
}

/// Asks the operator for a value.
pub trait Prompter {
    /// Prompt with `default` pre-filled; returns the answer.
    fn input(&self, prompt: &str, default: &str) -> Result<String>;
}

// ── External Service Ports ────────────────────────────────────────────────────

/// Common shape of the REST clients: built from settings, nothing else.
pub trait ServiceClient: Sized {
    /// Human-readable service name used in messages.
    const NAME: &'static str;
    /// Read credentials from `settings` and build an authenticated client.
    ///
    /// # Errors
    ///
    /// Returns `ToolbeltError::Configuration` naming the first missing key.
    fn connect(settings: &Settings) -> Result<Self>;
}

/// A service that owns projects with members (GitLab, Redmine).
pub trait ProjectHost {
    /// Role granted when assigning a member.
    type Role;

    /// Create a project; an existing project is not an error.
    fn create_project(&self, slug: &str, name: Option<&str>) -> Result<Created<String>>;
    /// Exact email lookup over the user list; the first match wins.
    fn find_user_by_email(&self, email: &str) -> Result<RemoteUser>;
    /// Add a user (by email) to a project.
    fn assign_member(&self, slug: &str, email: &str, role: Self::Role) -> Result<Membership>;
}

/// A Git host: a project host that can also tell where to clone from.
pub trait RepositoryHost: ProjectHost<Role = AccessLevel> {
    /// Clone URL for `slug`. Pure computation, no network.
    fn clone_url(&self, slug: &str) -> String;
    /// Web URL of the project, for messages.
    fn web_url(&self, slug: &str) -> String;
}

/// Read-only access to tracker issues.
pub trait IssueTracker {
    /// Base URL used to build issue links.
    fn base_url(&self) -> &str;
    /// All issues matching `filter`, across pages, in server order.
    fn list_issues(&self, filter: &IssueFilter) -> Result<Vec<Issue>>;
    /// Issues with the given ids (any status), in server order.
    fn issues_by_ids(&self, ids: &[String]) -> Result<Vec<Issue>>;
}

/// CI server able to instantiate jobs from a template job.
pub trait JobServer {
    /// Copy `template` to `job`, substitute `context` into its config,
    /// enable it and trigger a build. Returns the job URL.
    fn create_job(&self, template: &str, job: &str, context: &TemplateContext) -> Result<String>;
}
