//! Project and developer identities, and everything derived from them.
//!
//! Pure functions only. Paths are computed as strings for the remote host,
//! never touched locally.

use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::domain::config::{self, Settings};
use crate::domain::error::ToolbeltError;

/// Slugs and logins: start alphanumeric, then alphanumerics, `_`, `.`, `-`.
#[allow(clippy::expect_used)] // static pattern
pub static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]{0,62}$").expect("valid regex"));

/// Branch pushed by the boilerplate flow.
pub const DEFAULT_BRANCH: &str = "dev";

/// Validate a project slug or developer login.
///
/// # Errors
///
/// Returns [`ToolbeltError::InvalidInput`] if `value` is not a safe name.
pub fn validate_name(kind: &str, value: &str) -> Result<(), ToolbeltError> {
    if NAME_RE.is_match(value) {
        Ok(())
    } else {
        Err(ToolbeltError::InvalidInput(format!(
            "invalid {kind} '{value}': use letters, digits, '_', '.' or '-' (max 63 chars)"
        )))
    }
}

/// Substitute the developer login into a path template.
///
/// Accepts `{user}` as well as the legacy `%(user)s` spelling.
#[must_use]
pub fn expand_user(template: &str, user: &str) -> String {
    template.replace("{user}", user).replace("%(user)s", user)
}

/// Clone URL for a repository on the Git host.
#[must_use]
pub fn repo_url(git_host: &str, namespace: Option<&str>, slug: &str) -> String {
    match namespace.map(|n| n.trim_matches('/')).filter(|n| !n.is_empty()) {
        Some(ns) => format!("git@{git_host}:{ns}/{slug}.git"),
        None => format!("git@{git_host}:{slug}.git"),
    }
}

/// Everything the provisioning workflow derives from `(slug, developer)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeveloperLayout {
    pub slug: String,
    pub developer: String,
    /// Checkout location on the host.
    pub project_dir: String,
    /// Virtualenv location on the host.
    pub env_dir: String,
    /// OS group owning the checkout.
    pub group: String,
    /// `<slug>.<developer>[.<domain>]`
    pub server_name: String,
    pub socket_path: String,
    pub db_name: String,
}

impl DeveloperLayout {
    /// Resolve the layout from settings.
    ///
    /// # Errors
    ///
    /// Fails on an invalid slug/login or a missing path/group setting.
    pub fn resolve(settings: &Settings, slug: &str, developer: &str) -> Result<Self> {
        validate_name("project slug", slug)?;
        validate_name("developer login", developer)?;

        let projects = expand_user(settings.require(config::PROJECTS_PATH_TEMPLATE)?, developer);
        let envs = expand_user(settings.require(config::ENVS_PATH_TEMPLATE)?, developer);
        let group = settings.require(config::USER_GROUP)?.to_string();

        let server_name = match settings.get(config::DEV_DOMAIN) {
            Some(domain) => format!("{slug}.{developer}.{}", domain.trim_matches('.')),
            None => format!("{slug}.{developer}"),
        };

        Ok(Self {
            slug: slug.to_string(),
            developer: developer.to_string(),
            project_dir: join_path(&projects, slug),
            env_dir: join_path(&envs, slug),
            group,
            socket_path: format!("/tmp/{server_name}.sock"),
            server_name,
            db_name: database_name(slug, developer),
        })
    }

    /// Where the developer reaches the instance once provisioning is done.
    #[must_use]
    pub fn access_url(&self) -> String {
        format!("http://{}/", self.server_name)
    }

    /// Dependency manifest inside the checkout.
    #[must_use]
    pub fn requirements_file(&self) -> String {
        join_path(&self.project_dir, "requirements.txt")
    }
}

/// `<slug>_<developer>` with characters MySQL dislikes mapped to `_`.
#[must_use]
pub fn database_name(slug: &str, developer: &str) -> String {
    format!("{slug}_{developer}").replace(['-', '.'], "_")
}

fn join_path(base: &str, leaf: &str) -> String {
    format!("{}/{leaf}", base.trim_end_matches('/'))
}
