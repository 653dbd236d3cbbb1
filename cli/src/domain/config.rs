//! Domain types and parsers for the toolbelt configuration.
//!
//! Pure functions only, no I/O, no async, no filesystem access.

use std::collections::BTreeMap;

use anyhow::Result;

use crate::domain::error::ToolbeltError;

// ── Keys ─────────────────────────────────────────────────────────────────────

pub const GITLAB_URL: &str = "GITLAB_URL";
pub const GITLAB_TOKEN: &str = "GITLAB_TOKEN";
pub const GITLAB_NAMESPACE: &str = "GITLAB_NAMESPACE";
pub const JENKINS_URL: &str = "JENKINS_URL";
pub const JENKINS_LOGIN: &str = "JENKINS_LOGIN";
pub const JENKINS_PASSWORD: &str = "JENKINS_PASSWORD";
pub const JENKINS_TEMPLATE_JOB: &str = "JENKINS_TEMPLATE_JOB";
pub const REDMINE_URL: &str = "REDMINE_URL";
pub const REDMINE_API_KEY: &str = "REDMINE_API_KEY";
pub const REDMINE_DEVELOPER_ROLE_ID: &str = "REDMINE_DEVELOPER_ROLE_ID";
pub const PROVISION_HOST: &str = "PROVISION_HOST";
pub const PROJECTS_PATH_TEMPLATE: &str = "PROJECTS_PATH_TEMPLATE";
pub const ENVS_PATH_TEMPLATE: &str = "ENVS_PATH_TEMPLATE";
pub const USER_GROUP: &str = "USER_GROUP";
pub const DEV_DOMAIN: &str = "DEV_DOMAIN";
pub const MYSQL_ADMIN_USER: &str = "MYSQL_ADMIN_USER";
pub const TEMPLATE_PROJECT_REPO: &str = "TEMPLATE_PROJECT_REPO";
pub const TEMPLATE_PROJECT_PACKAGE: &str = "TEMPLATE_PROJECT_PACKAGE";

/// Every key the toolbelt reads. Only these can be overridden from the
/// environment as `FCT_<KEY>`.
pub const KNOWN_KEYS: &[&str] = &[
    GITLAB_URL,
    GITLAB_TOKEN,
    GITLAB_NAMESPACE,
    JENKINS_URL,
    JENKINS_LOGIN,
    JENKINS_PASSWORD,
    JENKINS_TEMPLATE_JOB,
    REDMINE_URL,
    REDMINE_API_KEY,
    REDMINE_DEVELOPER_ROLE_ID,
    PROVISION_HOST,
    PROJECTS_PATH_TEMPLATE,
    ENVS_PATH_TEMPLATE,
    USER_GROUP,
    DEV_DOMAIN,
    MYSQL_ADMIN_USER,
    TEMPLATE_PROJECT_REPO,
    TEMPLATE_PROJECT_PACKAGE,
];

/// Presence of this key means `fct config init` has already run.
pub const INSTALLATION_MARKER: &str = PROJECTS_PATH_TEMPLATE;

/// Keys whose values are masked by `fct config show`.
pub const SECRET_KEYS: &[&str] = &[GITLAB_TOKEN, JENKINS_PASSWORD, REDMINE_API_KEY];

pub const DEFAULT_TEMPLATE_JOB: &str = "example-tests";
pub const DEFAULT_MYSQL_ADMIN: &str = "root";

// ── Settings ─────────────────────────────────────────────────────────────────

/// Immutable key/value configuration, built once per invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl Settings {
    /// Parse a `KEY = value` file. Blank lines and `#` comments are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error naming the line when it has no `=` or an empty key.
    pub fn parse(text: &str) -> Result<Self> {
        let mut values = BTreeMap::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| {
                ToolbeltError::InvalidInput(format!("config line {}: expected `KEY = value`", idx + 1))
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(ToolbeltError::InvalidInput(format!(
                    "config line {}: empty key",
                    idx + 1
                ))
                .into());
            }
            values.insert(key.to_string(), value.trim().to_string());
        }
        Ok(Self { values })
    }

    /// Build settings from literal pairs.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Apply `FCT_<KEY>` overrides for every known key.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        for key in KNOWN_KEYS {
            if let Some(value) = lookup(&format!("FCT_{key}")) {
                self.values.insert((*key).to_string(), value.trim().to_string());
            }
        }
        self
    }

    /// Value for `key`, or `None` when absent or blank.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Value for `key`, falling back to `default`.
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Value for a required key.
    ///
    /// # Errors
    ///
    /// Returns [`ToolbeltError::Configuration`] naming the key and where to
    /// obtain it.
    pub fn require(&self, key: &str) -> Result<&str, ToolbeltError> {
        self.get(key).ok_or_else(|| ToolbeltError::Configuration {
            key: key.to_string(),
            hint: self.hint_for(key),
        })
    }

    /// URL-valued setting with trailing slashes removed.
    ///
    /// # Errors
    ///
    /// Same as [`Settings::require`].
    pub fn require_url(&self, key: &str) -> Result<&str, ToolbeltError> {
        self.require(key).map(|v| v.trim_end_matches('/'))
    }

    /// `true` once the bootstrap flow has written this file.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.values.contains_key(INSTALLATION_MARKER)
    }

    /// All entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn hint_for(&self, key: &str) -> String {
        let gitlab = self.get(GITLAB_URL).unwrap_or("<GITLAB_URL>").trim_end_matches('/');
        let redmine = self.get(REDMINE_URL).unwrap_or("<REDMINE_URL>").trim_end_matches('/');
        match key {
            GITLAB_URL => "point it at your GitLab instance, e.g. https://gitlab.example.com".to_string(),
            GITLAB_TOKEN => format!("go to {gitlab}/-/user_settings/personal_access_tokens and grab yourself a token"),
            JENKINS_URL => "point it at your Jenkins instance, e.g. https://ci.example.com".to_string(),
            JENKINS_LOGIN | JENKINS_PASSWORD => {
                "provide both JENKINS_LOGIN and JENKINS_PASSWORD to connect to the API".to_string()
            }
            REDMINE_URL => "point it at your Redmine instance, e.g. https://redmine.example.com".to_string(),
            REDMINE_API_KEY => format!("go to {redmine}/my/account and grab yourself an API key"),
            REDMINE_DEVELOPER_ROLE_ID => format!("look up the Developer role id under {redmine}/roles"),
            PROJECTS_PATH_TEMPLATE | ENVS_PATH_TEMPLATE => {
                "set it to a path on the provisioning host containing {user}; run `fct config init`"
                    .to_string()
            }
            TEMPLATE_PROJECT_REPO | TEMPLATE_PROJECT_PACKAGE => {
                "point it at the project template repository; run `fct config init`".to_string()
            }
            _ => "run `fct config init` or add it to your config file".to_string(),
        }
    }
}

/// Mask a secret for display, keeping the last four characters.
#[must_use]
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

// ── Bootstrap template ───────────────────────────────────────────────────────

/// One `KEY = default  # comment` line of the bootstrap template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    pub key: String,
    pub default: String,
    pub comment: Option<String>,
}

impl TemplateEntry {
    /// Prompt shown to the operator: the comment if present, else the key.
    #[must_use]
    pub fn prompt(&self) -> &str {
        self.comment.as_deref().unwrap_or(&self.key)
    }
}

/// Parse the bootstrap template. `{user}` in defaults is replaced by `login`.
///
/// # Errors
///
/// Returns an error naming the line when it is not `KEY = default`.
pub fn parse_bootstrap_template(text: &str, login: &str) -> Result<Vec<TemplateEntry>> {
    let mut entries = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let (assignment, comment) = match trimmed.split_once('#') {
            Some((a, c)) => (a, Some(c.trim().to_string()).filter(|c| !c.is_empty())),
            None => (trimmed, None),
        };
        let (key, default) = assignment.split_once('=').ok_or_else(|| {
            ToolbeltError::InvalidInput(format!("template line {}: expected `KEY = default`", idx + 1))
        })?;
        entries.push(TemplateEntry {
            key: key.trim().to_string(),
            default: default.trim().replace("{user}", login),
            comment,
        });
    }
    Ok(entries)
}

/// Serialize answers as `KEY = value` lines, preserving order.
#[must_use]
pub fn render_config_file(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{k} = {v}\n"))
        .collect()
}

// ── Unit tests ───────────────────────────────────────────────────────────────
