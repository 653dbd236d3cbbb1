//! Configuration bootstrap and display.

use anyhow::Result;

use crate::application::ports::{ConfigStore, ProgressReporter, Prompter};
use crate::domain::config::{self, Settings};
use crate::domain::ToolbeltError;

/// Outcome of `init_config`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    /// A new file was written.
    Written,
    /// The file was already set up and `force` was not given. Carries its
    /// current contents for display.
    AlreadyConfigured(String),
}

/// Write the config file from the bootstrap template, asking for each value.
///
/// An already configured file is left alone unless `force` is set.
///
/// # Errors
///
/// Fails on an unreadable template, a prompt error or a write error.
pub fn init_config(
    store: &impl ConfigStore,
    prompter: &impl Prompter,
    reporter: &impl ProgressReporter,
    template: &str,
    login: &str,
    force: bool,
) -> Result<InitOutcome> {
    let existing = store.read_raw()?;
    let configured = |raw: &&str| Settings::parse(raw).is_ok_and(|s| s.is_configured());
    if let Some(current) = existing.as_deref().filter(configured) {
        if !force {
            return Ok(InitOutcome::AlreadyConfigured(current.to_string()));
        }
        reporter.warn("your config file will be overwritten");
    }

    let entries = config::parse_bootstrap_template(template, login)?;
    let mut answers = Vec::with_capacity(entries.len());
    for entry in entries {
        let value = prompter.input(entry.prompt(), &entry.default)?;
        answers.push((entry.key, value.trim().to_string()));
    }

    store.save_raw(&config::render_config_file(&answers))?;
    reporter.success(&format!("config written to {}", store.path()?.display()));
    Ok(InitOutcome::Written)
}

/// Message for the already-configured case.
#[must_use]
pub fn already_configured_error() -> ToolbeltError {
    ToolbeltError::InvalidInput(
        "fct is already configured; run `fct config init --force` to rewrite the config".to_string(),
    )
}

/// `(key, value)` pairs for display, secrets masked. Unknown keys are kept.
#[must_use]
pub fn describe(settings: &Settings) -> Vec<(String, String)> {
    settings
        .iter()
        .map(|(key, value)| {
            let shown = if config::SECRET_KEYS.contains(&key) {
                config::mask_secret(value)
            } else {
                value.to_string()
            };
            (key.to_string(), shown)
        })
        .collect()
}

/// Known keys with no value (optional ones included).
#[must_use]
pub fn unset_keys(settings: &Settings) -> Vec<&'static str> {
    config::KNOWN_KEYS
        .iter()
        .copied()
        .filter(|key| settings.get(key).is_none())
        .collect()
}
