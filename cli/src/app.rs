//! Per-invocation state shared by the command handlers: output, config
//! location, prompting and process runners.

use anyhow::Result;

use crate::application::ports::{ConfigStore, Prompter};
use crate::domain::Settings;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::FileConfigStore;
use crate::infra::ssh::HostShell;
use crate::output::{OutputContext, TerminalReporter};

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `FCT_YES` env vars).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Built once in `Cli::run()` and handed to every handler as `&AppContext`.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Location of the `KEY = value` config file.
    pub config_store: FileConfigStore,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `FCT_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: &AppFlags) -> Self {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("FCT_YES").is_ok();
        Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            config_store: FileConfigStore::discover(),
            non_interactive: flags.behaviour.yes || ci_env,
        }
    }

    /// Settings from the config file with `FCT_<KEY>` overrides applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn settings(&self) -> Result<Settings> {
        self.config_store.load()
    }

    /// Progress reporter writing to the terminal.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Local process runner with the default timeout.
    #[must_use]
    pub fn runner(&self) -> TokioCommandRunner {
        TokioCommandRunner::default()
    }

    /// Shell on the provisioning host (local if none is configured).
    #[must_use]
    pub fn host_shell(&self, settings: &Settings) -> HostShell<TokioCommandRunner> {
        HostShell::from_settings(self.runner(), settings)
    }

    /// Shell on this machine.
    #[must_use]
    pub fn local_shell(&self) -> HostShell<TokioCommandRunner> {
        HostShell::local(self.runner())
    }
}

impl Prompter for AppContext {
    /// Ask the user for a value.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `FCT_YES` env),
    /// returns `default` immediately without prompting.
    fn input(&self, prompt: &str, default: &str) -> Result<String> {
        if self.non_interactive {
            return Ok(default.to_string());
        }
        let answer = dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .default(default.to_string())
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }
}
