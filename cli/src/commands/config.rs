//! `fct config`: create and inspect the configuration file.

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::config_setup::{self, InitOutcome};
use crate::infra::templates;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Create the config file, prompting for each value
    Init {
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },
    /// Show the config file location and its values (secrets masked)
    Show,
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or written, or if it is
/// already configured and `--force` was not given.
pub fn run(app: &AppContext, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Init { force } => init(app, force),
        ConfigCommand::Show => show(app),
    }
}

fn init(app: &AppContext, force: bool) -> Result<()> {
    let template = templates::get_template(templates::BOOTSTRAP_TEMPLATE)?;
    let outcome = config_setup::init_config(
        &app.config_store,
        app,
        &app.reporter(),
        template,
        &local_login(),
        force,
    )?;
    match outcome {
        InitOutcome::Written => {
            app.output.info("now you can use all of the commands");
            Ok(())
        }
        InitOutcome::AlreadyConfigured(current) => {
            app.output.line(current.trim_end());
            Err(config_setup::already_configured_error().into())
        }
    }
}

fn show(app: &AppContext) -> Result<()> {
    let path = app.config_store.path()?;
    let settings = app.settings()?;
    app.output.header(&format!("{}", path.display()));
    if app.config_store.read_raw()?.is_none() {
        app.output.warn("no config file yet; run `fct config init`");
    }
    for (key, value) in config_setup::describe(&settings) {
        app.output.kv(&key, &value);
    }
    let unset = config_setup::unset_keys(&settings);
    if !unset.is_empty() {
        app.output.info(&format!("not set: {}", unset.join(", ")));
    }
    Ok(())
}

/// Login of the person running fct, for `{user}` in template defaults.
fn local_login() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
        .filter(|login| !login.is_empty())
        .or_else(|| {
            dirs::home_dir()
                .and_then(|home| home.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| "developer".to_string())
}
