//! Render templates and put them on the host; link available → enabled.

use anyhow::Result;

use crate::application::ports::{ProgressReporter, ShellRunner};
use crate::application::services::exec;
use crate::domain::template::{self, TemplateContext};
use crate::domain::ShellCommand;

/// A template and where its rendering goes.
pub struct ConfigFile<'a> {
    /// Template name, for error messages.
    pub name: &'a str,
    /// Template text with `{{placeholders}}`.
    pub template: &'a str,
    pub context: &'a TemplateContext,
    /// Absolute destination path on the host.
    pub destination: &'a str,
    /// Write through `sudo`.
    pub privileged: bool,
}

/// Render `file` and write it to its destination, replacing any previous
/// content.
///
/// # Errors
///
/// Fails if a placeholder is unresolved (before anything is written) or if
/// the write command fails.
pub async fn write_config(
    shell: &impl ShellRunner,
    reporter: &impl ProgressReporter,
    file: &ConfigFile<'_>,
) -> Result<()> {
    let rendered = template::render(file.name, file.template, file.context)?;
    let mut cmd = ShellCommand::new("tee").arg(file.destination).stdin(rendered);
    if file.privileged {
        cmd = cmd.as_root();
    }
    exec::run(shell, reporter, &cmd).await?;
    reporter.step(&format!("wrote {}", file.destination));
    Ok(())
}

/// Point `enabled` at `available`, replacing whatever `enabled` was.
///
/// The new link is created under a scratch name and renamed over the old
/// one, so re-running never trips over an existing file.
///
/// # Errors
///
/// Fails if either command fails.
pub async fn link_enabled(
    shell: &impl ShellRunner,
    reporter: &impl ProgressReporter,
    available: &str,
    enabled: &str,
) -> Result<()> {
    let staged = format!("{enabled}.fct-new");
    exec::run(
        shell,
        reporter,
        &ShellCommand::new("ln")
            .args(["-sfn", available, staged.as_str()])
            .as_root(),
    )
    .await?;
    exec::run(
        shell,
        reporter,
        &ShellCommand::new("mv")
            .args(["-Tf", staged.as_str(), enabled])
            .as_root(),
    )
    .await?;
    Ok(())
}
