//! Failure semantics on top of `ShellRunner`.
//!
//! `run` aborts on non-zero exits unless the command is best-effort, in which
//! case the failure becomes a warning. `probe` only asks "did it succeed?".
//! `make_scratch_dir` allocates a fresh private directory on the target.

use std::process::Output;

use anyhow::Result;

use crate::application::ports::{ProgressReporter, ShellRunner};
use crate::domain::{OnFailure, RunAs, ShellCommand, ToolbeltError};

/// Run `cmd` and apply its failure policy.
///
/// # Errors
///
/// Returns [`ToolbeltError::RemoteExecution`] if a fatal command exits
/// non-zero, or the runner's error if the command could not be started.
pub async fn run(
    shell: &impl ShellRunner,
    reporter: &impl ProgressReporter,
    cmd: &ShellCommand,
) -> Result<Output> {
    tracing::debug!(host = shell.target(), command = %cmd.display(), "running");
    let output = shell.execute(cmd).await?;
    if output.status.success() {
        return Ok(output);
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    match cmd.on_failure {
        OnFailure::Abort => Err(ToolbeltError::remote_execution(
            cmd.display(),
            shell.target(),
            output.status.code(),
            &stderr,
        )
        .into()),
        OnFailure::Warn => {
            tracing::warn!(command = %cmd.display(), stderr = %stderr.trim(), "ignoring failed cleanup");
            reporter.warn(&format!("ignored failure of `{}`", cmd.display()));
            Ok(output)
        }
    }
}

/// Run `cmd` and report whether it exited zero. Output content is ignored.
///
/// # Errors
///
/// Returns an error only if the command could not be started at all.
pub async fn probe(shell: &impl ShellRunner, cmd: &ShellCommand) -> Result<bool> {
    tracing::debug!(host = shell.target(), command = %cmd.display(), "probing");
    Ok(shell.execute(cmd).await?.status.success())
}

/// Create a fresh directory named `<prefix>.XXXXXXXX` with `mktemp -d` as
/// `run_as` and return its path. The directory is mode 0700 and owned by
/// that account.
///
/// # Errors
///
/// Fails if `mktemp` exits non-zero or prints something other than an
/// absolute path.
pub async fn make_scratch_dir(
    shell: &impl ShellRunner,
    reporter: &impl ProgressReporter,
    prefix: &str,
    run_as: RunAs,
) -> Result<String> {
    let template = format!("{prefix}.XXXXXXXX");
    let mut cmd = ShellCommand::new("mktemp").args(["-d", "-t", template.as_str()]);
    cmd.run_as = run_as;
    let output = run(shell, reporter, &cmd).await?;
    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !path.starts_with('/') || path.contains('\n') {
        return Err(ToolbeltError::remote_execution(
            cmd.display(),
            shell.target(),
            output.status.code(),
            &format!("mktemp printed {path:?} instead of a directory"),
        )
        .into());
    }
    tracing::debug!(host = shell.target(), %path, "scratch directory");
    Ok(path)
}
