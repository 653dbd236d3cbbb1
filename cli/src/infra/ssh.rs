//! Infrastructure implementation of the `ShellRunner` port.
//!
//! Commands run through `ssh` on the provisioning host, or locally when no
//! host is configured. The remote side gets one shell-quoted command line
//! built from the structured argv; stdin is forwarded untouched.

use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ShellRunner};
use crate::domain::ShellCommand;
use crate::domain::config::{self, Settings};

/// Target name used in messages when running locally.
pub const LOCAL_TARGET: &str = "local";

/// `ShellRunner` over any `CommandRunner`.
pub struct HostShell<R> {
    runner: R,
    host: Option<String>,
}

impl<R: CommandRunner> HostShell<R> {
    /// Run on `host` over ssh.
    #[must_use]
    pub fn remote(runner: R, host: impl Into<String>) -> Self {
        Self {
            runner,
            host: Some(host.into()),
        }
    }

    /// Run on this machine.
    #[must_use]
    pub fn local(runner: R) -> Self {
        Self { runner, host: None }
    }

    /// Remote when `PROVISION_HOST` is set, local otherwise.
    #[must_use]
    pub fn from_settings(runner: R, settings: &Settings) -> Self {
        match settings.get(config::PROVISION_HOST) {
            Some(host) => Self::remote(runner, host),
            None => Self::local(runner),
        }
    }

    /// Program and arguments actually spawned for `cmd`.
    ///
    /// # Errors
    ///
    /// Fails if an argument cannot be quoted for the remote shell (NUL byte).
    pub fn invocation(&self, cmd: &ShellCommand) -> Result<(String, Vec<String>)> {
        let mut argv = cmd.argv();
        let Some(host) = &self.host else {
            let program = argv.remove(0);
            return Ok((program, argv));
        };
        let remote = shlex::try_join(argv.iter().map(String::as_str))
            .with_context(|| format!("cannot quote `{}` for ssh", cmd.program))?;
        Ok((
            "ssh".to_string(),
            vec![
                "-o".to_string(),
                "BatchMode=yes".to_string(),
                host.clone(),
                "--".to_string(),
                remote,
            ],
        ))
    }
}

impl<R: CommandRunner> ShellRunner for HostShell<R> {
    async fn execute(&self, cmd: &ShellCommand) -> Result<Output> {
        let (program, args) = self.invocation(cmd)?;
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = match &cmd.stdin {
            Some(input) => self.runner.run_with_stdin(&program, &args, input).await,
            None => self.runner.run(&program, &args).await,
        }?;
        tracing::debug!(
            host = self.target(),
            command = %cmd.display(),
            code = ?output.status.code(),
            "finished"
        );
        Ok(output)
    }

    fn target(&self) -> &str {
        self.host.as_deref().unwrap_or(LOCAL_TARGET)
    }
}
