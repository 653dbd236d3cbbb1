//! Typed domain error enum.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! `ToolbeltError` implements `thiserror::Error` and converts to
//! `anyhow::Error` via the `?` operator.

use thiserror::Error;

/// Every fatal condition the toolbelt reports to the operator.
///
/// Non-fatal outcomes (already existing projects, members that could not be
/// added, failed cleanup commands) are values rather than errors (see
/// [`crate::domain::service`]).
#[derive(Debug, Error)]
pub enum ToolbeltError {
    /// A required setting is absent from the configuration file.
    #[error("Missing setting {key}: {hint}")]
    Configuration { key: String, hint: String },

    /// An external API answered with a status the caller did not expect.
    #[error("{service} responded with HTTP {status}: {body}")]
    RemoteService {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// A referenced project, user or job does not exist (or is invisible to us).
    #[error("{0}")]
    NotFound(String),

    /// The credentials are valid but lack the rights for this call.
    #[error("{service} refused the request: {hint}")]
    Forbidden { service: &'static str, hint: String },

    /// A shell command returned non-zero on the local or remote host.
    #[error("`{command}` on {target} failed ({status}): {stderr}")]
    RemoteExecution {
        command: String,
        target: String,
        status: String,
        stderr: String,
    },

    /// Arguments that cannot be acted upon.
    #[error("{0}")]
    InvalidInput(String),
}

impl ToolbeltError {
    /// Build a `RemoteService` error, squeezing the body onto one line.
    #[must_use]
    pub fn remote_service(service: &'static str, status: u16, body: &str) -> Self {
        Self::RemoteService {
            service,
            status,
            body: one_line(body, "empty response"),
        }
    }

    /// Build a `RemoteExecution` error from the raw exit code and stderr.
    #[must_use]
    pub fn remote_execution(command: String, target: &str, code: Option<i32>, stderr: &str) -> Self {
        let status = code.map_or_else(|| "killed by signal".to_string(), |c| format!("exit code {c}"));
        Self::RemoteExecution {
            command,
            target: target.to_string(),
            status,
            stderr: last_line(stderr).unwrap_or("no output").to_string(),
        }
    }
}

fn one_line(text: &str, fallback: &str) -> String {
    let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if joined.is_empty() {
        fallback.to_string()
    } else {
        joined
    }
}

fn last_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).rev().find(|l| !l.is_empty())
}
