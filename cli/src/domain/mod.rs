//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod database;
pub mod error;
pub mod project;
pub mod service;
pub mod shell;
pub mod template;
pub mod tickets;

pub use config::Settings;
pub use error::ToolbeltError;
pub use project::DeveloperLayout;
pub use service::{AccessLevel, Created, Membership, RemoteUser};
pub use shell::{OnFailure, RunAs, ShellCommand};
pub use template::TemplateContext;
pub use tickets::{Issue, IssueFilter, IssueSelection, ReportMode};
