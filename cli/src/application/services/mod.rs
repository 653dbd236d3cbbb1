//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::commands`,
//! or `crate::output`.
//!
//! Workflows that need an external service take a `connect` closure rather
//! than a ready client, so settings are validated before the client exists.

pub mod boilerplate;
pub mod config_setup;
pub mod config_writer;
pub mod database;
pub mod exec;
pub mod jobs;
pub mod join;
pub mod maintenance;
pub mod projects;
pub mod tickets;
pub mod webserver;
