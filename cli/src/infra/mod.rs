//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, ssh,
//! HTTP clients, the config file and embedded templates.
//!
//! Imports from `crate::domain` and `crate::application` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command_runner;
pub mod config;
pub mod gitlab;
pub mod http;
pub mod jenkins;
pub mod redmine;
pub mod ssh;
pub mod templates;
