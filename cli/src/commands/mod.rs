//! Command implementations

pub mod config;
pub mod git;
pub mod jenkins;
pub mod join;
pub mod repo;
pub mod tickets;
pub mod tracker;
pub mod update;
