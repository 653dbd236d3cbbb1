//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Developer-environment toolbelt: repositories, CI jobs, tracker projects
/// and per-developer instances
#[derive(Parser)]
#[command(
    name = "fct",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Accept defaults instead of prompting
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// GitLab repositories
    #[command(subcommand)]
    Repo(commands::repo::RepoCommand),

    /// Jenkins jobs
    #[command(subcommand)]
    Jenkins(commands::jenkins::JenkinsCommand),

    /// Redmine projects
    #[command(subcommand)]
    Tracker(commands::tracker::TrackerCommand),

    /// List tickets referenced by commits between two refs
    Tickets(commands::tickets::TicketsArgs),

    /// Set up a developer instance of an existing project
    Join(commands::join::JoinArgs),

    /// Create a project from the template, then join it
    Start(commands::join::StartArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Update code, install packages, migrate and reload
    Update,

    /// Git housekeeping
    #[command(subcommand)]
    Git(commands::git::GitCommand),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            quiet,
            no_color,
            yes,
            verbose: _,
            command,
        } = self;
        let app = AppContext::new(&AppFlags {
            output: OutputFlags { no_color, quiet },
            behaviour: BehaviourFlags { yes },
        });
        match command {
            Command::Repo(cmd) => commands::repo::run(&app, cmd),
            Command::Jenkins(cmd) => commands::jenkins::run(&app, cmd),
            Command::Tracker(cmd) => commands::tracker::run(&app, cmd),
            Command::Tickets(args) => commands::tickets::run(&app, args).await,
            Command::Join(args) => commands::join::run_join(&app, &args).await,
            Command::Start(args) => commands::join::run_start(&app, &args).await,
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::Update => commands::update::run(&app).await,
            Command::Git(cmd) => commands::git::run(&app, cmd).await,
        }
    }
}
