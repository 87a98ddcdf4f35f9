//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Doc-Sync - Mirror markdown documentation from git repositories
#[derive(Parser, Debug)]
#[command(name = "doc-sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Synchronize all configured sources into the output tree
    Sync(commands::sync::SyncArgs),
    /// Validate a sources.yaml configuration file
    Validate(commands::validate::ValidateArgs),
    /// List the contents of the populated output tree
    Ls(commands::ls::LsArgs),
    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        match self.command {
            Commands::Sync(args) => commands::sync::execute(args, &self.color),
            Commands::Validate(args) => commands::validate::execute(args, &self.color),
            Commands::Ls(args) => commands::ls::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Initialize env_logger from the --log-level flag; RUST_LOG still wins
/// when set, so existing habits keep working.
fn init_logging(level: &str) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
    if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(level.parse().unwrap_or(log::LevelFilter::Warn));
    }
    builder.format_timestamp(None).try_init().ok();
}
