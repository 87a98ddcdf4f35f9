//! # Validate Command Implementation
//!
//! This module implements the `validate` subcommand, which parses and
//! validates a `sources.yaml` configuration file without touching the
//! network, the cache, or the output tree.
//!
//! This command is a safe, read-only operation that does not modify any
//! files.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use doc_sync::config;
use doc_sync::defaults;
use doc_sync::output::{emoji, OutputConfig};

/// Validate a sources.yaml configuration file
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the sources configuration file to validate.
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "DOC_SYNC_CONFIG",
        default_value = defaults::DEFAULT_CONFIG_FILENAME
    )]
    pub config: PathBuf,
}

/// Execute the `validate` command.
pub fn execute(args: ValidateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    println!(
        "{} Validating configuration: {}",
        emoji(&out, "🔍", "[SCAN]"),
        args.config.display()
    );

    let config = config::load(&args.config).map_err(|e| {
        println!("{} Configuration is invalid", emoji(&out, "❌", "[ERR]"));
        anyhow::anyhow!("{}", e)
    })?;

    let set_count: usize = config.sources.iter().map(|s| s.documents.len()).sum();
    let file_count: usize = config
        .sources
        .iter()
        .flat_map(|s| &s.documents)
        .map(|d| d.markdown_files.len())
        .sum();

    println!(
        "{} Configuration is valid: {} source(s), {} document set(s), {} file(s)",
        emoji(&out, "✅", "[OK]"),
        config.sources.len(),
        set_count,
        file_count
    );
    println!("   output root: {}", config.processed_docs_root.display());
    Ok(())
}
