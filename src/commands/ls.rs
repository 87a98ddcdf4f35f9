//! # Ls Command Implementation
//!
//! This module implements the `ls` subcommand, which lists the contents
//! of the populated output tree: every mirrored file and directory,
//! relative to the output root, in sorted order.
//!
//! The output root is taken from `--output` when given, otherwise from
//! the configuration's `processed_docs_root`. This command is a safe,
//! read-only operation that touches neither the network nor the cache.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use doc_sync::config;
use doc_sync::defaults;
use doc_sync::output::render_tree;

/// List the contents of the populated output tree
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Path to the sources configuration file.
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "DOC_SYNC_CONFIG",
        default_value = defaults::DEFAULT_CONFIG_FILENAME
    )]
    pub config: PathBuf,

    /// Output root to list; overrides `processed_docs_root` from the
    /// configuration file.
    #[arg(short, long, value_name = "DIR", env = "DOC_SYNC_OUTPUT")]
    pub output: Option<PathBuf>,
}

/// Execute the `ls` command.
pub fn execute(args: LsArgs) -> Result<()> {
    let output_root = match args.output {
        Some(output) => output,
        None => {
            let config = config::load(&args.config)
                .map_err(|e| anyhow::anyhow!("cannot load '{}': {}", args.config.display(), e))?;
            config.processed_docs_root
        }
    };

    print!("{}", render_tree(&output_root)?);
    Ok(())
}
