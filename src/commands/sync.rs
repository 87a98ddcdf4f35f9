//! # Sync Command Implementation
//!
//! The `sync` command runs the full mirroring pass:
//!
//! 1.  Load and validate the `sources.yaml` configuration.
//! 2.  Ensure the cache root and output root exist (a failure here is
//!     process-fatal, before any source is attempted).
//! 3.  For each configured source, in declared order: bring the cache
//!     slot to the requested ref, then normalize its document sets into
//!     the output tree.
//! 4.  Print the populated output tree and a per-source failure summary.
//!
//! A failed source never aborts the run; the remaining sources are still
//! processed and the command exits non-zero only after the full
//! enumeration when at least one source failed.

use anyhow::Result;
use clap::Args;
use std::fs;
use std::path::PathBuf;

use doc_sync::config;
use doc_sync::defaults;
use doc_sync::output::{emoji, render_tree, OutputConfig};
use doc_sync::pipeline;
use doc_sync::repository::CacheManager;

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Path to the sources configuration file.
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "DOC_SYNC_CONFIG",
        default_value = defaults::DEFAULT_CONFIG_FILENAME
    )]
    pub config: PathBuf,

    /// Output root for the mirrored documentation tree.
    ///
    /// Overrides `processed_docs_root` from the configuration file.
    #[arg(short, long, value_name = "DIR", env = "DOC_SYNC_OUTPUT")]
    pub output: Option<PathBuf>,

    /// The root directory for the repository cache.
    ///
    /// Defaults to the system cache directory (`~/.cache/doc-sync` on
    /// Linux, `~/Library/Caches/doc-sync` on macOS).
    #[arg(long, value_name = "DIR", env = "DOC_SYNC_CACHE")]
    pub cache_root: Option<PathBuf>,

    /// Suppress all output except errors.
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the `sync` command.
pub fn execute(args: SyncArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);

    let config = config::load(&args.config)
        .map_err(|e| anyhow::anyhow!("cannot load '{}': {}", args.config.display(), e))?;

    let output_root = absolutize(args.output.unwrap_or_else(|| config.processed_docs_root.clone()))?;
    let cache_root = absolutize(args.cache_root.unwrap_or_else(defaults::default_cache_root))?;

    // The only process-fatal failures: without these roots there is
    // nothing any source could do.
    fs::create_dir_all(&cache_root)
        .map_err(|e| anyhow::anyhow!("cannot create cache root '{}': {}", cache_root.display(), e))?;
    fs::create_dir_all(&output_root)
        .map_err(|e| anyhow::anyhow!("cannot create output root '{}': {}", output_root.display(), e))?;

    let manager = CacheManager::new(cache_root);
    let mut failed: Vec<String> = Vec::new();

    for source in &config.sources {
        if !args.quiet {
            println!(
                "{} Syncing {} ({})",
                emoji(&out, "🔄", "[SYNC]"),
                source.name,
                source.id
            );
        }
        match manager.sync(source) {
            Ok(workdir) => {
                if !pipeline::normalize(source, &workdir, &output_root) && !args.quiet {
                    println!(
                        "{} No documents processed for '{}'",
                        emoji(&out, "⚠️", "[WARN]"),
                        source.id
                    );
                }
            }
            Err(e) => {
                eprintln!(
                    "{} Failed to prepare '{}': {}",
                    emoji(&out, "❌", "[ERR]"),
                    source.id,
                    e
                );
                failed.push(source.id.clone());
            }
        }
    }

    if !args.quiet {
        println!();
        println!("Contents of '{}':", output_root.display());
        print!("{}", render_tree(&output_root)?);
    }

    if failed.is_empty() {
        if !args.quiet {
            println!("{} All sources synchronized", emoji(&out, "✅", "[OK]"));
        }
        Ok(())
    } else {
        anyhow::bail!("{} source(s) failed: {}", failed.len(), failed.join(", "))
    }
}

/// Resolve a possibly-relative root against the current directory.
fn absolutize(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
