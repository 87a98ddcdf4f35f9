//! # Error Handling
//!
//! Centralized error handling for `doc-sync`, built on `thiserror`. The
//! `Error` enum covers every anticipated failure mode of a synchronization
//! run, each variant carrying enough context to report the failure against
//! a specific source, ref, or path.
//!
//! The severity of an error is decided by the caller, not encoded here:
//! the same `TargetIo` value may skip a single file (inside the pipeline)
//! or a whole document set (when the target directory cannot be created).
//! Source-level errors (`GitClone`, `GitCommand`, `RefMismatch`,
//! `CacheCorruption`) abort processing for one source only; the run
//! continues with the remaining sources.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for doc-sync operations
#[derive(Error, Debug)]
pub enum Error {
    /// An error occurred while parsing or validating the sources
    /// configuration file.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// Cloning a source repository failed. The partial clone directory has
    /// already been cleaned up when this is returned.
    #[error("Git clone error for {url}@{r#ref}: {message}")]
    GitClone {
        url: String,
        r#ref: String,
        message: String,
    },

    /// A git subcommand against an existing cache slot failed
    /// (fetch, checkout, pull, reset, rev-parse).
    #[error("Git command failed: {command} - {stderr}")]
    GitCommand { command: String, stderr: String },

    /// The checked-out state of a cache slot does not match the requested
    /// ref, either because a tag's commit diverged from HEAD or because the
    /// active branch could not be moved to the requested one.
    #[error("Ref resolution error for '{r#ref}': {message}")]
    RefMismatch { r#ref: String, message: String },

    /// A cache slot was found structurally invalid and could not be
    /// removed for recreation. Self-healed corruption is not reported
    /// through this variant; only a failed recreation is.
    #[error("Cache corruption at '{}': {message}", path.display())]
    CacheCorruption { path: PathBuf, message: String },

    /// A target directory or file in the output tree could not be created
    /// or written.
    #[error("Target I/O error at '{}': {message}", path.display())]
    TargetIo { path: PathBuf, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
