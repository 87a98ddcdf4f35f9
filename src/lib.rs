//! # Doc-Sync Library
//!
//! This library mirrors markdown documentation from a set of external
//! git repositories into a single local documentation tree, normalizing
//! each file by ensuring it carries a YAML front-matter header. It is
//! designed to be used by the `doc-sync` command-line tool but can also
//! be integrated into other applications that aggregate documentation.
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: The `sources.yaml` schema — which
//!   repositories to mirror, which files from each, and where they land
//!   in the output tree.
//! - **Repository Cache (`repository`, `git`)**: One local working-copy
//!   mirror per source, brought to the requested ref on every run by a
//!   state machine that clones, fetches, fast-forwards, or hard-resets
//!   as the slot's on-disk state demands, and self-heals from corruption.
//! - **Normalization Pipeline (`pipeline`, `front_matter`)**: Copies the
//!   declared files of a ready source into the output tree, injecting a
//!   generated front-matter header into files that lack one.
//!
//! ## Execution Flow
//!
//! For each configured source, the driver obtains a ready working
//! directory from [`repository::CacheManager::sync`] and hands it to
//! [`pipeline::normalize`] together with the source's document sets. A
//! failed source never stops the run; remaining sources proceed and the
//! failure is reported in the final summary.
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//! use doc_sync::{config, pipeline, repository::CacheManager};
//!
//! let config = config::load(Path::new("sources.yaml")).unwrap();
//! let manager = CacheManager::new(PathBuf::from(".doc-cache"));
//! for source in &config.sources {
//!     if let Ok(workdir) = manager.sync(source) {
//!         pipeline::normalize(source, &workdir, &config.processed_docs_root);
//!     }
//! }
//! ```

pub mod config;
pub mod defaults;
pub mod error;
pub mod front_matter;
pub mod git;
pub mod output;
pub mod pipeline;
pub mod repository;
