//! # Repository Cache State Machine
//!
//! This module brings the local mirror of each configured source into a
//! known, consistent state. Every run re-inspects the cache slot on disk
//! rather than trusting persisted state, which makes the machine robust
//! to interrupted clones and external tampering.
//!
//! ## States
//!
//! A slot is classified by [`SlotState`]:
//!
//! - **`Absent`**: no slot directory. Resolved by cloning at the
//!   requested ref.
//! - **`Invalid`**: a directory exists but is not a git working copy.
//!   Resolved by removing it and retrying as `Absent` (self-healing).
//! - **`Present`**: a valid working copy whose ref is not yet resolved.
//!   Resolved by fetch + checkout, then fast-forward (tracking branch)
//!   or hard reset (non-tracking branch).
//!
//! The terminal success state is the returned slot path: working
//! directory content matching the requested ref.
//!
//! ## Design
//!
//! Git access goes through the [`GitOperations`] trait so every
//! transition is unit-testable against a scripted mock; the production
//! implementation ([`SystemGit`]) shells out to the system `git` via
//! [`crate::git`]. Hard-resetting a non-tracking branch is deliberate:
//! the cache is disposable, local commits in a slot are never meaningful,
//! and a clean overwrite is more robust than any reconciliation.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::config::Source;
use crate::error::{Error, Result};
use crate::git::{self, HeadState};

/// Git primitives required by the state machine.
///
/// Mirrors the system `git` subcommands one-to-one; implementations must
/// not add retry or fallback behavior of their own.
pub trait GitOperations: Send + Sync {
    /// Whether `path` is itself a valid git working copy.
    fn is_working_copy(&self, path: &Path) -> bool;

    /// Clone `url` into `target` with `ref_name` checked out.
    fn clone_at_ref(&self, url: &str, ref_name: &str, target: &Path) -> Result<()>;

    /// Fetch from origin with pruning of stale remote-tracking refs.
    fn fetch_prune(&self, workdir: &Path) -> Result<()>;

    /// Check out a branch or tag by name.
    fn checkout(&self, workdir: &Path, ref_name: &str) -> Result<()>;

    /// Inspect HEAD.
    fn head_state(&self, workdir: &Path) -> Result<HeadState>;

    /// The upstream a local branch tracks, if any.
    fn tracking_upstream(&self, workdir: &Path, branch: &str) -> Result<Option<String>>;

    /// Fast-forward the active branch from its upstream.
    fn pull_ff(&self, workdir: &Path) -> Result<()>;

    /// Hard-reset the working directory to `target`.
    fn reset_hard(&self, workdir: &Path, target: &str) -> Result<()>;

    /// Resolve a tag to its peeled commit, when the tag exists.
    fn tag_commit(&self, workdir: &Path, tag: &str) -> Result<Option<String>>;
}

/// Production [`GitOperations`] backed by the system `git` command.
pub struct SystemGit;

impl GitOperations for SystemGit {
    fn is_working_copy(&self, path: &Path) -> bool {
        git::is_working_copy(path)
    }

    fn clone_at_ref(&self, url: &str, ref_name: &str, target: &Path) -> Result<()> {
        git::clone_at_ref(url, ref_name, target)
    }

    fn fetch_prune(&self, workdir: &Path) -> Result<()> {
        git::fetch_prune(workdir)
    }

    fn checkout(&self, workdir: &Path, ref_name: &str) -> Result<()> {
        git::checkout(workdir, ref_name)
    }

    fn head_state(&self, workdir: &Path) -> Result<HeadState> {
        git::head_state(workdir)
    }

    fn tracking_upstream(&self, workdir: &Path, branch: &str) -> Result<Option<String>> {
        git::tracking_upstream(workdir, branch)
    }

    fn pull_ff(&self, workdir: &Path) -> Result<()> {
        git::pull_ff(workdir)
    }

    fn reset_hard(&self, workdir: &Path, target: &str) -> Result<()> {
        git::reset_hard(workdir, target)
    }

    fn tag_commit(&self, workdir: &Path, tag: &str) -> Result<Option<String>> {
        git::tag_commit(workdir, tag)
    }
}

/// On-disk state of a cache slot, inferred by inspection each run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// No slot directory exists.
    Absent,
    /// A directory exists but is not a git working copy.
    Invalid,
    /// A valid working copy exists; ref not yet resolved.
    Present,
}

/// Manages the cache slots under one cache root, one slot per source id.
pub struct CacheManager {
    git: Box<dyn GitOperations>,
    cache_root: PathBuf,
}

impl CacheManager {
    /// Create a manager using the system `git` command.
    pub fn new(cache_root: PathBuf) -> Self {
        Self {
            git: Box::new(SystemGit),
            cache_root,
        }
    }

    /// Create a manager with a custom git implementation.
    ///
    /// This is primarily used for testing to inject scripted operations.
    pub fn with_git(git: Box<dyn GitOperations>, cache_root: PathBuf) -> Self {
        Self { git, cache_root }
    }

    /// The slot directory for a source id.
    pub fn slot_path(&self, id: &str) -> PathBuf {
        self.cache_root.join(id)
    }

    /// Classify a slot directory.
    pub fn inspect_slot(&self, slot: &Path) -> SlotState {
        if !slot.exists() {
            SlotState::Absent
        } else if self.git.is_working_copy(slot) {
            SlotState::Present
        } else {
            SlotState::Invalid
        }
    }

    /// Bring the slot for `source` to the requested ref and return its
    /// absolute path.
    ///
    /// Any error is terminal for this source only; the slot is left for
    /// the next run to re-inspect (a failed clone is cleaned up so the
    /// next run starts from `Absent`).
    pub fn sync(&self, source: &Source) -> Result<PathBuf> {
        let slot = self.slot_path(&source.id);

        let mut state = self.inspect_slot(&slot);
        if state == SlotState::Invalid {
            warn!(
                "cache slot '{}' is not a valid working copy, removing for re-clone",
                slot.display()
            );
            fs::remove_dir_all(&slot).map_err(|e| Error::CacheCorruption {
                path: slot.clone(),
                message: e.to_string(),
            })?;
            state = SlotState::Absent;
        }

        match state {
            SlotState::Present => self.update_slot(source, &slot)?,
            _ => self.clone_slot(source, &slot)?,
        }

        self.verify_ref(source, &slot)?;

        let path = fs::canonicalize(&slot)?;
        debug!("slot '{}' ready at {}", source.id, path.display());
        Ok(path)
    }

    /// `Absent` -> clone at the requested ref. A failed clone removes any
    /// partial slot directory before reporting the error.
    fn clone_slot(&self, source: &Source, slot: &Path) -> Result<()> {
        info!(
            "cloning '{}' from {} (ref: {})",
            source.id, source.repo_url, source.branch
        );
        if let Err(e) = self.git.clone_at_ref(&source.repo_url, &source.branch, slot) {
            if slot.exists() {
                if let Err(cleanup) = fs::remove_dir_all(slot) {
                    warn!(
                        "could not remove partial clone '{}': {}",
                        slot.display(),
                        cleanup
                    );
                }
            }
            return Err(e);
        }
        Ok(())
    }

    /// `Present` -> fetch, checkout, then fast-forward or hard-reset
    /// depending on whether the active branch tracks an upstream.
    fn update_slot(&self, source: &Source, slot: &Path) -> Result<()> {
        debug!("updating existing slot for '{}'", source.id);
        self.git.fetch_prune(slot)?;
        self.checkout_ref(source, slot)?;

        match self.git.head_state(slot)? {
            HeadState::Attached { branch } => {
                if self.git.tracking_upstream(slot, &branch)?.is_some() {
                    debug!("fast-forwarding tracking branch '{}'", branch);
                    self.git.pull_ff(slot)?;
                } else {
                    // Local commits in the cache are never meaningful;
                    // overwrite instead of reconciling.
                    let target = format!("origin/{}", source.branch);
                    info!("branch '{}' tracks no upstream, resetting to {}", branch, target);
                    self.git.reset_hard(slot, &target)?;
                }
            }
            HeadState::Detached { .. } => {
                // Tag or fixed-commit checkout; verified below.
                debug!("HEAD is detached for '{}', skipping pull", source.id);
            }
        }
        Ok(())
    }

    /// Check out the requested ref, reporting failure as unresolvable.
    fn checkout_ref(&self, source: &Source, slot: &Path) -> Result<()> {
        self.git
            .checkout(slot, &source.branch)
            .map_err(|e| Error::RefMismatch {
                r#ref: source.branch.clone(),
                message: e.to_string(),
            })
    }

    /// Final consistency check: the checked-out state must match the
    /// requested ref. A detached HEAD at a tag must sit on the tag's
    /// commit; an attached HEAD must be on the requested branch, with one
    /// checkout retry before giving up.
    fn verify_ref(&self, source: &Source, slot: &Path) -> Result<()> {
        match self.git.head_state(slot)? {
            HeadState::Detached { commit } => {
                if let Some(tag_commit) = self.git.tag_commit(slot, &source.branch)? {
                    if tag_commit != commit {
                        return Err(Error::RefMismatch {
                            r#ref: source.branch.clone(),
                            message: format!(
                                "tag resolves to {} but HEAD is at {}",
                                tag_commit, commit
                            ),
                        });
                    }
                }
                Ok(())
            }
            HeadState::Attached { branch } if branch == source.branch => Ok(()),
            HeadState::Attached { branch } => {
                warn!(
                    "active branch is '{}', expected '{}'; retrying checkout",
                    branch, source.branch
                );
                self.checkout_ref(source, slot)?;
                match self.git.head_state(slot)? {
                    HeadState::Attached { branch } if branch == source.branch => Ok(()),
                    other => Err(Error::RefMismatch {
                        r#ref: source.branch.clone(),
                        message: format!("could not settle on requested branch, HEAD is {:?}", other),
                    }),
                }
            }
        }
    }
}
