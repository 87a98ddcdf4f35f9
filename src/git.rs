//! # Git Primitives
//!
//! Thin wrappers over the system `git` command, which automatically
//! handles:
//! - SSH keys from ~/.ssh/
//! - Git credential helpers
//! - Personal access tokens
//! - Any authentication configured in ~/.gitconfig
//!
//! Every function here operates on one working directory (a cache slot)
//! and maps a non-zero exit status to [`Error::GitCommand`] carrying the
//! failed subcommand and its stderr. The state machine that sequences
//! these primitives lives in [`crate::repository`].

use std::path::Path;
use std::process::{Command, Output};

use crate::error::{Error, Result};

/// The checked-out HEAD of a working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadState {
    /// HEAD points at a local branch.
    Attached { branch: String },
    /// HEAD points directly at a commit (tag or fixed-commit checkout).
    Detached { commit: String },
}

/// Whether the directory is itself a usable git working copy.
pub fn is_working_copy(path: &Path) -> bool {
    // rev-parse discovers repositories upward through parent directories;
    // requiring the slot's own .git keeps a corrupt slot inside some outer
    // repository from passing as valid.
    if !path.join(".git").exists() {
        return false;
    }
    Command::new("git")
        .arg("-C")
        .arg(path)
        .args(["rev-parse", "--git-dir"])
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// Clone `url` into `target`, checking out `ref_name` (branch or tag).
///
/// The caller owns cleanup of a partially created `target` on failure.
pub fn clone_at_ref(url: &str, ref_name: &str, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let output = Command::new("git")
        .args(["clone", "--branch", ref_name, url])
        .arg(target)
        .output()
        .map_err(|e| Error::GitClone {
            url: url.to_string(),
            r#ref: ref_name.to_string(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::GitClone {
            url: url.to_string(),
            r#ref: ref_name.to_string(),
            message: describe_clone_failure(&stderr),
        });
    }
    Ok(())
}

/// Fetch from origin, pruning remote-tracking refs that no longer exist.
pub fn fetch_prune(workdir: &Path) -> Result<()> {
    run(workdir, &["fetch", "--prune", "origin"]).map(|_| ())
}

/// Check out a branch or tag by name.
pub fn checkout(workdir: &Path, ref_name: &str) -> Result<()> {
    run(workdir, &["checkout", ref_name]).map(|_| ())
}

/// Inspect HEAD: the active branch name, or the commit of a detached HEAD.
pub fn head_state(workdir: &Path) -> Result<HeadState> {
    // symbolic-ref exits non-zero for a detached HEAD; that is state,
    // not an error.
    let output = raw(workdir, &["symbolic-ref", "--quiet", "--short", "HEAD"])?;
    if output.status.success() {
        return Ok(HeadState::Attached {
            branch: stdout_line(&output),
        });
    }
    let commit = run(workdir, &["rev-parse", "HEAD"])?;
    Ok(HeadState::Detached { commit })
}

/// The upstream ref a branch tracks, if any.
pub fn tracking_upstream(workdir: &Path, branch: &str) -> Result<Option<String>> {
    let upstream = format!("{}@{{upstream}}", branch);
    let output = raw(
        workdir,
        &["rev-parse", "--abbrev-ref", "--symbolic-full-name", &upstream],
    )?;
    if output.status.success() {
        Ok(Some(stdout_line(&output)))
    } else {
        // No upstream configured; rev-parse fails but nothing is broken.
        Ok(None)
    }
}

/// Fast-forward the active tracking branch from its upstream.
pub fn pull_ff(workdir: &Path) -> Result<()> {
    run(workdir, &["pull", "--ff-only"]).map(|_| ())
}

/// Hard-reset the working directory to `target` (e.g. `origin/main`),
/// discarding any local divergence.
pub fn reset_hard(workdir: &Path, target: &str) -> Result<()> {
    run(workdir, &["reset", "--hard", target]).map(|_| ())
}

/// Resolve a tag name to the commit it points at, peeling annotated tags.
/// Returns `None` when no such tag exists in the working directory.
pub fn tag_commit(workdir: &Path, tag: &str) -> Result<Option<String>> {
    let rev = format!("refs/tags/{}^{{commit}}", tag);
    let output = raw(workdir, &["rev-parse", "--verify", "--quiet", &rev])?;
    if output.status.success() {
        Ok(Some(stdout_line(&output)))
    } else {
        Ok(None)
    }
}

/// Run a git subcommand, requiring success; returns trimmed stdout.
fn run(workdir: &Path, args: &[&str]) -> Result<String> {
    let output = raw(workdir, args)?;
    if !output.status.success() {
        return Err(Error::GitCommand {
            command: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(stdout_line(&output))
}

/// Run a git subcommand without judging its exit status.
fn raw(workdir: &Path, args: &[&str]) -> Result<Output> {
    Command::new("git")
        .arg("-C")
        .arg(workdir)
        .args(args)
        .output()
        .map_err(|e| Error::GitCommand {
            command: args.join(" "),
            stderr: e.to_string(),
        })
}

fn stdout_line(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Expand common clone failures into an actionable message.
fn describe_clone_failure(stderr: &str) -> String {
    if stderr.contains("Authentication failed")
        || stderr.contains("Permission denied")
        || stderr.contains("Could not read from remote repository")
    {
        format!(
            "Authentication failed. Make sure you have access to the repository \
             (SSH key in ssh-agent, credentials configured, or access token set up).\n\
             Error: {}",
            stderr
        )
    } else if stderr.contains("Remote branch") && stderr.contains("not found") {
        format!("Requested ref does not exist on the remote.\nError: {}", stderr)
    } else {
        stderr.to_string()
    }
}
