//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures and helpers to reduce
//! duplication across test files: a temp-dir fixture that carries a
//! `sources.yaml`, and local git repositories used as file-path remotes
//! so no test ever touches the network.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new();
//!     let remote = fixture.init_remote("remote", &[("README.md", "# Hi\n")]);
//!     // ... test code
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_fs::prelude::*;

/// A test fixture providing a temporary directory for remotes, cache,
/// output tree, and configuration file.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a `sources.yaml` with the given content and return its path.
    pub fn with_config(&self, content: &str) -> PathBuf {
        self.temp_dir
            .child("sources.yaml")
            .write_str(content)
            .expect("Failed to write config file");
        self.path().join("sources.yaml")
    }

    /// The cache root used by tests in this fixture.
    pub fn cache_root(&self) -> PathBuf {
        self.path().join("cache")
    }

    /// The output root used by tests in this fixture.
    pub fn output_root(&self) -> PathBuf {
        self.path().join("docs")
    }

    /// Initialize a local git repository under `name` with an initial
    /// commit containing `files`, on branch `main`.
    pub fn init_remote(&self, name: &str, files: &[(&str, &str)]) -> PathBuf {
        let repo = self.path().join(name);
        fs::create_dir_all(&repo).expect("Failed to create remote directory");
        git(&repo, &["init", "-q", "-b", "main"]);
        write_files(&repo, files);
        git(&repo, &["add", "-A"]);
        git(&repo, &["commit", "-q", "-m", "initial import"]);
        repo
    }

    /// Create a command configured to run the doc-sync binary in this
    /// fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("doc-sync");
        cmd.current_dir(self.path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Write files (creating parent directories) into a repository.
#[allow(dead_code)]
pub fn write_files(repo: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full = repo.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(full, content).expect("Failed to write file");
    }
}

/// Add a commit to a repository with the given files.
#[allow(dead_code)]
pub fn commit_files(repo: &Path, message: &str, files: &[(&str, &str)]) {
    write_files(repo, files);
    git(repo, &["add", "-A"]);
    git(repo, &["commit", "-q", "-m", message]);
}

/// Run a git subcommand in `dir`, with identity pinned so commits work
/// in bare CI environments. Panics on failure.
#[allow(dead_code)]
pub fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args([
            "-c",
            "user.name=Doc Sync Tests",
            "-c",
            "user.email=tests@doc-sync.invalid",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .status()
        .expect("git must be installed for integration tests");
    assert!(status.success(), "git {:?} failed in {:?}", args, dir);
}

/// Resolve a rev to a commit hash in `dir`.
#[allow(dead_code)]
pub fn rev_parse(dir: &Path, rev: &str) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["rev-parse", rev])
        .output()
        .expect("git must be installed for integration tests");
    assert!(output.status.success(), "rev-parse {} failed in {:?}", rev, dir);
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
