//! End-to-end tests for the `validate` and `ls` commands.
//!
//! These tests invoke the actual CLI binary and validate the read-only
//! subcommands from a user's perspective. No git or network involved.

mod common;

use common::TestFixture;
use predicates::prelude::*;
use std::fs;

const VALID: &str = r#"
processed_docs_root: docs
sources:
  - id: widget-service
    name: Widget Service
    repo_url: https://github.com/example/widget-service.git
    branch: main
    default_front_matter:
      layout: doc
    documents:
      - target_dir: widgets/guide
        base_repo_path: docs
        markdown_files: [intro.md, setup/install.md]
      - target_dir: widgets/api
        markdown_files: [api.md]
"#;

#[test]
fn test_validate_valid_config() {
    let fixture = TestFixture::new();
    let config = fixture.with_config(VALID);

    fixture
        .command()
        .arg("validate")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("1 source(s), 2 document set(s), 3 file(s)"));
}

#[test]
fn test_validate_invalid_yaml() {
    let fixture = TestFixture::new();
    let config = fixture.with_config("processed_docs_root: [unclosed\n");

    fixture
        .command()
        .arg("validate")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure();
}

#[test]
fn test_validate_duplicate_source_ids() {
    let fixture = TestFixture::new();
    let config = fixture.with_config(
        r#"
processed_docs_root: docs
sources:
  - id: twin
    name: First
    repo_url: https://example.com/a.git
    branch: main
    documents:
      - target_dir: a
        markdown_files: [a.md]
  - id: twin
    name: Second
    repo_url: https://example.com/b.git
    branch: main
    documents:
      - target_dir: b
        markdown_files: [b.md]
"#,
    );

    fixture
        .command()
        .arg("validate")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate source id"));
}

#[test]
fn test_validate_missing_config_file() {
    let fixture = TestFixture::new();
    fixture
        .command()
        .arg("validate")
        .arg("--config")
        .arg(fixture.path().join("absent.yaml"))
        .assert()
        .failure();
}

#[test]
fn test_validate_empty_markdown_files_rejected() {
    let fixture = TestFixture::new();
    let config = fixture.with_config(
        r#"
processed_docs_root: docs
sources:
  - id: widget
    name: Widget
    repo_url: https://example.com/w.git
    branch: main
    documents:
      - target_dir: w
        markdown_files: []
"#,
    );

    fixture
        .command()
        .arg("validate")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("markdown_files"));
}

#[test]
fn test_ls_lists_output_tree() {
    let fixture = TestFixture::new();
    let docs = fixture.output_root();
    fs::create_dir_all(docs.join("widgets")).unwrap();
    fs::write(docs.join("widgets/intro.md"), "x").unwrap();
    fs::write(docs.join("index.md"), "y").unwrap();

    fixture
        .command()
        .arg("ls")
        .arg("--output")
        .arg(&docs)
        .assert()
        .success()
        .stdout(predicate::str::contains("index.md"))
        .stdout(predicate::str::contains("widgets/\n"))
        .stdout(predicate::str::contains("widgets/intro.md"));
}

#[test]
fn test_ls_reads_output_root_from_config() {
    let fixture = TestFixture::new();
    let config = fixture.with_config(VALID);
    let docs = fixture.path().join("docs");
    fs::create_dir_all(&docs).unwrap();
    fs::write(docs.join("page.md"), "z").unwrap();

    fixture
        .command()
        .arg("ls")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("page.md"));
}

#[test]
fn test_completions_bash() {
    let fixture = TestFixture::new();
    fixture
        .command()
        .arg("completions")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("doc-sync"));
}
