//! # Configuration Schema and Parsing
//!
//! This module defines the data structures that represent the
//! `sources.yaml` configuration file, as well as the logic for parsing
//! and validating it.
//!
//! ## Key Components
//!
//! - **`Config`**: The root of the configuration: a global output root
//!   plus the list of configured sources.
//!
//! - **`Source`**: One external repository to mirror, including its cache
//!   slot key (`id`), remote URL, target ref, default front-matter fields,
//!   and document sets.
//!
//! - **`DocumentSet`**: One group of file paths within a source, mapped to
//!   a sub-path of the output tree.
//!
//! ## Validation
//!
//! `load` reads, parses and validates a file in one call; everything
//! downstream of this module trusts that required keys are present and
//! correctly typed. Validation failures are reported as
//! [`Error::ConfigParse`] with a hint where one helps.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The entire `sources.yaml` configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root of the output tree that mirrored documents are written into.
    pub processed_docs_root: PathBuf,
    /// The sources to mirror, processed in declared order.
    pub sources: Vec<Source>,
}

/// One external repository configured for mirroring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    /// Unique identifier, used as the cache-slot directory name.
    pub id: String,
    /// Human-readable display name.
    pub name: String,
    /// Remote URL of the repository. Anything the system `git` accepts:
    /// https, ssh, scp-style, or a local path.
    pub repo_url: String,
    /// The ref to check out: a branch or tag name.
    pub branch: String,
    /// Default front-matter fields applied to every file from this source
    /// that does not already carry a header. Values may be scalars,
    /// sequences, or mappings.
    #[serde(default)]
    pub default_front_matter: serde_yaml::Mapping,
    /// The document sets to mirror, processed in declared order.
    pub documents: Vec<DocumentSet>,
}

/// One named group of files within a source, mapped to one output sub-path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSet {
    /// Sub-path under the output root that this set is written into.
    pub target_dir: String,
    /// Sub-path inside the source's working tree that file paths are
    /// resolved against. Empty means the repository root.
    #[serde(default)]
    pub base_repo_path: String,
    /// File paths to mirror, relative to `base_repo_path`. May contain
    /// sub-paths (`setup/install.md`), which are preserved in the target.
    pub markdown_files: Vec<String>,
    /// Asset directory trees to copy verbatim alongside the documents.
    #[serde(default)]
    pub image_dirs: Vec<String>,
}

/// Load a configuration from a file: read, parse, validate.
pub fn load(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| Error::ConfigParse {
        message: format!("cannot read '{}': {}", path.display(), e),
        hint: None,
    })?;
    let config = parse(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Parse a YAML string into a `Config`.
pub fn parse(content: &str) -> Result<Config> {
    serde_yaml::from_str(content).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: None,
    })
}

/// Validate the structural invariants the rest of the system relies on.
pub fn validate(config: &Config) -> Result<()> {
    if config.processed_docs_root.as_os_str().is_empty() {
        return Err(Error::ConfigParse {
            message: "'processed_docs_root' must not be empty".to_string(),
            hint: None,
        });
    }
    if config.sources.is_empty() {
        return Err(Error::ConfigParse {
            message: "'sources' must contain at least one source".to_string(),
            hint: None,
        });
    }

    let mut seen_ids = HashSet::new();
    for source in &config.sources {
        validate_source(source)?;
        if !seen_ids.insert(source.id.as_str()) {
            return Err(Error::ConfigParse {
                message: format!("duplicate source id '{}'", source.id),
                hint: Some("source ids are cache-slot keys and must be unique".to_string()),
            });
        }
    }
    Ok(())
}

fn validate_source(source: &Source) -> Result<()> {
    for (field, value) in [
        ("id", &source.id),
        ("name", &source.name),
        ("repo_url", &source.repo_url),
        ("branch", &source.branch),
    ] {
        if value.trim().is_empty() {
            return Err(Error::ConfigParse {
                message: format!(
                    "source '{}' has an empty '{}'",
                    if source.id.is_empty() { "<unnamed>" } else { source.id.as_str() },
                    field
                ),
                hint: None,
            });
        }
    }

    // scp-style remotes (git@host:path) are not URLs; only check strings
    // that claim a scheme.
    if source.repo_url.contains("://") {
        url::Url::parse(&source.repo_url).map_err(|e| Error::ConfigParse {
            message: format!("source '{}' has an invalid repo_url: {}", source.id, e),
            hint: None,
        })?;
    }

    if source.documents.is_empty() {
        return Err(Error::ConfigParse {
            message: format!("source '{}' has no document sets", source.id),
            hint: Some("every source needs at least one 'documents' entry".to_string()),
        });
    }
    for set in &source.documents {
        if set.target_dir.trim().is_empty() {
            return Err(Error::ConfigParse {
                message: format!("source '{}' has a document set with an empty 'target_dir'", source.id),
                hint: None,
            });
        }
        if set.markdown_files.is_empty() {
            return Err(Error::ConfigParse {
                message: format!(
                    "document set '{}' in source '{}' lists no markdown_files",
                    set.target_dir, source.id
                ),
                hint: None,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
processed_docs_root: docs
sources:
  - id: widget-service
    name: Widget Service
    repo_url: https://github.com/example/widget-service.git
    branch: main
    default_front_matter:
      layout: doc
      tags: [generated, mirrored]
    documents:
      - target_dir: widgets/guide
        base_repo_path: docs
        markdown_files:
          - intro.md
          - setup/install.md
        image_dirs:
          - images
  - id: gadget-lib
    name: Gadget Library
    repo_url: git@github.com:example/gadget-lib.git
    branch: v2.1.0
    documents:
      - target_dir: gadgets
        markdown_files: [README.md]
"#;

    #[test]
    fn test_parse_full_config() {
        let config = parse(FULL).unwrap();
        assert_eq!(config.processed_docs_root, PathBuf::from("docs"));
        assert_eq!(config.sources.len(), 2);

        let widget = &config.sources[0];
        assert_eq!(widget.id, "widget-service");
        assert_eq!(widget.branch, "main");
        assert_eq!(widget.default_front_matter.len(), 2);
        assert_eq!(widget.documents.len(), 1);
        assert_eq!(widget.documents[0].base_repo_path, "docs");
        assert_eq!(widget.documents[0].markdown_files.len(), 2);
        assert_eq!(widget.documents[0].image_dirs, vec!["images"]);

        // Optional fields default when absent
        let gadget = &config.sources[1];
        assert!(gadget.default_front_matter.is_empty());
        assert_eq!(gadget.documents[0].base_repo_path, "");
        assert!(gadget.documents[0].image_dirs.is_empty());
    }

    #[test]
    fn test_validate_full_config() {
        let config = parse(FULL).unwrap();
        validate(&config).unwrap();
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let result = parse("processed_docs_root: [unclosed");
        assert!(matches!(result, Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_parse_missing_required_key() {
        // No repo_url on the source
        let result = parse(
            r#"
processed_docs_root: docs
sources:
  - id: a
    name: A
    branch: main
    documents:
      - target_dir: a
        markdown_files: [x.md]
"#,
        );
        assert!(result.is_err());
    }

    fn minimal(id: &str) -> Source {
        Source {
            id: id.to_string(),
            name: "Test".to_string(),
            repo_url: "https://example.com/repo.git".to_string(),
            branch: "main".to_string(),
            default_front_matter: serde_yaml::Mapping::new(),
            documents: vec![DocumentSet {
                target_dir: "out".to_string(),
                base_repo_path: String::new(),
                markdown_files: vec!["README.md".to_string()],
                image_dirs: vec![],
            }],
        }
    }

    fn config_of(sources: Vec<Source>) -> Config {
        Config {
            processed_docs_root: PathBuf::from("docs"),
            sources,
        }
    }

    #[test]
    fn test_validate_duplicate_ids() {
        let config = config_of(vec![minimal("dup"), minimal("dup")]);
        let err = validate(&config).unwrap_err();
        assert!(format!("{}", err).contains("duplicate source id 'dup'"));
    }

    #[test]
    fn test_validate_empty_sources() {
        let config = config_of(vec![]);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_empty_branch() {
        let mut source = minimal("a");
        source.branch = "  ".to_string();
        let err = validate(&config_of(vec![source])).unwrap_err();
        assert!(format!("{}", err).contains("'branch'"));
    }

    #[test]
    fn test_validate_bad_url() {
        let mut source = minimal("a");
        source.repo_url = "http://".to_string();
        assert!(validate(&config_of(vec![source])).is_err());
    }

    #[test]
    fn test_validate_scp_style_url_accepted() {
        let mut source = minimal("a");
        source.repo_url = "git@github.com:example/repo.git".to_string();
        validate(&config_of(vec![source])).unwrap();
    }

    #[test]
    fn test_validate_local_path_url_accepted() {
        let mut source = minimal("a");
        source.repo_url = "/srv/git/docs.git".to_string();
        validate(&config_of(vec![source])).unwrap();
    }

    #[test]
    fn test_validate_no_document_sets() {
        let mut source = minimal("a");
        source.documents.clear();
        let err = validate(&config_of(vec![source])).unwrap_err();
        assert!(format!("{}", err).contains("no document sets"));
    }

    #[test]
    fn test_validate_empty_markdown_files() {
        let mut source = minimal("a");
        source.documents[0].markdown_files.clear();
        let err = validate(&config_of(vec![source])).unwrap_err();
        assert!(format!("{}", err).contains("markdown_files"));
    }

    #[test]
    fn test_validate_empty_target_dir() {
        let mut source = minimal("a");
        source.documents[0].target_dir = String::new();
        let err = validate(&config_of(vec![source])).unwrap_err();
        assert!(format!("{}", err).contains("target_dir"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load(Path::new("/nonexistent/sources.yaml"));
        assert!(matches!(result, Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sources.yaml");
        fs::write(&path, FULL).unwrap();
        let config = load(&path).unwrap();
        assert_eq!(config.sources.len(), 2);
    }
}
