//! Default values for doc-sync configuration.
//!
//! Centralized defaults used across commands, ensuring consistency and
//! avoiding duplication.

use std::path::PathBuf;

/// Default name of the sources configuration file.
pub const DEFAULT_CONFIG_FILENAME: &str = "sources.yaml";

/// Returns the default cache root directory.
///
/// Uses the platform-appropriate cache directory:
/// - Linux: `~/.cache/doc-sync` (XDG Base Directory)
/// - macOS: `~/Library/Caches/doc-sync`
/// - Windows: `{FOLDERID_LocalAppData}\doc-sync`
///
/// Falls back to `.doc-sync-cache` in the current directory if the
/// platform cache directory cannot be determined.
///
/// This can be overridden by the `--cache-root` CLI flag or the
/// `DOC_SYNC_CACHE` environment variable.
pub fn default_cache_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".doc-sync-cache"))
        .join("doc-sync")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cache_root_ends_with_app_dir() {
        let cache_root = default_cache_root();
        assert!(cache_root.ends_with("doc-sync"));
    }

    #[test]
    fn test_default_config_filename() {
        assert_eq!(DEFAULT_CONFIG_FILENAME, "sources.yaml");
    }
}
