//! # Document Normalization Pipeline
//!
//! Walks the document sets of a synced source, copies each declared file
//! into the output tree, and injects front matter where none exists.
//!
//! ## Process
//!
//! 1.  **Resolve paths**: per document set, join the working-tree root
//!     with the set's base path and the output root with its target path.
//!
//! 2.  **Create target directories**: recursively, and idempotently; a
//!     failure skips only the affected document set.
//!
//! 3.  **Normalize files**: each declared file is read, annotated when it
//!     carries no front matter, and written to the target unconditionally.
//!     Synchronization is authoritative from the source, so stale target
//!     content can never linger.
//!
//! 4.  **Copy assets**: declared asset directories are mirrored verbatim
//!     under the same target directory.
//!
//! Failure isolation is per-file: a missing source file or a failed write
//! is logged and skipped without aborting the remaining files, sets, or
//! sources. The pipeline itself never returns an error; it reports
//! whether at least one document was processed.

use std::fs;
use std::path::Path;

use log::{debug, error, warn};
use walkdir::WalkDir;

use crate::config::{DocumentSet, Source};
use crate::error::{Error, Result};
use crate::front_matter;

/// Mirror and normalize all document sets of a synced source.
///
/// `repo_path` is the source's ready cache slot; `output_root` the global
/// output tree. Returns whether at least one document was processed;
/// zero processed is reported as a warning by the caller, not an error.
pub fn normalize(source: &Source, repo_path: &Path, output_root: &Path) -> bool {
    let mut processed_any = false;

    for set in &source.documents {
        let source_base = repo_path.join(&set.base_repo_path);
        let target_dir = output_root.join(set.target_dir.trim_matches('/'));

        if let Err(e) = fs::create_dir_all(&target_dir) {
            error!(
                "cannot create target directory '{}', skipping document set: {}",
                target_dir.display(),
                e
            );
            continue;
        }

        for file_path in &set.markdown_files {
            match normalize_file(source, set, &source_base, &target_dir, file_path) {
                Ok(true) => processed_any = true,
                Ok(false) => {}
                Err(e) => error!("error processing '{}': {}", file_path, e),
            }
        }

        for asset_dir in &set.image_dirs {
            copy_asset_tree(&source_base.join(asset_dir), &target_dir.join(asset_dir));
        }
    }

    if !processed_any {
        warn!("no documents processed for source '{}'", source.id);
    }
    processed_any
}

/// Normalize one declared file into the target directory.
///
/// Returns `Ok(false)` for a missing source file (warned, not fatal) and
/// `Ok(true)` once the target file has been written.
fn normalize_file(
    source: &Source,
    set: &DocumentSet,
    source_base: &Path,
    target_dir: &Path,
    file_path: &str,
) -> Result<bool> {
    let source_file = source_base.join(file_path);
    if !source_file.is_file() {
        warn!(
            "source file not found: '{}' (set '{}')",
            source_file.display(),
            set.target_dir
        );
        return Ok(false);
    }

    let content = fs::read_to_string(&source_file)?;

    let file_name = Path::new(file_path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.to_string());
    let final_content = front_matter::apply(&content, &source.default_front_matter, &file_name)?;
    if !front_matter::has_front_matter(&content) {
        debug!("adding front matter to '{}'", file_path);
    }

    // Declared paths may carry sub-directories of their own.
    let target_file = target_dir.join(file_path);
    if let Some(parent) = target_file.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::TargetIo {
            path: parent.to_path_buf(),
            message: e.to_string(),
        })?;
    }
    fs::write(&target_file, final_content).map_err(|e| Error::TargetIo {
        path: target_file.clone(),
        message: e.to_string(),
    })?;

    debug!(
        "processed '{}' -> '{}'",
        source_file.display(),
        target_file.display()
    );
    Ok(true)
}

/// Copy a declared asset directory tree verbatim, preserving layout.
///
/// Per-entry failures are logged and skipped; a missing asset directory
/// is a warning like a missing document.
fn copy_asset_tree(source_dir: &Path, target_dir: &Path) {
    if !source_dir.is_dir() {
        warn!("asset directory not found: '{}'", source_dir.display());
        return;
    }

    for entry in WalkDir::new(source_dir) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                error!("cannot walk '{}': {}", source_dir.display(), e);
                continue;
            }
        };
        let relative = match entry.path().strip_prefix(source_dir) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        let target = target_dir.join(relative);

        let result = if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
        } else {
            fs::copy(entry.path(), &target).map(|_| ())
        };
        if let Err(e) = result {
            error!("cannot copy asset '{}': {}", entry.path().display(), e);
        }
    }
}
