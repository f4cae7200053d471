//! Freshness timestamp for cache invalidation.
//!
//! The cache is considered stale whenever any source input changed after the
//! cache file was last written. "Changed" means mtime only, not content, so a
//! touch without an edit invalidates too; the cost is one recomputation.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::Paths;

/// Modification time of a path, or the epoch if it cannot be read.
fn mtime(path: &Path) -> SystemTime {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(UNIX_EPOCH)
}

/// The latest modification time across every source input: the data directory
/// itself, the os-release file, and every non-hidden file inside the data
/// directory. Missing paths contribute the epoch, never an error.
pub fn max_source_mtime(paths: &Paths) -> SystemTime {
    let mut max = mtime(&paths.data_dir).max(mtime(&paths.os_release));

    if let Ok(entries) = std::fs::read_dir(&paths.data_dir) {
        for entry in entries.filter_map(|e| e.ok()) {
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            max = max.max(mtime(&entry.path()));
        }
    }

    max
}
