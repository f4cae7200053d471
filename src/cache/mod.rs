//! Persisted cache of predicate evaluation results.
//!
//! One file maps canonical query keys to outcome codes. Staleness is decided
//! wholesale at open time: if any source input is newer than the cache file,
//! the file is deleted and the cache starts empty. Every store rewrites the
//! whole file; concurrent invocations race benignly (last writer wins, worst
//! case a recomputation).
//!
//! The file lives in the first usable location out of the preferred system
//! cache directory (if writable), the user runtime directory, and the current
//! directory. It is written world-writable so any user context can refresh it.

pub mod codec;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::config::{CACHE_DIR, CACHE_FILE, Paths};
use crate::eval::Outcome;

#[cfg(unix)]
fn dir_writable(path: &Path) -> bool {
    nix::unistd::access(path, nix::unistd::AccessFlags::W_OK).is_ok()
}

#[cfg(not(unix))]
fn dir_writable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| !m.permissions().readonly())
        .unwrap_or(false)
}

/// Pick the cache file location for this invocation.
///
/// An explicit cache directory (from `OINFO_CACHE_DIR`) always wins. Otherwise
/// the preferred system directory is probed for writability, then the user
/// runtime directory, then the current directory. Checked once per invocation.
pub fn cache_file_path(paths: &Paths) -> PathBuf {
    let dir = match &paths.cache_dir {
        Some(dir) => dir.clone(),
        None if dir_writable(Path::new(CACHE_DIR)) => PathBuf::from(CACHE_DIR),
        None => dirs::runtime_dir().unwrap_or_else(|| PathBuf::from(".")),
    };
    dir.join(CACHE_FILE)
}

/// The cache for one invocation: resolved location plus loaded entries.
#[derive(Debug)]
pub struct Cache {
    path: PathBuf,
    entries: BTreeMap<String, i32>,
}

impl Cache {
    /// Open the cache, discarding it first if any source input is newer than
    /// the cache file. Never fails: an unreadable or missing file is an empty
    /// cache.
    pub fn open(paths: &Paths, freshness: SystemTime) -> Self {
        let path = cache_file_path(paths);

        let entries = match std::fs::metadata(&path) {
            Ok(meta) => {
                let cache_mtime = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                if cache_mtime < freshness {
                    debug!("Cache outdated");
                    let _ = std::fs::remove_file(&path);
                    BTreeMap::new()
                } else {
                    std::fs::read_to_string(&path)
                        .map(|text| codec::decode(&text))
                        .unwrap_or_default()
                }
            }
            Err(_) => BTreeMap::new(),
        };

        Self { path, entries }
    }

    /// Where this cache reads and writes its file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached outcome for a canonical query key, if present and decodable.
    pub fn lookup(&self, key: &str) -> Option<Outcome> {
        self.entries.get(key).and_then(|&code| Outcome::from_code(code))
    }

    /// Record a pass/fail outcome and rewrite the cache file.
    ///
    /// Not-found outcomes are never stored. A write failure costs only the
    /// memoization: it is logged and the computed result stands.
    pub fn store(&mut self, key: String, outcome: Outcome) {
        if outcome == Outcome::NotFound {
            return;
        }
        self.entries.insert(key, outcome.code());

        if let Err(err) = std::fs::write(&self.path, codec::encode(&self.entries)) {
            tracing::error!("Cannot write cache '{}': {}", self.path.display(), err);
            return;
        }
        // Any user context may refresh the cache.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o777));
        }
        debug!("Cache updated");
    }
}
