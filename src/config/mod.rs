//! Source and cache locations for oinfo.
//!
//! The tool reads two fixed system locations and writes one cache file. All
//! three can be redirected through environment variables, which is how the
//! integration tests isolate themselves from the host system:
//!
//! - `OINFO_OS_RELEASE` - flat key/value file (default `/etc/os-release`)
//! - `OINFO_DATA_DIR` - directory of shell-export files (default `/etc/ordissimo`)
//! - `OINFO_CACHE_DIR` - cache directory, bypassing the writability cascade
//!
//! Resolution happens once per invocation into a [`Paths`] value that is passed
//! explicitly into every component; nothing reads the environment after that.

use std::env;
use std::path::{Path, PathBuf};

/// Default flat-file attribute source.
pub const OS_RELEASE_PATH: &str = "/etc/os-release";
/// Default directory of shell-export attribute files.
pub const DATA_DIR_PATH: &str = "/etc/ordissimo";
/// Required variable prefix inside data-dir export lines.
pub const DATA_PREFIX: &str = "ORDISSIMO_";
/// Namespace prefix applied to every os-release key.
pub const OS_RELEASE_KEY_PREFIX: &str = "os_";
/// Preferred system cache directory.
pub const CACHE_DIR: &str = "/var/cache/oinfo";
/// Cache file name, appended to whichever cache directory wins.
pub const CACHE_FILE: &str = "oinfo.cache";
/// Variable prefix used by the `--sh` / `--sh-export` output formats.
pub const OUTPUT_PREFIX: &str = "OINFO_";

const OS_RELEASE_ENV: &str = "OINFO_OS_RELEASE";
const DATA_DIR_ENV: &str = "OINFO_DATA_DIR";
const CACHE_DIR_ENV: &str = "OINFO_CACHE_DIR";

/// Resolved input/output locations for one invocation.
#[derive(Debug, Clone)]
pub struct Paths {
    /// The flat key/value file (os-release shape).
    pub os_release: PathBuf,
    /// The directory of `export PREFIX_KEY=VALUE` files.
    pub data_dir: PathBuf,
    /// Explicit cache directory, skipping the writability cascade when set.
    pub cache_dir: Option<PathBuf>,
}

impl Paths {
    /// Resolve locations from the environment, falling back to the fixed
    /// system defaults.
    pub fn from_env() -> Self {
        Self {
            os_release: env::var_os(OS_RELEASE_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(OS_RELEASE_PATH)),
            data_dir: env::var_os(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DATA_DIR_PATH)),
            cache_dir: env::var_os(CACHE_DIR_ENV).map(PathBuf::from),
        }
    }

    /// Build locations explicitly. Used by unit tests for dependency
    /// injection; production code goes through [`Paths::from_env`].
    pub fn with_roots(os_release: &Path, data_dir: &Path, cache_dir: Option<&Path>) -> Self {
        Self {
            os_release: os_release.to_path_buf(),
            data_dir: data_dir.to_path_buf(),
            cache_dir: cache_dir.map(Path::to_path_buf),
        }
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            os_release: PathBuf::from(OS_RELEASE_PATH),
            data_dir: PathBuf::from(DATA_DIR_PATH),
            cache_dir: None,
        }
    }
}
