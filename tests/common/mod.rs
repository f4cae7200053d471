//! Common test utilities for oinfo integration tests.
//!
//! Provides `TestEnv` for isolated test environments that never touch the
//! real `/etc/os-release`, `/etc/ordissimo`, or `/var/cache/oinfo`.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A test environment with isolated sources and cache.
///
/// Each `TestEnv` creates three temporary directories covering the data
/// directory, the os-release file, and the cache directory. The `oinfo()`
/// method returns a `Command` that redirects all three per-invocation via
/// environment variables, making tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
    pub release_dir: TempDir,
    pub cache_dir: TempDir,
}

impl TestEnv {
    /// Create an empty test environment. No sources exist yet, so queries
    /// against it are fatal until something is written.
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
            release_dir: TempDir::new().unwrap(),
            cache_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a test environment seeded with a typical pair of sources:
    /// one export file (`device_type=tablet`) and a two-line os-release.
    pub fn seeded() -> Self {
        let env = Self::new();
        env.write_data_file("10-device", "export ORDISSIMO_DEVICE_TYPE=tablet\n");
        env.write_os_release("ID=debian\nNAME=\"Debian GNU/Linux\"\n");
        env
    }

    /// Get a Command for the oinfo binary with isolated paths.
    pub fn oinfo(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_oinfo"));
        cmd.env("OINFO_OS_RELEASE", self.os_release_path());
        cmd.env("OINFO_DATA_DIR", self.data_dir.path());
        cmd.env("OINFO_CACHE_DIR", self.cache_dir.path());
        cmd
    }

    /// Write a file into the data directory.
    pub fn write_data_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.data_dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    /// Write the os-release file.
    pub fn write_os_release(&self, contents: &str) -> PathBuf {
        let path = self.os_release_path();
        fs::write(&path, contents).unwrap();
        path
    }

    /// Path of the os-release file (may not exist yet).
    pub fn os_release_path(&self) -> PathBuf {
        self.release_dir.path().join("os-release")
    }

    /// Path of the cache file (may not exist yet).
    pub fn cache_path(&self) -> PathBuf {
        self.cache_dir.path().join("oinfo.cache")
    }

    /// Read the cache file contents.
    pub fn cache_contents(&self) -> String {
        fs::read_to_string(self.cache_path()).unwrap()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
