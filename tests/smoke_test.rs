//! Smoke tests for the oinfo CLI.
//!
//! These tests verify basic CLI behavior:
//! - `oinfo --version` outputs version info
//! - `oinfo --help` outputs help text
//! - `oinfo` (no args) prints help and exits 0
//! - argument errors exit 1, never 2 (reserved for key-not-found)

mod common;

use assert_cmd::Command;
use common::TestEnv;
use predicates::prelude::*;

/// Get a Command for the oinfo binary without any path isolation.
fn oinfo() -> Command {
    Command::new(env!("CARGO_BIN_EXE_oinfo"))
}

#[test]
fn test_version_flag() {
    oinfo()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("oinfo"));
}

#[test]
fn test_help_flag() {
    oinfo()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--list"))
        .stdout(predicate::str::contains("--sh-export"));
}

#[test]
fn test_help_flag_short() {
    oinfo()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_no_args_prints_help() {
    // Help, not an error: exit 0. Paths are isolated so a host without
    // /etc/ordissimo behaves the same as one with it.
    let env = TestEnv::seeded();
    env.oinfo()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_unknown_flag_exits_one() {
    oinfo()
        .arg("--no-such-flag")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error"));
}
