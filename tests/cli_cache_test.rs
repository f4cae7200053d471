//! Integration tests for the persisted result cache: creation, hits,
//! staleness invalidation, and the not-found exclusion.

mod common;

use std::fs::{self, File};
use std::time::{Duration, SystemTime};

use common::TestEnv;
use predicates::prelude::*;

fn set_mtime(path: &std::path::Path, when: SystemTime) {
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(when)
        .unwrap();
}

#[test]
fn pass_and_fail_are_persisted_with_flag_bits() {
    let env = TestEnv::seeded();
    env.oinfo().arg("is-device_type-tablet").assert().success();
    env.oinfo()
        .args(["--and", "is-device_type-phone"])
        .assert()
        .code(3);

    let cache = env.cache_contents();
    assert!(cache.starts_with("declare -A cache=("));
    assert!(cache.contains("[00is-device_type-tablet]=\"0\""));
    assert!(cache.contains("[10is-device_type-phone]=\"3\""));
}

#[test]
fn second_identical_query_hits_the_cache() {
    let env = TestEnv::seeded();
    env.oinfo().arg("is-device_type-tablet").assert().success();
    env.oinfo()
        .args(["-d", "is-device_type-tablet"])
        .assert()
        .success()
        .stdout("yes\n")
        .stderr(predicate::str::contains("Cache hit"));
}

#[test]
fn fresh_cache_is_authoritative_over_sources() {
    // Plant a contradictory cache entry newer than every source: the query
    // must be answered from the cache without consulting the table.
    let env = TestEnv::seeded();
    fs::write(
        env.cache_path(),
        "declare -A cache=([00is-device_type-tablet]=\"3\" )",
    )
    .unwrap();
    set_mtime(&env.cache_path(), SystemTime::now() + Duration::from_secs(3600));

    env.oinfo()
        .arg("is-device_type-tablet")
        .assert()
        .code(3)
        .stdout("no\n");
}

#[test]
fn touching_a_source_invalidates_the_cache() {
    let env = TestEnv::seeded();
    fs::write(
        env.cache_path(),
        "declare -A cache=([00is-device_type-tablet]=\"3\" )",
    )
    .unwrap();
    // Source newer than the cache file: the stale entry must be discarded
    // and the recomputed answer cached in its place.
    let source = env.data_dir.path().join("10-device");
    set_mtime(&source, SystemTime::now() + Duration::from_secs(3600));

    env.oinfo()
        .arg("is-device_type-tablet")
        .assert()
        .success()
        .stdout("yes\n");
    assert!(
        env.cache_contents()
            .contains("[00is-device_type-tablet]=\"0\"")
    );
}

#[test]
fn not_found_is_never_cached() {
    let env = TestEnv::seeded();
    env.oinfo().arg("is-nonexistentkey-x").assert().code(2);
    assert!(!env.cache_path().exists());

    // A later valid query creates the cache, but re-running the not-found
    // query still recomputes and leaves the file untouched.
    env.oinfo().arg("is-device_type-tablet").assert().success();
    let before = env.cache_contents();
    env.oinfo().arg("is-nonexistentkey-x").assert().code(2);
    assert_eq!(env.cache_contents(), before);
}

#[test]
fn explicit_or_and_default_get_distinct_entries() {
    let env = TestEnv::seeded();
    env.oinfo().arg("is-dev-false").assert().success();
    env.oinfo().args(["--or", "is-dev-false"]).assert().success();

    let cache = env.cache_contents();
    assert!(cache.contains("[00is-dev-false]=\"0\""));
    assert!(cache.contains("[01is-dev-false]=\"0\""));
}

#[test]
fn corrupt_cache_entries_are_skipped_not_fatal() {
    let env = TestEnv::seeded();
    fs::write(env.cache_path(), "declare -A cache=([half]=\"oops\" ").unwrap();
    set_mtime(&env.cache_path(), SystemTime::now() + Duration::from_secs(3600));

    env.oinfo()
        .arg("is-device_type-tablet")
        .assert()
        .success()
        .stdout("yes\n");
}

#[cfg(unix)]
#[test]
fn cache_file_is_world_writable() {
    use std::os::unix::fs::PermissionsExt;

    let env = TestEnv::seeded();
    env.oinfo().arg("is-dev-false").assert().success();
    let mode = fs::metadata(env.cache_path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o777);
}
