//! Oinfo - a read-only system attribute resolver.
//!
//! This library provides the core functionality for the `oinfo` CLI tool:
//! aggregating key/value facts from the os-release file and the export-style
//! data directory into one attribute table, evaluating `is`/`isnot` predicates
//! over it, and memoizing predicate results in a persisted cache.

pub mod attrs;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod eval;
pub mod freshness;
pub mod source;

/// Exit code for a requested or tested key that is absent from the table.
pub const EXIT_NOTFOUND: i32 = 2;
/// Exit code for a predicate set that evaluated to false.
pub const EXIT_FAIL: i32 = 3;

/// Library-level error type for oinfo operations.
///
/// Every variant except [`Error::KeyNotFound`] is fatal: `main` prints it and
/// exits 1. `KeyNotFound` maps to exit code 2.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0} does not exist")]
    MissingSource(String),

    #[error("Couldn't read files in {0}/")]
    NoData(String),

    #[error("Key '{0}' not found")]
    KeyNotFound(String),

    #[error("Invalid key ({0})")]
    InvalidKey(String),

    #[error("Invalid argument ({0})")]
    InvalidPredicate(String),

    #[error("Mutually exclusive options {0}")]
    ConflictingOptions(String),

    #[error("Mutually exclusive actions: cannot mix '(is|isnot)-KEY-VALUE' and 'KEY'")]
    MixedActions,
}

/// Result type alias for oinfo operations.
pub type Result<T> = std::result::Result<T, Error>;
