//! CLI argument definitions and validation for oinfo.
//!
//! clap handles the flag surface; positional arguments are classified here
//! because they come in two mutually exclusive kinds: plain keys (`[a-z_]+`)
//! and predicate tests (`(is|isnot)-KEY-VALUE`). Mixing kinds, conflicting
//! flag pairs, and malformed arguments are all fatal (exit 1), which is why
//! validation lives behind our own error type instead of clap's.

use std::sync::LazyLock;

use clap::Parser;
use regex::Regex;

use crate::commands::ValueFormat;
use crate::{Error, Result};

static KEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z_]+$").unwrap());
static TEST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^(is|isnot)-[a-z_]+-(?:"[^"]+"|[^"]+)$"#).unwrap());

/// Oinfo - query and test system attributes.
#[derive(Parser, Debug)]
#[command(name = "oinfo")]
#[command(author, about = "Retrieve system information", long_about = None)]
#[command(version = concat!(
    env!("CARGO_PKG_VERSION"),
    " (", env!("OINFO_GIT_COMMIT"), " ", env!("OINFO_BUILD_TIMESTAMP"), ")"
))]
pub struct Cli {
    /// List all available keys
    #[arg(long)]
    pub list: bool,

    /// Output data as `KEY=VALUE`
    #[arg(long)]
    pub keys: bool,

    /// Output data as `OINFO_KEY="VALUE"`
    #[arg(long)]
    pub sh: bool,

    /// Output data as `export OINFO_KEY="VALUE"`
    #[arg(long = "sh-export")]
    pub sh_export: bool,

    /// Combine tests with AND
    #[arg(long)]
    pub and: bool,

    /// Combine tests with OR (the default)
    #[arg(long)]
    pub or: bool,

    /// Suppress the yes/no output of tests
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug output on stderr
    #[arg(short, long)]
    pub debug: bool,

    /// Keys to display, or `(is|isnot)-KEY-VALUE` tests to evaluate.
    /// Use `all` to show every key.
    pub args: Vec<String>,
}

/// What the positional arguments ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No positionals: print help.
    Help,
    /// Display values for these keys.
    Values(Vec<String>),
    /// Evaluate this predicate set.
    Tests(Vec<String>),
}

impl Cli {
    /// Check flag pairs that cannot be combined.
    pub fn validate(&self) -> Result<()> {
        if self.and && self.or {
            return Err(Error::ConflictingOptions("'--and' and '--or'".to_string()));
        }
        if self.keys && (self.sh || self.sh_export) {
            return Err(Error::ConflictingOptions(
                "'--keys' and '--sh'/'--sh-export'".to_string(),
            ));
        }
        Ok(())
    }

    /// The output format selected by the flags.
    pub fn value_format(&self) -> ValueFormat {
        if self.sh_export {
            ValueFormat::ShExport
        } else if self.sh {
            ValueFormat::Sh
        } else if self.keys {
            ValueFormat::Keys
        } else {
            ValueFormat::Plain
        }
    }

    /// Classify the positional arguments into keys or tests.
    ///
    /// Arguments are lowercased, validated against the key/test grammars, and
    /// deduplicated preserving first occurrence. Keys and tests cannot mix.
    pub fn action(&self) -> Result<Action> {
        let mut keys: Vec<String> = Vec::new();
        let mut tests: Vec<String> = Vec::new();

        for arg in &self.args {
            let lower = arg.to_lowercase();

            if lower.starts_with("is-") || lower.starts_with("isnot-") {
                if !keys.is_empty() {
                    return Err(Error::MixedActions);
                }
                if !TEST_RE.is_match(&lower) {
                    return Err(Error::InvalidPredicate(arg.clone()));
                }
                if !tests.contains(&lower) {
                    tests.push(lower);
                }
            } else {
                if !tests.is_empty() {
                    return Err(Error::MixedActions);
                }
                if !KEY_RE.is_match(&lower) {
                    return Err(Error::InvalidKey(arg.clone()));
                }
                if !keys.contains(&lower) {
                    keys.push(lower);
                }
            }
        }

        if !tests.is_empty() {
            Ok(Action::Tests(tests))
        } else if !keys.is_empty() {
            Ok(Action::Values(keys))
        } else {
            Ok(Action::Help)
        }
    }
}
