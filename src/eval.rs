//! Predicate evaluation over the attribute table.
//!
//! A predicate is `(is|isnot)-KEY-VALUE`: an equality test of one attribute
//! against an expected value, case-insensitive on both sides, negated for
//! `isnot`. Multiple predicates combine under one combinator into a ternary
//! outcome: pass, fail, or not-found when a tested key is absent.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::attrs::AttrTable;
use crate::{EXIT_FAIL, EXIT_NOTFOUND, Error, Result};

/// Key is the first `-`-delimited segment after the polarity; the value is
/// everything after it and may itself contain hyphens.
static PREDICATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(is|isnot)-([^-]+)-(.+)$").unwrap());

/// Result of evaluating a predicate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The predicate set evaluated true.
    Pass,
    /// The predicate set evaluated false. A normal, cacheable outcome.
    Fail,
    /// A tested key is absent from the table. Never cached.
    NotFound,
}

impl Outcome {
    /// The process exit code and persisted cache code for this outcome.
    pub fn code(self) -> i32 {
        match self {
            Outcome::Pass => 0,
            Outcome::Fail => EXIT_FAIL,
            Outcome::NotFound => EXIT_NOTFOUND,
        }
    }

    /// Decode a persisted cache code. Only pass/fail are ever stored.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Outcome::Pass),
            c if c == EXIT_FAIL => Some(Outcome::Fail),
            _ => None,
        }
    }

    /// The `yes`/`no` projection printed for pass/fail results.
    pub fn as_yes_no(self) -> &'static str {
        if self == Outcome::Pass { "yes" } else { "no" }
    }
}

/// Whether the equality result is taken as-is or negated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Is,
    IsNot,
}

/// How multiple predicates combine into one outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combinator {
    And,
    #[default]
    Or,
}

/// One parsed `(is|isnot)-KEY-VALUE` test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub polarity: Polarity,
    pub key: String,
    pub value: String,
}

impl Predicate {
    /// Parse a raw predicate string. Malformed input is fatal.
    pub fn parse(raw: &str) -> Result<Self> {
        let caps = PREDICATE_RE
            .captures(raw)
            .ok_or_else(|| Error::InvalidPredicate(raw.to_string()))?;
        let polarity = match &caps[1] {
            "is" => Polarity::Is,
            _ => Polarity::IsNot,
        };
        Ok(Self {
            polarity,
            key: caps[2].to_string(),
            value: caps[3].to_lowercase(),
        })
    }

    /// Whether this predicate holds against the table, or `None` when the key
    /// is absent.
    fn matches(&self, table: &AttrTable) -> Option<bool> {
        let actual = table.get(&self.key)?;
        let mut matches = actual.to_lowercase() == self.value;
        if self.polarity == Polarity::IsNot {
            matches = !matches;
        }
        Some(matches)
    }
}

/// Evaluate predicates in list order against the table.
///
/// The running state starts at fail. Under AND the first non-matching
/// predicate settles the outcome and stops the loop; under OR any match flips
/// the state to pass and the loop continues. An absent key returns not-found
/// immediately, regardless of combinator. An empty predicate list fails.
pub fn evaluate(table: &AttrTable, predicates: &[Predicate], combinator: Combinator) -> Outcome {
    let mut fail = true;

    for pred in predicates {
        debug!(
            "Test: cond={} key={} val={}",
            match pred.polarity {
                Polarity::Is => "is",
                Polarity::IsNot => "isnot",
            },
            pred.key,
            pred.value
        );

        let Some(matches) = pred.matches(table) else {
            tracing::error!("Key '{}' not found", pred.key);
            return Outcome::NotFound;
        };

        if combinator == Combinator::And && !matches {
            return Outcome::Fail;
        }
        if matches {
            fail = false;
        }
    }

    if fail { Outcome::Fail } else { Outcome::Pass }
}

/// The exact string indexing the result cache.
///
/// Two flag bits (as given on the command line, not the resolved combinator)
/// followed by the space-joined predicate strings. Exact-match only: queries
/// differing in predicate order or flag spelling get distinct entries.
pub fn canonical_key(and_flag: bool, or_flag: bool, tests: &[String]) -> String {
    let mut key = String::new();
    key.push(if and_flag { '1' } else { '0' });
    key.push(if or_flag { '1' } else { '0' });
    key.push_str(&tests.join(" "));
    key
}
