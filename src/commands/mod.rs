//! Command implementations for the oinfo CLI.
//!
//! The CLI layer parses and validates arguments; the functions here do the
//! work, streaming lines to a writer or handing data back for `main` to
//! print. Only [`run_tests`] touches the result cache; value and key queries
//! rebuild the attribute table directly every time.

use tracing::debug;

use crate::cache::Cache;
use crate::config::{OUTPUT_PREFIX, Paths};
use crate::eval::{self, Combinator, Outcome, Predicate};
use crate::{Error, Result, attrs, freshness};

/// How value queries are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueFormat {
    /// Bare `VALUE` lines.
    #[default]
    Plain,
    /// `key=VALUE` lines.
    Keys,
    /// `OINFO_KEY="VALUE"` lines with inner quotes escaped.
    Sh,
    /// Same as `Sh` with a leading `export `.
    ShExport,
}

/// All attribute names, lexicographically sorted.
pub fn list_keys(paths: &Paths) -> Result<Vec<String>> {
    let table = attrs::build(paths)?;
    Ok(table.into_keys().collect())
}

fn quote_sh(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Write the requested keys as formatted lines, one per key as resolved.
///
/// The literal key `all` expands to every key in the table. A missing key is
/// a not-found error (exit 2); values for the keys preceding it have already
/// been written by then.
pub fn output_values(
    paths: &Paths,
    keys: &[String],
    format: ValueFormat,
    out: &mut impl std::io::Write,
) -> Result<()> {
    let table = attrs::build(paths)?;

    let keys: Vec<String> = if keys.iter().any(|k| k == "all") {
        table.keys().cloned().collect()
    } else {
        keys.to_vec()
    };

    for key in &keys {
        let value = table
            .get(key)
            .ok_or_else(|| Error::KeyNotFound(key.clone()))?;
        match format {
            ValueFormat::Plain => writeln!(out, "{}", value)?,
            ValueFormat::Keys => writeln!(out, "{}={}", key, value)?,
            ValueFormat::Sh => writeln!(
                out,
                "{}{}={}",
                OUTPUT_PREFIX,
                key.to_uppercase(),
                quote_sh(value)
            )?,
            ValueFormat::ShExport => writeln!(
                out,
                "export {}{}={}",
                OUTPUT_PREFIX,
                key.to_uppercase(),
                quote_sh(value)
            )?,
        }
    }
    Ok(())
}

/// Evaluate a predicate set, consulting and updating the result cache.
///
/// `tests` must already be lowercased and deduplicated in first-occurrence
/// order; the flag bits index the cache exactly as given on the command line.
/// Pass and fail outcomes are written back; not-found is returned uncached.
pub fn run_tests(
    paths: &Paths,
    tests: &[String],
    and_flag: bool,
    or_flag: bool,
) -> Result<Outcome> {
    let stamp = freshness::max_source_mtime(paths);
    let mut cache = Cache::open(paths, stamp);
    let key = eval::canonical_key(and_flag, or_flag, tests);

    if let Some(outcome) = cache.lookup(&key) {
        debug!("Cache hit");
        return Ok(outcome);
    }

    let table = attrs::build(paths)?;
    let predicates: Vec<Predicate> = tests
        .iter()
        .map(|t| Predicate::parse(t))
        .collect::<Result<_>>()?;
    let combinator = if and_flag {
        Combinator::And
    } else {
        Combinator::Or
    };

    let outcome = eval::evaluate(&table, &predicates, combinator);
    cache.store(key, outcome);
    Ok(outcome)
}
