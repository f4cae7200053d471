//! Serializer for the persisted cache format.
//!
//! The file is a single bash-compatible associative array declaration so that
//! shell scripts can source it directly:
//!
//! ```text
//! declare -A cache=([KEY]="CODE" [KEY]="CODE" ... )
//! ```
//!
//! where `KEY` is a canonical query key (no `]` characters) and `CODE` is an
//! integer outcome code. The decoder is deliberately lenient: the `declare`
//! prefix and the surrounding parentheses are optional, and entries whose code
//! is not an integer are skipped rather than failing the load, so a
//! hand-edited or truncated file degrades to a smaller cache.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

const DECLARE_PREFIX: &str = "declare -A cache=";

static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[\s*([^\]]+)\s*\]\s*=\s*"([^"]*)""#).unwrap());

/// Render the full cache file contents.
pub fn encode(entries: &BTreeMap<String, i32>) -> String {
    let mut out = String::from(DECLARE_PREFIX);
    out.push('(');
    for (key, code) in entries {
        out.push('[');
        out.push_str(key);
        out.push_str("]=\"");
        out.push_str(&code.to_string());
        out.push_str("\" ");
    }
    out.push(')');
    out
}

/// Parse cache file contents, skipping anything malformed.
pub fn decode(text: &str) -> BTreeMap<String, i32> {
    let mut entries = BTreeMap::new();

    for line in text.lines() {
        if line.is_empty() {
            continue;
        }
        let line = line.strip_prefix(DECLARE_PREFIX).unwrap_or(line);
        let line = line
            .trim_start_matches('(')
            .trim_end_matches(')');

        for caps in ENTRY_RE.captures_iter(line) {
            if let Ok(code) = caps[2].parse::<i32>() {
                entries.insert(caps[1].trim().to_string(), code);
            }
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, i32)]) -> BTreeMap<String, i32> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn encodes_declare_shape() {
        let encoded = encode(&map(&[("00is-dev-true", 3)]));
        assert_eq!(encoded, "declare -A cache=([00is-dev-true]=\"3\" )");
    }

    #[test]
    fn decodes_own_output() {
        let entries = map(&[("00is-dev-true", 3), ("10is-custom-none is-dev-true", 0)]);
        assert_eq!(decode(&encode(&entries)), entries);
    }

    #[test]
    fn decodes_without_declare_prefix() {
        let entries = decode("([00is-dev-true]=\"0\" )");
        assert_eq!(entries, map(&[("00is-dev-true", 0)]));
    }

    #[test]
    fn skips_entries_with_non_integer_codes() {
        let entries = decode("declare -A cache=([good]=\"0\" [bad]=\"oops\" )");
        assert_eq!(entries, map(&[("good", 0)]));
    }

    #[test]
    fn garbage_input_decodes_to_empty() {
        assert!(decode("not a cache file at all\n").is_empty());
        assert!(decode("").is_empty());
    }

    #[test]
    fn empty_map_round_trips() {
        assert_eq!(encode(&BTreeMap::new()), "declare -A cache=()");
        assert!(decode("declare -A cache=()").is_empty());
    }
}
