//! Raw attribute sources.
//!
//! Two fixed shapes feed the attribute table:
//!
//! - a directory of shell-export files, one `export ORDISSIMO_KEY=VALUE` per
//!   line, merged across files in lexicographic file order;
//! - an os-release style flat file, one `KEY=VALUE` per line with optional
//!   double-quoted values.
//!
//! Both readers are best-effort: a malformed line marks the source invalid
//! (one warning after the scan) but never aborts it. Only the total absence of
//! a source, or of any usable data in the directory source, is fatal.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::warn;

use crate::config::{DATA_PREFIX, OS_RELEASE_KEY_PREFIX};
use crate::{Error, Result};

/// Read a file line by line, feeding each non-empty line to `processor`.
///
/// Returns `false` if the file could not be opened; IO errors on individual
/// lines end the scan early but still count the file as processed.
fn parse_file(path: &Path, mut processor: impl FnMut(&str)) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };
    for line in BufReader::new(file).lines() {
        let Ok(line) = line else { break };
        if line.is_empty() {
            continue;
        }
        processor(&line);
    }
    true
}

/// Parse every non-hidden file in the data directory.
///
/// Extracted keys are lowercased with the `ORDISSIMO_` prefix removed; values
/// are taken verbatim, quotes included. Fatal if the directory is missing or
/// no valid entry was found in any file.
pub fn read_data_dir(dir: &Path) -> Result<BTreeMap<String, String>> {
    let mut table = BTreeMap::new();
    let mut invalid = false;
    let mut found = false;

    let entries = std::fs::read_dir(dir)
        .map_err(|_| Error::MissingSource(format!("Directory {}", dir.display())))?;

    let mut files: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.'))
        .collect();
    files.sort();

    for file in &files {
        let path = dir.join(file);
        let processed = parse_file(&path, |line| {
            let mut tokens = line.split_whitespace();
            let Some(first) = tokens.next() else { return };
            if first != "export" {
                invalid = true;
                return;
            }
            let Some(var) = tokens.next() else { return };
            let Some(stripped) = var.strip_prefix(DATA_PREFIX) else {
                invalid = true;
                return;
            };
            let Some(eq) = stripped.find('=') else { return };
            let key = stripped[..eq].to_lowercase();
            let value = stripped[eq + 1..].to_string();
            table.insert(key, value);
            found = true;
        });

        if !processed {
            warn!("Couldn't open {}", path.display());
        }
    }

    if !found {
        return Err(Error::NoData(dir.display().to_string()));
    }
    if invalid {
        warn!("Invalid data found in {}/", dir.display());
    }

    Ok(table)
}

/// Parse the os-release style flat file.
///
/// Every key is lowercased and namespaced with `os_`; values lose their
/// surrounding double quotes iff both the first and last character are `"`.
/// Fatal if the file is missing.
pub fn read_os_release(path: &Path) -> Result<BTreeMap<String, String>> {
    let mut table = BTreeMap::new();
    let mut invalid = false;

    let processed = parse_file(path, |line| {
        let Some(eq) = line.find('=') else {
            invalid = true;
            return;
        };
        let key = &line[..eq];
        let mut value = &line[eq + 1..];
        if value.starts_with('"') && value.ends_with('"') {
            // A lone `"` counts as both ends and strips to empty.
            value = value.get(1..value.len() - 1).unwrap_or("");
        }
        table.insert(
            format!("{}{}", OS_RELEASE_KEY_PREFIX, key.to_lowercase()),
            value.to_string(),
        );
    });

    if !processed {
        return Err(Error::MissingSource(format!("File {}", path.display())));
    }
    if invalid {
        warn!("Invalid data found in {}", path.display());
    }

    Ok(table)
}
