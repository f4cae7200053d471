//! The merged attribute table.
//!
//! A pure function of the two sources at a point in time: the directory source
//! forms the base, the os-release source is overlaid on top (flat file wins on
//! collision), and two defaults are filled in when absent. Nothing here is
//! persisted; every invocation that needs the table rebuilds it.

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::Paths;
use crate::{Result, source};

/// Attribute name to string value, sorted by key.
pub type AttrTable = BTreeMap<String, String>;

/// Keys guaranteed present after a merge, with their fill-in defaults.
pub const DEFAULT_ATTRS: [(&str, &str); 2] = [("custom", "none"), ("dev", "false")];

/// Build the authoritative attribute table from both sources.
pub fn build(paths: &Paths) -> Result<AttrTable> {
    build_from(&paths.data_dir, &paths.os_release)
}

fn build_from(data_dir: &Path, os_release: &Path) -> Result<AttrTable> {
    let mut table = source::read_data_dir(data_dir)?;
    table.extend(source::read_os_release(os_release)?);

    for (key, value) in DEFAULT_ATTRS {
        table
            .entry(key.to_string())
            .or_insert_with(|| value.to_string());
    }

    Ok(table)
}
