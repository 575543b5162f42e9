//! Search term lists

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read family names from a text file, one per line.
///
/// Lines are trimmed and blank lines are skipped; input order is preserved.
pub fn parse_family_names(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| Error::NamesFile {
        path: path.to_path_buf(),
        source,
    })?;

    let names = family_names_from_str(&contents);
    debug!(path = %path.display(), count = names.len(), "parsed family names");
    Ok(names)
}

/// Same as [`parse_family_names`] for text already in memory.
pub fn family_names_from_str(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
