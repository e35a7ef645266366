//! Newline-delimited target files.

use std::path::Path;

use anyhow::{Context, Result};

/// Read targets from a file, one per line; blank lines are skipped.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
