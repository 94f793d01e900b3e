//! Shared utilities for `issue_tracker`.
//!
//! - Issue id parsing
//! - Reading id lists from files (`bulk-delete --from-file`)
//! - Progress indicators (for long-running imports)

pub mod progress;

use crate::error::{Result, TrackerError};
use crate::model::IssueId;
use std::fs;
use std::path::Path;

/// Parse a user-supplied issue id.
///
/// Accepts an optional leading `#` (`#42`).
///
/// # Errors
///
/// Returns `TrackerError::InvalidId` unless the input is a positive integer.
pub fn parse_issue_id(input: &str) -> Result<IssueId> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    match digits.parse::<IssueId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(TrackerError::InvalidId {
            id: input.to_string(),
        }),
    }
}

/// Parse every id, failing on the first invalid one.
///
/// # Errors
///
/// Returns `TrackerError::InvalidId` for the first unparseable entry.
pub fn parse_issue_ids<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<IssueId>> {
    inputs.iter().map(|s| parse_issue_id(s.as_ref())).collect()
}

/// Read ids from a file, one per line.
///
/// Blank lines and lines starting with `#` are skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a line is not a valid id.
pub fn read_ids_from_file(path: &Path) -> Result<Vec<IssueId>> {
    let contents = fs::read_to_string(path)?;
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(parse_issue_id)
        .collect()
}
