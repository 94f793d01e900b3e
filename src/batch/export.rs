//! Filtered CSV export.

use crate::error::Result;
use crate::format::csv::{encode, write_csv};
use crate::model::IssueFilter;
use crate::storage::IssueStore;
use std::io::Write;

/// Export matching issues as CSV bytes.
///
/// # Errors
///
/// Returns an error if the query or the CSV writer fails.
pub fn export_csv<S>(store: &S, filter: &IssueFilter) -> Result<Vec<u8>>
where
    S: IssueStore + ?Sized,
{
    let issues = store.query(filter)?;
    tracing::info!(count = issues.len(), "Exporting issues");
    encode(&issues)
}

/// Export matching issues to `writer`, returning how many were written.
///
/// # Errors
///
/// Returns an error if the query or the write fails.
pub fn export_csv_to<S, W>(store: &S, filter: &IssueFilter, writer: W) -> Result<usize>
where
    S: IssueStore + ?Sized,
    W: Write,
{
    let issues = store.query(filter)?;
    write_csv(writer, &issues)?;
    tracing::info!(count = issues.len(), "Exported issues");
    Ok(issues.len())
}
