//! CSV import pipeline.
//!
//! Decode, then for each row in input order: validate, create, record the
//! outcome. Only a whole-stream decode failure propagates.

use crate::batch::STORE_ERROR;
use crate::error::{Result, ValidationError};
use crate::format::csv::{DecodedRow, IMPORT_COLUMNS, decode};
use crate::model::{ImportRowOutcome, ImportSummary, Row};
use crate::storage::IssueStore;
use crate::validation::validate_row;
use tracing::{debug, info, warn};

/// Progress notification passed to the per-row callback.
#[derive(Debug, Clone, Copy)]
pub struct ImportProgress<'a> {
    pub outcome: &'a ImportRowOutcome,
    pub processed: usize,
    pub total: usize,
}

/// Import issues from CSV bytes.
///
/// # Errors
///
/// Returns `TrackerError::MalformedCsv` if the stream cannot be decoded at
/// all. Row validation and store failures are reported in the summary.
pub fn import_csv<S>(store: &mut S, bytes: &[u8]) -> Result<ImportSummary>
where
    S: IssueStore + ?Sized,
{
    import_csv_with_progress(store, bytes, |_| {})
}

/// [`import_csv`] with a callback invoked after every row.
///
/// # Errors
///
/// Returns `TrackerError::MalformedCsv` if the stream cannot be decoded at
/// all.
pub fn import_csv_with_progress<S, F>(
    store: &mut S,
    bytes: &[u8],
    mut on_row: F,
) -> Result<ImportSummary>
where
    S: IssueStore + ?Sized,
    F: FnMut(ImportProgress<'_>),
{
    let rows = decode(bytes)?;
    let total = rows.len();
    log_ignored_columns(&rows);

    let mut outcomes = Vec::with_capacity(total);
    for decoded in rows {
        let outcome = import_row(store, decoded);
        on_row(ImportProgress {
            outcome: &outcome,
            processed: outcomes.len() + 1,
            total,
        });
        outcomes.push(outcome);
    }

    let summary = ImportSummary::from_outcomes(outcomes);
    info!(
        total = summary.total_rows,
        successful = summary.successful,
        failed = summary.failed,
        "CSV import finished"
    );
    Ok(summary)
}

fn import_row<S>(store: &mut S, decoded: DecodedRow) -> ImportRowOutcome
where
    S: IssueStore + ?Sized,
{
    let row_number = decoded.row_number;
    let input = match decoded.fields.and_then(|row| validate_row(&row)) {
        Ok(input) => input,
        Err(err) => return rejected(row_number, &err),
    };

    match store.create(&input) {
        Ok(issue) => {
            debug!(row = row_number, id = issue.id, "Imported row");
            ImportRowOutcome::created(row_number, issue.id)
        }
        Err(err) => {
            warn!(row = row_number, error = %err, "Store rejected import row");
            ImportRowOutcome::failed(row_number, STORE_ERROR)
        }
    }
}

fn rejected(row_number: usize, err: &ValidationError) -> ImportRowOutcome {
    debug!(row = row_number, error = %err, "Row failed validation");
    ImportRowOutcome::failed(row_number, err.to_string())
}

fn log_ignored_columns(rows: &[DecodedRow]) {
    let Some(row) = rows.iter().find_map(|r| r.fields.as_ref().ok()) else {
        return;
    };
    let ignored: Vec<&str> = ignored_columns(row).collect();
    if !ignored.is_empty() {
        debug!(columns = ?ignored, "Ignoring unknown import columns");
    }
}

fn ignored_columns(row: &Row) -> impl Iterator<Item = &str> {
    row.keys()
        .map(String::as_str)
        .filter(|name| !IMPORT_COLUMNS.contains(name))
}
