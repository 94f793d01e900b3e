//! CSV codec for `issue_tracker`.
//!
//! `decode` turns a byte stream into ordered rows of named fields; `encode`
//! writes issues with a fixed column order. Quoting follows RFC 4180: a
//! field containing a comma, quote or newline is wrapped in quotes with
//! inner quotes doubled.

use crate::error::{Result, TrackerError, ValidationError};
use crate::model::{Issue, Row};
use std::io::Write;

/// Export columns, in output order.
pub const EXPORT_COLUMNS: &[&str] = &[
    "title",
    "description",
    "status",
    "priority",
    "assignee",
    "reporter",
    "created_at",
];

/// Columns read on import. Anything else in the header is ignored.
pub const IMPORT_COLUMNS: &[&str] = &[
    "title",
    "description",
    "status",
    "priority",
    "assignee",
    "reporter",
];

/// One decoded data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRow {
    /// 1-based, header excluded, blank lines not counted.
    pub row_number: usize,
    /// The named fields, or `MalformedRow` when the field count differs from
    /// the header's.
    pub fields: std::result::Result<Row, ValidationError>,
}

/// Decode a CSV byte stream.
///
/// A leading byte-order mark is stripped, header names are trimmed and
/// lowercased, and blank lines are skipped. Field values are returned as-is.
///
/// # Errors
///
/// Returns `TrackerError::MalformedCsv` if the input is not UTF-8 or has no
/// header row. Row-level problems never fail the decode.
pub fn decode(bytes: &[u8]) -> Result<Vec<DecodedRow>> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| TrackerError::malformed_csv(format!("input is not valid UTF-8: {e}")))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| TrackerError::malformed_csv(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(TrackerError::malformed_csv("missing header row"));
    }

    let mut rows = Vec::new();
    let mut record = csv::StringRecord::new();
    while reader
        .read_record(&mut record)
        .map_err(|e| TrackerError::malformed_csv(e.to_string()))?
    {
        let start = record.position().map_or(0, |p| p.byte());
        let raw = byte_span(text, start, reader.position().byte());
        if headers.len() > 1 && is_blank(raw) {
            continue;
        }

        let row_number = rows.len() + 1;
        let fields = if record.len() == headers.len() {
            let mut row = Row::new();
            for (name, value) in headers.iter().zip(record.iter()) {
                // First occurrence of a duplicated header wins.
                row.entry(name.clone()).or_insert_with(|| value.to_string());
            }
            Ok(row)
        } else {
            Err(ValidationError::MalformedRow {
                expected: headers.len(),
                found: record.len(),
            })
        };

        rows.push(DecodedRow { row_number, fields });
    }

    tracing::debug!(rows = rows.len(), columns = headers.len(), "Decoded CSV");
    Ok(rows)
}

fn byte_span(text: &str, start: u64, end: u64) -> &str {
    let start = usize::try_from(start).unwrap_or(usize::MAX);
    let end = usize::try_from(end).unwrap_or(usize::MAX);
    text.get(start..end).unwrap_or_default()
}

/// Only whitespace between the line breaks. A quoted empty field is data.
fn is_blank(raw: &str) -> bool {
    !raw.is_empty() && raw.trim().is_empty()
}

/// Get a field value from an issue by export column name.
#[must_use]
pub fn field_value(issue: &Issue, column: &str) -> String {
    match column {
        "title" => issue.title.clone(),
        "description" => issue.description.clone().unwrap_or_default(),
        "status" => issue.status.as_str().to_string(),
        "priority" => issue.priority.as_str().to_string(),
        "assignee" => issue.assignee.clone().unwrap_or_default(),
        "reporter" => issue.reporter.clone().unwrap_or_default(),
        "created_at" => issue.created_at.to_rfc3339(),
        _ => String::new(),
    }
}

/// Write issues as CSV to the given writer, header first.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_csv<W: Write>(writer: W, issues: &[Issue]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(EXPORT_COLUMNS)?;
    for issue in issues {
        csv_writer.write_record(EXPORT_COLUMNS.iter().map(|c| field_value(issue, c)))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Encode issues to CSV bytes. Zero issues yield exactly the header row.
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
pub fn encode(issues: &[Issue]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    write_csv(&mut output, issues)?;
    Ok(output)
}
