//! Output formatting for `issue_tracker`.
//!
//! - [`csv`] - the CSV codec used by import and export
//! - text rendering for terminal output (issue lines, reports)
//!
//! JSON output is plain `serde_json` over the model types.

pub mod csv;
mod text;

pub use text::{
    TextFormatOptions, format_bulk_result, format_import_summary, format_issue_details,
    format_issue_line, format_issue_line_with, format_priority_badge, format_priority_label,
    format_stats, format_status_label, format_summary, terminal_width, truncate_title,
};
