//! Plain-text rendering for terminal output.
//!
//! Colour is only applied when the caller asks for it.

use crate::model::{BulkResult, ImportSummary, Issue, IssueStats, IssueSummary, Priority, Status};
use colored::Colorize;
use std::fmt::Write as _;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Formatting options for text output.
#[derive(Debug, Clone, Copy)]
pub struct TextFormatOptions {
    pub use_color: bool,
    pub max_width: Option<usize>,
}

impl TextFormatOptions {
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            use_color: false,
            max_width: None,
        }
    }
}

/// Format status label with optional color.
#[must_use]
pub fn format_status_label(status: Status, use_color: bool) -> String {
    let label = status.as_str();
    if !use_color {
        return label.to_string();
    }

    match status {
        Status::Open => label.green().to_string(),
        Status::InProgress => label.yellow().to_string(),
        Status::Resolved => label.cyan().to_string(),
        Status::Closed => label.dimmed().to_string(),
    }
}

/// Format priority label with optional color.
#[must_use]
pub fn format_priority_label(priority: Priority, use_color: bool) -> String {
    let label = priority.as_str();
    if !use_color {
        return label.to_string();
    }

    match priority {
        Priority::Critical => label.red().bold().to_string(),
        Priority::High => label.red().to_string(),
        Priority::Medium => label.yellow().to_string(),
        Priority::Low => label.dimmed().to_string(),
    }
}

/// Format priority as a bracketed badge.
#[must_use]
pub fn format_priority_badge(priority: Priority, use_color: bool) -> String {
    format!("[{}]", format_priority_label(priority, use_color))
}

/// Determine terminal width from environment (falls back to 80).
#[must_use]
pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|columns| columns.trim().parse::<usize>().ok())
        .filter(|&value| value > 0)
        .unwrap_or(80)
}

/// Truncate a title to fit within `max_len` visible columns.
///
/// Handles wide characters (emojis, CJK) correctly using `unicode-width`.
#[must_use]
pub fn truncate_title(title: &str, max_len: usize) -> String {
    if UnicodeWidthStr::width(title) <= max_len {
        return title.to_string();
    }
    if max_len <= 3 {
        return take_columns(title, max_len);
    }

    let mut truncated = take_columns(title, max_len - 3);
    truncated.push_str("...");
    truncated
}

fn take_columns(text: &str, columns: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for c in text.chars() {
        let cw = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + cw > columns {
            break;
        }
        width += cw;
        out.push(c);
    }
    out
}

/// Format a single-line issue summary with options.
///
/// Format: `#{id} [{priority}] {status} {title} @{assignee}`
#[must_use]
pub fn format_issue_line_with(issue: &Issue, options: TextFormatOptions) -> String {
    let id = format!("#{}", issue.id);
    let priority_plain = format!("[{}]", issue.priority.as_str());
    let assignee = issue
        .assignee
        .as_deref()
        .map(|name| format!(" @{name}"))
        .unwrap_or_default();

    let prefix_len = UnicodeWidthStr::width(id.as_str())
        + 1
        + UnicodeWidthStr::width(priority_plain.as_str())
        + 1
        + issue.status.as_str().len()
        + 1;

    let title = options.max_width.map_or_else(
        || issue.title.clone(),
        |width| {
            truncate_title(
                &issue.title,
                width.saturating_sub(prefix_len + UnicodeWidthStr::width(assignee.as_str())),
            )
        },
    );

    format!(
        "{id} {} {} {title}{assignee}",
        format_priority_badge(issue.priority, options.use_color),
        format_status_label(issue.status, options.use_color),
    )
}

/// Format a single-line issue summary.
#[must_use]
pub fn format_issue_line(issue: &Issue) -> String {
    format_issue_line_with(issue, TextFormatOptions::plain())
}

/// Multi-line rendering used by `show`.
#[must_use]
pub fn format_issue_details(issue: &Issue, use_color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", issue.id, issue.title);
    let _ = writeln!(
        out,
        "Status: {}  Priority: {}",
        format_status_label(issue.status, use_color),
        format_priority_label(issue.priority, use_color)
    );
    let _ = writeln!(out, "Assignee: {}", issue.assignee.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Reporter: {}", issue.reporter.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Created: {}", issue.created_at.to_rfc3339());
    let _ = writeln!(out, "Updated: {}", issue.updated_at.to_rfc3339());
    if let Some(description) = &issue.description {
        let _ = writeln!(out, "\n{description}");
    }
    out
}

/// Render an import report: totals, then one line per failed row.
#[must_use]
pub fn format_import_summary(summary: &ImportSummary) -> String {
    let mut out = format!(
        "Imported {} of {} rows ({} failed)\n",
        summary.successful, summary.total_rows, summary.failed
    );
    for outcome in &summary.errors {
        let _ = writeln!(
            out,
            "  row {}: {}",
            outcome.row_number,
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }
    out
}

/// Render a bulk result. `verb` is the past tense shown to the user.
#[must_use]
pub fn format_bulk_result(verb: &str, result: &BulkResult) -> String {
    let mut out = format!(
        "{verb} {} of {} issues\n",
        result.succeeded.len(),
        result.requested_ids.len()
    );
    for (id, failure) in &result.failed {
        let _ = writeln!(out, "  #{id}: {}", failure.as_str());
    }
    out
}

/// Render `stats` as aligned sections.
#[must_use]
pub fn format_stats(stats: &IssueStats) -> String {
    let mut out = format!("Total issues: {}\n\nBy status:\n", stats.total_issues);
    for status in Status::ALL {
        let _ = writeln!(out, "  {:<12} {}", status.as_str(), stats.status_count(status));
    }
    out.push_str("\nBy priority:\n");
    for priority in Priority::ALL.iter().rev() {
        let _ = writeln!(
            out,
            "  {:<12} {}",
            priority.as_str(),
            stats.priority_count(*priority)
        );
    }
    out.push_str("\nBy assignee:\n");
    for (assignee, count) in &stats.by_assignee {
        let _ = writeln!(out, "  {assignee:<12} {count}");
    }
    let _ = writeln!(out, "  {:<12} {}", "(unassigned)", stats.unassigned);
    out
}

#[must_use]
pub fn format_summary(summary: &IssueSummary) -> String {
    let rows = [
        ("Total", summary.total_issues),
        ("Open", summary.open_issues),
        ("In progress", summary.in_progress_issues),
        ("Resolved", summary.resolved_issues),
        ("Closed", summary.closed_issues),
        ("Critical", summary.critical_priority),
        ("High", summary.high_priority),
        ("Medium", summary.medium_priority),
        ("Low", summary.low_priority),
    ];
    let mut out = String::new();
    for (label, count) in rows {
        let _ = writeln!(out, "{label:<12} {count}");
    }
    out
}
