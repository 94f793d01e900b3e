//! List command implementation.

use super::{OutputOptions, filter_from_args, open_workspace, print_json};
use crate::cli::ListArgs;
use crate::config::{CliOverrides, MAX_LIST_LIMIT};
use crate::error::Result;
use crate::format::{TextFormatOptions, format_issue_line_with, terminal_width};
use crate::storage::IssueStore;
use tracing::debug;

/// Execute the list command.
///
/// # Errors
///
/// Returns an error for unknown filter values or if the query fails.
pub fn execute(args: &ListArgs, cli: &CliOverrides, output: OutputOptions) -> Result<()> {
    let mut filter = filter_from_args(&args.filter)?;
    let (storage, config) = open_workspace(cli)?;
    let output = output.with_config(&config);

    filter.offset = args.offset;
    filter.limit = Some(effective_limit(args.limit, config.default_limit));
    debug!(?filter, "Listing issues");

    let issues = storage.query(&filter)?;

    if output.json {
        return print_json(&issues);
    }
    if issues.is_empty() {
        if !output.quiet {
            println!("No issues found.");
        }
        return Ok(());
    }

    let options = TextFormatOptions {
        use_color: output.use_color,
        max_width: output.use_color.then(terminal_width),
    };
    for issue in &issues {
        println!("{}", format_issue_line_with(issue, options));
    }
    Ok(())
}

fn effective_limit(requested: Option<usize>, default_limit: usize) -> usize {
    requested.unwrap_or(default_limit).clamp(1, MAX_LIST_LIMIT)
}
