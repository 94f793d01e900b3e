//! Show command implementation.

use super::{OutputOptions, open_workspace, print_json};
use crate::config::CliOverrides;
use crate::error::{Result, TrackerError};
use crate::format::format_issue_details;
use crate::storage::IssueStore;
use crate::util::parse_issue_id;

/// Execute the show command.
///
/// # Errors
///
/// Returns `InvalidId`/`IssueNotFound` or a storage error.
pub fn execute(id: &str, cli: &CliOverrides, output: OutputOptions) -> Result<()> {
    let id = parse_issue_id(id)?;
    let (storage, config) = open_workspace(cli)?;
    let output = output.with_config(&config);

    let issue = storage.get(id)?.ok_or(TrackerError::IssueNotFound { id })?;

    if output.json {
        print_json(&issue)?;
    } else {
        print!("{}", format_issue_details(&issue, output.use_color));
    }
    Ok(())
}
