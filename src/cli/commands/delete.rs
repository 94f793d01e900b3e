//! Delete command implementation.

use super::{OutputOptions, open_workspace, print_json};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::storage::IssueStore;
use crate::util::parse_issue_id;
use serde_json::json;

/// Execute the delete command.
///
/// # Errors
///
/// Returns `IssueNotFound` if the id does not exist.
pub fn execute(id: &str, cli: &CliOverrides, output: OutputOptions) -> Result<()> {
    let id = parse_issue_id(id)?;
    let (mut storage, config) = open_workspace(cli)?;
    let output = output.with_config(&config);

    storage.delete(id)?;

    if output.json {
        print_json(&json!({ "deleted": id }))?;
    } else if !output.quiet {
        println!("Deleted #{id}");
    }
    Ok(())
}
