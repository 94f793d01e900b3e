//! Update command implementation.

use super::{OutputOptions, open_workspace, print_json};
use crate::cli::UpdateArgs;
use crate::config::CliOverrides;
use crate::error::Result;
use crate::storage::IssueStore;
use crate::util::parse_issue_id;
use crate::validation::validate_patch;

/// Execute the update command.
///
/// # Errors
///
/// Returns `InvalidPatch` if no field is given or a value is invalid, or
/// `IssueNotFound` if the id does not exist.
pub fn execute(args: &UpdateArgs, cli: &CliOverrides, output: OutputOptions) -> Result<()> {
    let id = parse_issue_id(&args.id)?;
    let patch = validate_patch(&args.patch.to_request())?;
    let (mut storage, config) = open_workspace(cli)?;
    let output = output.with_config(&config);

    let issue = storage.update(id, &patch)?;

    if output.json {
        print_json(&issue)?;
    } else if !output.quiet {
        println!("Updated #{}: {}", issue.id, issue.title);
    }
    Ok(())
}
