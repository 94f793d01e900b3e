//! Bulk update command implementation.

use super::{OutputOptions, open_workspace, print_json};
use crate::batch::bulk_update;
use crate::cli::BulkUpdateArgs;
use crate::config::CliOverrides;
use crate::error::Result;
use crate::format::format_bulk_result;
use crate::util::parse_issue_ids;

/// Execute the bulk-update command.
///
/// # Errors
///
/// Returns `InvalidId` for an unparseable id or `InvalidPatch` if the
/// change set is empty or invalid. Per-issue failures are reported, not
/// returned.
pub fn execute(args: &BulkUpdateArgs, cli: &CliOverrides, output: OutputOptions) -> Result<()> {
    let ids = parse_issue_ids(&args.ids)?;
    let request = args.patch.to_request();
    let (mut storage, config) = open_workspace(cli)?;
    let output = output.with_config(&config);

    let result = bulk_update(&mut storage, &ids, &request)?;

    if output.json {
        print_json(&result)?;
    } else if !output.quiet || !result.all_succeeded() {
        print!("{}", format_bulk_result("Updated", &result));
    }
    Ok(())
}
