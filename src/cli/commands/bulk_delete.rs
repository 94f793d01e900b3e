//! Bulk delete command implementation.

use super::{OutputOptions, open_workspace, print_json};
use crate::batch::bulk_delete;
use crate::cli::BulkDeleteArgs;
use crate::config::CliOverrides;
use crate::error::Result;
use crate::format::format_bulk_result;
use crate::model::IssueId;
use crate::util::{parse_issue_ids, read_ids_from_file};

/// Execute the bulk-delete command.
///
/// # Errors
///
/// Returns `InvalidId` for an unparseable id, or an I/O error if
/// `--from-file` cannot be read.
pub fn execute(args: &BulkDeleteArgs, cli: &CliOverrides, output: OutputOptions) -> Result<()> {
    let ids = collect_ids(args)?;
    let (mut storage, config) = open_workspace(cli)?;
    let output = output.with_config(&config);

    let result = bulk_delete(&mut storage, &ids);

    if output.json {
        print_json(&result)?;
    } else if !output.quiet || !result.all_succeeded() {
        print!("{}", format_bulk_result("Deleted", &result));
    }
    Ok(())
}

fn collect_ids(args: &BulkDeleteArgs) -> Result<Vec<IssueId>> {
    let mut ids = parse_issue_ids(&args.ids)?;
    if let Some(path) = &args.from_file {
        ids.extend(read_ids_from_file(path)?);
    }
    Ok(ids)
}
