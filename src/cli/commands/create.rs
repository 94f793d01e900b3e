//! Create command implementation.

use super::{OutputOptions, open_workspace, print_json};
use crate::cli::CreateArgs;
use crate::config::CliOverrides;
use crate::error::Result;
use crate::model::Row;
use crate::storage::IssueStore;
use crate::validation::validate_row;

/// Execute the create command.
///
/// Flags go through the same validator as an imported CSV row.
///
/// # Errors
///
/// Returns a validation error for bad input, or a storage error.
pub fn execute(args: &CreateArgs, cli: &CliOverrides, output: OutputOptions) -> Result<()> {
    let input = validate_row(&row_from_args(args))?;
    let (mut storage, config) = open_workspace(cli)?;
    let output = output.with_config(&config);

    let issue = storage.create(&input)?;

    if output.json {
        print_json(&issue)?;
    } else if !output.quiet {
        println!("Created #{}: {}", issue.id, issue.title);
    }
    Ok(())
}

fn row_from_args(args: &CreateArgs) -> Row {
    let mut row = Row::new();
    row.insert("title".to_string(), args.title.clone());
    let optional = [
        ("description", &args.description),
        ("status", &args.status),
        ("priority", &args.priority),
        ("assignee", &args.assignee),
        ("reporter", &args.reporter),
    ];
    for (name, value) in optional {
        if let Some(value) = value {
            row.insert(name.to_string(), value.clone());
        }
    }
    row
}
