//! Stats and summary command implementations.

use super::{OutputOptions, open_workspace, print_json};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::format::{format_stats, format_summary};
use crate::model::IssueSummary;
use crate::storage::IssueStore;
use tracing::info;

/// Execute the stats command.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or queried.
pub fn execute(cli: &CliOverrides, output: OutputOptions) -> Result<()> {
    let (storage, config) = open_workspace(cli)?;
    let output = output.with_config(&config);

    info!("Computing issue statistics");
    let stats = storage.stats()?;

    if output.json {
        print_json(&stats)
    } else {
        print!("{}", format_stats(&stats));
        Ok(())
    }
}

/// Execute the summary command.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or queried.
pub fn execute_summary(cli: &CliOverrides, output: OutputOptions) -> Result<()> {
    let (storage, config) = open_workspace(cli)?;
    let output = output.with_config(&config);

    let summary = IssueSummary::from(&storage.stats()?);

    if output.json {
        print_json(&summary)
    } else {
        print!("{}", format_summary(&summary));
        Ok(())
    }
}
