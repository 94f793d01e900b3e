//! Export command implementation.

use super::{OutputOptions, filter_from_args, open_workspace};
use crate::batch::export_csv_to;
use crate::cli::ExportArgs;
use crate::config::CliOverrides;
use crate::error::Result;
use std::fs::File;
use std::io::{self, BufWriter};

/// Execute the export command.
///
/// Export is unpaginated: every matching issue is written.
///
/// # Errors
///
/// Returns an error for unknown filter values, or if the query or write fails.
pub fn execute(args: &ExportArgs, cli: &CliOverrides, output: OutputOptions) -> Result<()> {
    let filter = filter_from_args(&args.filter)?;
    let (storage, _config) = open_workspace(cli)?;

    match &args.output {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            let count = export_csv_to(&storage, &filter, writer)?;
            if !output.quiet {
                eprintln!("Exported {count} issues to {}", path.display());
            }
        }
        None => {
            export_csv_to(&storage, &filter, io::stdout().lock())?;
        }
    }
    Ok(())
}
