//! Import command implementation.

use super::{OutputOptions, open_workspace, print_json};
use crate::batch::import_csv_with_progress;
use crate::cli::ImportArgs;
use crate::config::CliOverrides;
use crate::error::{Result, TrackerError};
use crate::format::format_import_summary;
use crate::util::progress::{ProgressTracker, should_show_progress};
use std::fs;
use std::path::Path;
use tracing::info;

/// Execute the import command.
///
/// Row failures are part of the report and do not fail the command.
///
/// # Errors
///
/// Returns `MalformedCsv` if the file is not a `.csv` file or cannot be
/// decoded at all, or an I/O error if it cannot be read.
pub fn execute(args: &ImportArgs, cli: &CliOverrides, output: OutputOptions) -> Result<()> {
    ensure_csv_extension(&args.file)?;
    let bytes = fs::read(&args.file)?;
    let (mut storage, config) = open_workspace(cli)?;
    let output = output.with_config(&config);

    info!(path = %args.file.display(), bytes = bytes.len(), "Importing CSV");

    let show = !output.json && !output.quiet && should_show_progress();
    let progress = ProgressTracker::with_visibility(0, "Importing", show);
    let summary = import_csv_with_progress(&mut storage, &bytes, |p| {
        if p.processed == 1 {
            progress.set_total(u64::try_from(p.total).unwrap_or(u64::MAX));
        }
        progress.inc(1);
    })?;
    progress.finish_and_clear();

    if output.json {
        print_json(&summary)?;
    } else if !output.quiet || summary.failed > 0 {
        print!("{}", format_import_summary(&summary));
    }
    Ok(())
}

fn ensure_csv_extension(path: &Path) -> Result<()> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        Ok(())
    } else {
        Err(TrackerError::malformed_csv("only .csv files are supported"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_extension_check() {
        assert!(ensure_csv_extension(Path::new("issues.csv")).is_ok());
        assert!(ensure_csv_extension(Path::new("ISSUES.CSV")).is_ok());
        assert!(matches!(
            ensure_csv_extension(Path::new("issues.json")),
            Err(TrackerError::MalformedCsv { .. })
        ));
        assert!(ensure_csv_extension(Path::new("issues")).is_err());
    }
}
