//! Subcommand implementations.
//!
//! Each module exposes an `execute` function called from `main`. Commands
//! discover the workspace, open storage through [`config::open_storage`],
//! and print either text or JSON.

pub mod bulk_delete;
pub mod bulk_update;
pub mod completions;
pub mod create;
pub mod delete;
pub mod export;
pub mod import;
pub mod init;
pub mod list;
pub mod show;
pub mod stats;
pub mod update;

use crate::cli::FilterArgs;
use crate::config::{self, CliOverrides, ResolvedConfig};
use crate::error::Result;
use crate::model::{IssueFilter, Priority, Status};
use crate::storage::SqliteStorage;
use serde::Serialize;

/// How command results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    pub json: bool,
    pub use_color: bool,
    pub quiet: bool,
}

impl OutputOptions {
    /// Fold in the `json` config key.
    #[must_use]
    pub const fn with_config(self, config: &ResolvedConfig) -> Self {
        Self {
            json: self.json || config.json,
            ..self
        }
    }
}

/// Discover the workspace from the current directory and open its store.
pub(crate) fn open_workspace(cli: &CliOverrides) -> Result<(SqliteStorage, ResolvedConfig)> {
    let tracker_dir = config::discover_tracker_dir(None)?;
    config::open_storage(&tracker_dir, cli)
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parse filter flags. Enum values must match exactly.
pub(crate) fn filter_from_args(args: &FilterArgs) -> Result<IssueFilter> {
    Ok(IssueFilter {
        status: args
            .status
            .as_deref()
            .map(str::parse::<Status>)
            .transpose()?,
        priority: args
            .priority
            .as_deref()
            .map(str::parse::<Priority>)
            .transpose()?,
        assignee: non_blank(args.assignee.as_deref()),
        search: non_blank(args.search.as_deref()),
        ..IssueFilter::default()
    })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{TrackerError, ValidationError};

    #[test]
    fn filter_args_parse_enums() {
        let filter = filter_from_args(&FilterArgs {
            status: Some("resolved".to_string()),
            priority: Some("high".to_string()),
            assignee: Some("  ".to_string()),
            search: Some("crash".to_string()),
        })
        .unwrap();
        assert_eq!(filter.status, Some(Status::Resolved));
        assert_eq!(filter.priority, Some(Priority::High));
        assert_eq!(filter.assignee, None);
        assert_eq!(filter.search.as_deref(), Some("crash"));
    }

    #[test]
    fn filter_args_reject_unknown_status() {
        let err = filter_from_args(&FilterArgs {
            status: Some("done".to_string()),
            ..FilterArgs::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Validation(ValidationError::InvalidStatus(s)) if s == "done"
        ));
    }
}
