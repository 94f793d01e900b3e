//! CLI definitions and entry point.

use crate::model::PatchRequest;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;

/// Issue tracker with CSV import/export and bulk edits (`SQLite`)
#[derive(Parser, Debug)]
#[command(name = "itr", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: .tracker/tracker.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// `SQLite` busy timeout in ms
    #[arg(long, global = true)]
    pub lock_timeout: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a tracker workspace in the current directory
    Init {
        /// Recreate the database if one exists
        #[arg(long)]
        force: bool,
    },

    /// Create a new issue
    Create(CreateArgs),

    /// Show issue details
    Show {
        /// Issue ID
        id: String,
    },

    /// List issues
    List(ListArgs),

    /// Update an issue
    Update(UpdateArgs),

    /// Delete an issue
    Delete {
        /// Issue ID
        id: String,
    },

    /// Import issues from a CSV file
    #[command(long_about = "Import issues from a CSV file.

The first row is the header. Recognised columns (any order, case-insensitive):
  title, description, status, priority, assignee, reporter
Other columns are ignored. Each row is validated and created on its own;
invalid rows are reported by row number and do not stop the import.")]
    Import(ImportArgs),

    /// Export issues as CSV
    Export(ExportArgs),

    /// Apply one change to many issues
    BulkUpdate(BulkUpdateArgs),

    /// Delete many issues
    BulkDelete(BulkDeleteArgs),

    /// Show counts by status, priority and assignee
    Stats,

    /// Show the flat summary report
    Summary,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the completions command.
#[derive(Args, Debug, Clone)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: ShellType,

    /// Output file (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Supported shells for completion generation.
#[derive(ValueEnum, Debug, Clone, Copy, Eq, PartialEq)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    #[value(alias = "pwsh")]
    PowerShell,
    Elvish,
}

#[derive(Args, Debug, Default)]
pub struct CreateArgs {
    /// Issue title
    pub title: String,

    /// Description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Status (open, in_progress, resolved, closed)
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// Priority (low, medium, high, critical)
    #[arg(long, short = 'p')]
    pub priority: Option<String>,

    /// Assign to person
    #[arg(long, short = 'a')]
    pub assignee: Option<String>,

    /// Reporter
    #[arg(long, short = 'r')]
    pub reporter: Option<String>,
}

/// Field changes shared by `update` and `bulk-update`.
///
/// An empty string clears a nullable field.
#[derive(Args, Debug, Default, Clone)]
pub struct PatchArgs {
    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New description (empty string clears)
    #[arg(long)]
    pub description: Option<String>,

    /// New status
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// New priority
    #[arg(long, short = 'p')]
    pub priority: Option<String>,

    /// New assignee (empty string clears)
    #[arg(long, short = 'a')]
    pub assignee: Option<String>,

    /// New reporter (empty string clears)
    #[arg(long, short = 'r')]
    pub reporter: Option<String>,
}

impl PatchArgs {
    #[must_use]
    pub fn to_request(&self) -> PatchRequest {
        PatchRequest {
            title: self.title.clone(),
            description: self.description.clone().map(Some),
            status: self.status.clone(),
            priority: self.priority.clone(),
            assignee: self.assignee.clone().map(Some),
            reporter: self.reporter.clone().map(Some),
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
    /// Issue ID
    pub id: String,

    #[command(flatten)]
    pub patch: PatchArgs,
}

/// Filters shared by `list` and `export`.
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Filter by status
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// Filter by priority
    #[arg(long, short = 'p')]
    pub priority: Option<String>,

    /// Filter by assignee
    #[arg(long, short = 'a')]
    pub assignee: Option<String>,

    /// Title or description contains text
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Skip this many issues
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Maximum number of results (default from config, max 1000)
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// CSV file to import
    pub file: PathBuf,
}

#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Write to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Args, Debug, Default)]
pub struct BulkUpdateArgs {
    /// Issue IDs to update
    #[arg(required = true)]
    pub ids: Vec<String>,

    #[command(flatten)]
    pub patch: PatchArgs,
}

#[derive(Args, Debug, Default)]
pub struct BulkDeleteArgs {
    /// Issue IDs to delete
    pub ids: Vec<String>,

    /// Read IDs from file (one per line, # comments ignored)
    #[arg(long)]
    pub from_file: Option<PathBuf>,
}
