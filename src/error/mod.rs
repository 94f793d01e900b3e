//! Error types and handling for `issue_tracker`.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - `ValidationError` is the per-row/per-patch error; batches capture it
//!   in their reports instead of propagating it
//! - `TrackerError` is everything that can abort an operation
//! - Provides recovery hints for user-facing errors
//! - Provides structured JSON output for scripted callers

mod structured;

pub use structured::{ErrorCode, StructuredError};

use crate::model::IssueId;
use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for `issue_tracker` operations.
#[derive(Error, Debug)]
pub enum TrackerError {
    // === Storage Errors ===
    /// Database file not found at the specified path.
    #[error("Database not found at '{path}'")]
    DatabaseNotFound { path: PathBuf },

    /// `SQLite` database error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // === Issue Errors ===
    /// Issue with the specified ID was not found.
    #[error("Issue not found: {id}")]
    IssueNotFound { id: IssueId },

    /// Issue ID could not be parsed.
    #[error("Invalid issue ID: {id}")]
    InvalidId { id: String },

    // === Validation Errors ===
    /// A single record failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A patch was rejected before any mutation was attempted.
    ///
    /// `field` is set when a specific field failed the row rules.
    #[error("Invalid patch: {reason}")]
    InvalidPatch {
        reason: String,
        #[source]
        field: Option<ValidationError>,
    },

    // === CSV Errors ===
    /// The byte stream as a whole could not be decoded.
    #[error("Malformed CSV: {reason}")]
    MalformedCsv { reason: String },

    /// Error raised by the CSV reader or writer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // === Configuration Errors ===
    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tracker workspace not initialized.
    #[error("Tracker not initialized: run 'itr init' first")]
    NotInitialized,

    /// Already initialized.
    #[error("Already initialized at '{path}'")]
    AlreadyInitialized { path: PathBuf },

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Wrapped anyhow error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A single record validation failure.
///
/// The `Display` text is the exact message reported in import and patch
/// results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title is required")]
    TitleRequired,

    #[error("invalid status: {0}")]
    InvalidStatus(String),

    #[error("invalid priority: {0}")]
    InvalidPriority(String),

    #[error("{field} too long")]
    TooLong { field: &'static str },

    /// A CSV data row whose field count differs from the header's.
    #[error("malformed row: expected {expected} fields, found {found}")]
    MalformedRow { expected: usize, found: usize },
}

impl TrackerError {
    /// Can the user fix this without code changes?
    #[must_use]
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DatabaseNotFound { .. }
                | Self::NotInitialized
                | Self::IssueNotFound { .. }
                | Self::InvalidId { .. }
                | Self::Validation(_)
                | Self::InvalidPatch { .. }
                | Self::MalformedCsv { .. }
        )
    }

    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run: itr init"),
            Self::DatabaseNotFound { .. } => Some("Check path or run: itr init"),
            Self::AlreadyInitialized { .. } => Some("Use --force to reinitialize"),
            Self::InvalidId { .. } => Some("Issue IDs are positive integers"),
            Self::MalformedCsv { .. } => Some(
                "The file must be UTF-8 CSV with a header row: title,description,status,priority,assignee,reporter",
            ),
            Self::Validation(err)
            | Self::InvalidPatch {
                field: Some(err), ..
            } => err.suggestion(),
            _ => None,
        }
    }

    /// Create an invalid-patch error from any displayable reason.
    #[must_use]
    pub fn invalid_patch(reason: impl ToString) -> Self {
        Self::InvalidPatch {
            reason: reason.to_string(),
            field: None,
        }
    }

    /// Create an invalid-patch error for a field that failed validation.
    #[must_use]
    pub fn invalid_patch_field(err: ValidationError) -> Self {
        Self::InvalidPatch {
            reason: err.to_string(),
            field: Some(err),
        }
    }

    /// Create a whole-stream CSV decode error.
    #[must_use]
    pub fn malformed_csv(reason: impl Into<String>) -> Self {
        Self::MalformedCsv {
            reason: reason.into(),
        }
    }
}

impl ValidationError {
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidPriority(_) => Some("Valid priorities: low, medium, high, critical"),
            Self::InvalidStatus(_) => Some("Valid statuses: open, in_progress, resolved, closed"),
            Self::TitleRequired => Some("Provide a non-empty title of at most 200 characters"),
            _ => None,
        }
    }
}

/// Result type using `TrackerError`.
pub type Result<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrackerError::IssueNotFound { id: 42 };
        assert_eq!(err.to_string(), "Issue not found: 42");
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(ValidationError::TitleRequired.to_string(), "title is required");
        assert_eq!(
            ValidationError::InvalidStatus("done".to_string()).to_string(),
            "invalid status: done"
        );
        assert_eq!(
            ValidationError::TooLong { field: "assignee" }.to_string(),
            "assignee too long"
        );
        assert_eq!(
            ValidationError::MalformedRow {
                expected: 6,
                found: 2
            }
            .to_string(),
            "malformed row: expected 6 fields, found 2"
        );
    }

    #[test]
    fn test_validation_is_transparent() {
        let err = TrackerError::from(ValidationError::InvalidPriority("urgent".to_string()));
        assert_eq!(err.to_string(), "invalid priority: urgent");
    }

    #[test]
    fn test_invalid_patch_wraps_reason() {
        let err = TrackerError::invalid_patch(ValidationError::InvalidStatus("bogus".into()));
        assert_eq!(err.to_string(), "Invalid patch: invalid status: bogus");
    }

    #[test]
    fn test_invalid_patch_field_keeps_source() {
        use std::error::Error as _;

        let err = TrackerError::invalid_patch_field(ValidationError::InvalidPriority("p9".into()));
        assert_eq!(err.to_string(), "Invalid patch: invalid priority: p9");
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("invalid priority: p9")
        );
        assert_eq!(
            err.suggestion(),
            Some("Valid priorities: low, medium, high, critical")
        );
        assert!(TrackerError::invalid_patch("patch has no fields").suggestion().is_none());
    }

    #[test]
    fn test_user_recoverable() {
        assert!(TrackerError::NotInitialized.is_user_recoverable());
        assert!(TrackerError::invalid_patch("empty").is_user_recoverable());

        let not_recoverable = TrackerError::Database(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(1),
            None,
        ));
        assert!(!not_recoverable.is_user_recoverable());
    }

    #[test]
    fn test_suggestion() {
        assert_eq!(
            TrackerError::NotInitialized.suggestion(),
            Some("Run: itr init")
        );
        let err = TrackerError::from(ValidationError::InvalidStatus("x".into()));
        assert!(err.suggestion().unwrap().contains("in_progress"));
        assert_eq!(TrackerError::IssueNotFound { id: 1 }.suggestion(), None);
    }
}
