//! Structured error output for scripted callers.
//!
//! Provides machine-parseable error information with:
//! - Error codes for categorization
//! - Hints for self-correction
//! - Retryability flags
//! - Context for debugging
//!
//! Intent detection recognises common spellings of status and priority
//! values ("done", "wip", "urgent") and suggests the canonical one.

use crate::error::{TrackerError, ValidationError};
use crate::model::{Priority, Status};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Machine-readable error codes.
///
/// These codes are stable and can be used for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // === Database Errors (exit code 2) ===
    DatabaseNotFound,
    DatabaseLocked,
    DatabaseError,
    NotInitialized,
    AlreadyInitialized,

    // === Issue Errors (exit code 3) ===
    IssueNotFound,
    InvalidId,

    // === Validation Errors (exit code 4) ===
    ValidationFailed,
    InvalidStatus,
    InvalidPriority,
    RequiredField,
    InvalidPatch,

    // === CSV Errors (exit code 5) ===
    MalformedCsv,
    CsvError,

    // === Config Errors (exit code 7) ===
    ConfigError,

    // === I/O Errors (exit code 8) ===
    IoError,
    JsonError,
    YamlError,

    // === Internal Errors (exit code 1) ===
    InternalError,
}

impl ErrorCode {
    /// Get the string representation for JSON output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DatabaseNotFound => "DATABASE_NOT_FOUND",
            Self::DatabaseLocked => "DATABASE_LOCKED",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            Self::IssueNotFound => "ISSUE_NOT_FOUND",
            Self::InvalidId => "INVALID_ID",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::InvalidPriority => "INVALID_PRIORITY",
            Self::RequiredField => "REQUIRED_FIELD",
            Self::InvalidPatch => "INVALID_PATCH",
            Self::MalformedCsv => "MALFORMED_CSV",
            Self::CsvError => "CSV_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::YamlError => "YAML_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Whether this error is potentially retryable.
    ///
    /// Retryable means the caller might succeed after waiting (lock
    /// contention) or after fixing the input.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::DatabaseLocked
                | Self::ValidationFailed
                | Self::InvalidStatus
                | Self::InvalidPriority
                | Self::RequiredField
                | Self::InvalidPatch
                | Self::InvalidId
        )
    }

    /// Get the exit code for this error category.
    ///
    /// - 1: Internal/unknown errors
    /// - 2: Database errors
    /// - 3: Issue errors
    /// - 4: Validation errors
    /// - 5: CSV errors
    /// - 7: Config errors
    /// - 8: I/O errors
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::DatabaseNotFound
            | Self::DatabaseLocked
            | Self::DatabaseError
            | Self::NotInitialized
            | Self::AlreadyInitialized => 2,
            Self::IssueNotFound | Self::InvalidId => 3,
            Self::ValidationFailed
            | Self::InvalidStatus
            | Self::InvalidPriority
            | Self::RequiredField
            | Self::InvalidPatch => 4,
            Self::MalformedCsv | Self::CsvError => 5,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError | Self::YamlError => 8,
            Self::InternalError => 1,
        }
    }
}

/// Structured error for machine-parseable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl StructuredError {
    /// Create a new structured error from a `TrackerError`.
    #[must_use]
    pub fn from_error(err: &TrackerError) -> Self {
        let (code, context) = Self::extract_code_and_context(err);
        let hint = Self::generate_hint(err);

        Self {
            code,
            message: err.to_string(),
            hint,
            retryable: code.is_retryable(),
            context,
        }
    }

    /// Serialize to JSON value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "code": self.code.as_str(),
                "message": self.message,
                "hint": self.hint,
                "retryable": self.retryable,
                "context": self.context,
            }
        })
    }

    /// Format for human-readable output.
    #[must_use]
    pub fn to_human(&self, color: bool) -> String {
        let mut output = String::new();

        if color {
            output.push_str("\x1b[31mError:\x1b[0m ");
        } else {
            output.push_str("Error: ");
        }
        output.push_str(&self.message);

        if let Some(hint) = &self.hint {
            output.push('\n');
            if color {
                output.push_str("\x1b[33mHint:\x1b[0m ");
            } else {
                output.push_str("Hint: ");
            }
            output.push_str(hint);
        }

        output
    }

    fn extract_code_and_context(err: &TrackerError) -> (ErrorCode, Option<Value>) {
        match err {
            TrackerError::DatabaseNotFound { path } => (
                ErrorCode::DatabaseNotFound,
                Some(json!({"path": path.display().to_string()})),
            ),
            TrackerError::Database(inner) => {
                if is_busy(inner) {
                    (ErrorCode::DatabaseLocked, None)
                } else {
                    (ErrorCode::DatabaseError, None)
                }
            }
            TrackerError::NotInitialized => (ErrorCode::NotInitialized, None),
            TrackerError::AlreadyInitialized { path } => (
                ErrorCode::AlreadyInitialized,
                Some(json!({"path": path.display().to_string()})),
            ),
            TrackerError::IssueNotFound { id } => {
                (ErrorCode::IssueNotFound, Some(json!({"searched_id": id})))
            }
            TrackerError::InvalidId { id } => (ErrorCode::InvalidId, Some(json!({"id": id}))),
            TrackerError::Validation(validation) => Self::validation_code(validation),
            TrackerError::InvalidPatch { reason, .. } => {
                (ErrorCode::InvalidPatch, Some(json!({"reason": reason})))
            }
            TrackerError::MalformedCsv { reason } => {
                (ErrorCode::MalformedCsv, Some(json!({"reason": reason})))
            }
            TrackerError::Csv(_) => (ErrorCode::CsvError, None),
            TrackerError::Config(_) => (ErrorCode::ConfigError, None),
            TrackerError::Io(_) => (ErrorCode::IoError, None),
            TrackerError::Json(_) => (ErrorCode::JsonError, None),
            TrackerError::Yaml(_) => (ErrorCode::YamlError, None),
            TrackerError::Other(_) => (ErrorCode::InternalError, None),
        }
    }

    fn validation_code(err: &ValidationError) -> (ErrorCode, Option<Value>) {
        match err {
            ValidationError::TitleRequired => {
                (ErrorCode::RequiredField, Some(json!({"field": "title"})))
            }
            ValidationError::InvalidStatus(provided) => (
                ErrorCode::InvalidStatus,
                Some(json!({
                    "provided": provided,
                    "valid_values": Status::ALL.map(Status::as_str),
                })),
            ),
            ValidationError::InvalidPriority(provided) => (
                ErrorCode::InvalidPriority,
                Some(json!({
                    "provided": provided,
                    "valid_values": Priority::ALL.map(Priority::as_str),
                })),
            ),
            ValidationError::TooLong { field } => {
                (ErrorCode::ValidationFailed, Some(json!({"field": field})))
            }
            ValidationError::MalformedRow { expected, found } => (
                ErrorCode::ValidationFailed,
                Some(json!({"expected": expected, "found": found})),
            ),
        }
    }

    /// Generate context-aware hint from error.
    fn generate_hint(err: &TrackerError) -> Option<String> {
        match err {
            TrackerError::Validation(validation)
            | TrackerError::InvalidPatch {
                field: Some(validation),
                ..
            } => {
                if let Some(hint) = Self::intent_hint(validation) {
                    return Some(hint);
                }
            }
            TrackerError::IssueNotFound { .. } => {
                return Some("Run 'itr list' to see available issues.".to_string());
            }
            TrackerError::Database(inner) if is_busy(inner) => {
                return Some("Another process holds the lock; retry or raise --lock-timeout.".to_string());
            }
            _ => {}
        }

        err.suggestion().map(str::to_string)
    }

    fn intent_hint(err: &ValidationError) -> Option<String> {
        match err {
            ValidationError::InvalidStatus(provided) => detect_status_intent(provided)
                .map(|detected| format!("Did you mean --status {detected}?")),
            ValidationError::InvalidPriority(provided) => detect_priority_intent(provided)
                .map(|detected| format!("Did you mean --priority {detected}?")),
            _ => None,
        }
    }
}

fn is_busy(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if matches!(e.code, rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked)
    )
}

// === Intent Detection ===

/// Status synonyms for intent detection.
static STATUS_SYNONYMS: LazyLock<HashMap<&'static str, Status>> = LazyLock::new(|| {
    [
        ("done", Status::Closed),
        ("complete", Status::Closed),
        ("completed", Status::Closed),
        ("finished", Status::Closed),
        ("wontfix", Status::Closed),
        ("fixed", Status::Resolved),
        ("solved", Status::Resolved),
        ("wip", Status::InProgress),
        ("working", Status::InProgress),
        ("active", Status::InProgress),
        ("started", Status::InProgress),
        ("in progress", Status::InProgress),
        ("in-progress", Status::InProgress),
        ("inprogress", Status::InProgress),
        ("new", Status::Open),
        ("todo", Status::Open),
        ("pending", Status::Open),
    ]
    .into_iter()
    .collect()
});

/// Priority synonyms for intent detection.
static PRIORITY_SYNONYMS: LazyLock<HashMap<&'static str, Priority>> = LazyLock::new(|| {
    [
        ("crit", Priority::Critical),
        ("urgent", Priority::Critical),
        ("highest", Priority::Critical),
        ("blocker", Priority::Critical),
        ("p0", Priority::Critical),
        ("important", Priority::High),
        ("p1", Priority::High),
        ("normal", Priority::Medium),
        ("default", Priority::Medium),
        ("med", Priority::Medium),
        ("p2", Priority::Medium),
        ("minor", Priority::Low),
        ("lowest", Priority::Low),
        ("trivial", Priority::Low),
        ("p3", Priority::Low),
    ]
    .into_iter()
    .collect()
});

/// Detect what status the user likely meant.
fn detect_status_intent(input: &str) -> Option<Status> {
    let lower = input.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    // Case-insensitive match
    if let Ok(status) = lower.parse::<Status>() {
        return Some(status);
    }

    if let Some(&status) = STATUS_SYNONYMS.get(lower.as_str()) {
        return Some(status);
    }

    Status::ALL
        .into_iter()
        .find(|status| status.as_str().starts_with(&lower))
}

/// Detect what priority the user likely meant.
fn detect_priority_intent(input: &str) -> Option<Priority> {
    let lower = input.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    if let Ok(priority) = lower.parse::<Priority>() {
        return Some(priority);
    }

    if let Some(&priority) = PRIORITY_SYNONYMS.get(lower.as_str()) {
        return Some(priority);
    }

    Priority::ALL
        .into_iter()
        .find(|priority| priority.as_str().starts_with(&lower))
}
