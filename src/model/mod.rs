//! Core data types for `issue_tracker`.
//!
//! This module defines the fundamental types used throughout the application:
//! - `Issue` - The tracked work item
//! - `Status` / `Priority` - Closed enumerations, never arbitrary strings
//! - `IssueInput` - Validated creation payload
//! - `IssuePatch` / `PatchRequest` - Typed and untyped partial updates
//! - `ImportRowOutcome` / `ImportSummary` / `BulkResult` - Batch reports
//! - `IssueFilter` / `IssueStats` / `IssueSummary` - Queries and reporting

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Store-assigned issue identifier.
pub type IssueId = i64;

/// An untyped record of named fields, as decoded from one CSV data row.
pub type Row = BTreeMap<String, String>;

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum assignee/reporter length in characters.
pub const MAX_PERSON_LEN: usize = 100;

/// Issue lifecycle status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl Status {
    /// Every status, in workflow order.
    pub const ALL: [Self; 4] = [Self::Open, Self::InProgress, Self::Resolved, Self::Closed];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsing is exact: only the lowercase wire names are accepted.
impl FromStr for Status {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidStatus(s.to_string()))
    }
}

/// Issue priority.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Every priority, lowest first.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidPriority(s.to_string()))
    }
}

/// The primary issue entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    /// Store-assigned ID, immutable once created.
    pub id: IssueId,

    /// Title (1-200 chars).
    pub title: String,

    /// Detailed description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Workflow status.
    #[serde(default)]
    pub status: Status,

    /// Priority level.
    #[serde(default)]
    pub priority: Priority,

    /// Assigned person (max 100 chars).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    /// Reporter (max 100 chars).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter: Option<String>,

    /// Creation timestamp, never mutated.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A validated creation payload. The store assigns `id` and timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueInput {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter: Option<String>,
}

impl IssueInput {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Fields to update on an issue.
///
/// `None` leaves a field untouched. For nullable fields, `Some(None)` clears
/// the value and `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuePatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub assignee: Option<Option<String>>,
    pub reporter: Option<Option<String>>,
}

impl IssuePatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.assignee.is_none()
            && self.reporter.is_none()
    }

    /// Apply present fields to `issue`, leaving absent ones untouched.
    pub fn apply_to(&self, issue: &mut Issue) {
        if let Some(ref title) = self.title {
            issue.title.clone_from(title);
        }
        if let Some(ref description) = self.description {
            issue.description.clone_from(description);
        }
        if let Some(status) = self.status {
            issue.status = status;
        }
        if let Some(priority) = self.priority {
            issue.priority = priority;
        }
        if let Some(ref assignee) = self.assignee {
            issue.assignee.clone_from(assignee);
        }
        if let Some(ref reporter) = self.reporter {
            issue.reporter.clone_from(reporter);
        }
    }
}

/// An unvalidated patch as supplied by a caller.
///
/// Status and priority arrive as raw strings; `validation::validate_patch`
/// turns this into an [`IssuePatch`] or rejects it as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchRequest {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assignee: Option<Option<String>>,
    pub reporter: Option<Option<String>>,
}

impl PatchRequest {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.assignee.is_none()
            && self.reporter.is_none()
    }
}

/// Outcome of a single import row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRowOutcome {
    /// 1-based data row number (the header is not counted).
    pub row_number: usize,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// ID assigned by the store when the row was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_id: Option<IssueId>,
}

impl ImportRowOutcome {
    #[must_use]
    pub const fn created(row_number: usize, issue_id: IssueId) -> Self {
        Self {
            row_number,
            success: true,
            error: None,
            issue_id: Some(issue_id),
        }
    }

    #[must_use]
    pub fn failed(row_number: usize, error: impl Into<String>) -> Self {
        Self {
            row_number,
            success: false,
            error: Some(error.into()),
            issue_id: None,
        }
    }
}

/// Tally of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total_rows: usize,
    pub successful: usize,
    pub failed: usize,
    /// Failed rows only, in input order.
    pub errors: Vec<ImportRowOutcome>,
    /// IDs of created issues, in input order.
    #[serde(default)]
    pub created_ids: Vec<IssueId>,
}

impl ImportSummary {
    /// Fold per-row outcomes (in input order) into a summary.
    #[must_use]
    pub fn from_outcomes(outcomes: Vec<ImportRowOutcome>) -> Self {
        let total_rows = outcomes.len();
        let (ok, errors): (Vec<_>, Vec<_>) = outcomes.into_iter().partition(|o| o.success);
        let created_ids = ok.iter().filter_map(|o| o.issue_id).collect();
        let successful = ok.len();

        Self {
            total_rows,
            successful,
            failed: total_rows - successful,
            errors,
            created_ids,
        }
    }
}

/// Why a single id in a bulk operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkFailure {
    NotFound,
    StoreError,
}

impl BulkFailure {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not found",
            Self::StoreError => "store error",
        }
    }
}

impl fmt::Display for BulkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-id result of a bulk update or delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkResult {
    pub requested_ids: BTreeSet<IssueId>,
    pub succeeded: BTreeSet<IssueId>,
    pub failed: BTreeMap<IssueId, BulkFailure>,
}

impl BulkResult {
    #[must_use]
    pub fn new(requested_ids: BTreeSet<IssueId>) -> Self {
        Self {
            requested_ids,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty() && self.succeeded.len() == self.requested_ids.len()
    }
}

/// Filter options for querying issues.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub assignee: Option<String>,
    /// Case-insensitive substring match on title or description.
    pub search: Option<String>,
    pub offset: usize,
    pub limit: Option<usize>,
}

/// Aggregate counts across the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueStats {
    pub total_issues: usize,
    /// Every status is present, zero counts included.
    pub by_status: BTreeMap<Status, usize>,
    /// Every priority is present, zero counts included.
    pub by_priority: BTreeMap<Priority, usize>,
    pub by_assignee: BTreeMap<String, usize>,
    pub unassigned: usize,
}

impl IssueStats {
    /// Stats with every enum bucket initialised to zero.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            by_status: Status::ALL.into_iter().map(|s| (s, 0)).collect(),
            by_priority: Priority::ALL.into_iter().map(|p| (p, 0)).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn status_count(&self, status: Status) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn priority_count(&self, priority: Priority) -> usize {
        self.by_priority.get(&priority).copied().unwrap_or(0)
    }
}

/// Flat summary report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub total_issues: usize,
    pub open_issues: usize,
    pub in_progress_issues: usize,
    pub resolved_issues: usize,
    pub closed_issues: usize,
    pub critical_priority: usize,
    pub high_priority: usize,
    pub medium_priority: usize,
    pub low_priority: usize,
}

impl From<&IssueStats> for IssueSummary {
    fn from(stats: &IssueStats) -> Self {
        Self {
            total_issues: stats.total_issues,
            open_issues: stats.status_count(Status::Open),
            in_progress_issues: stats.status_count(Status::InProgress),
            resolved_issues: stats.status_count(Status::Resolved),
            closed_issues: stats.status_count(Status::Closed),
            critical_priority: stats.priority_count(Priority::Critical),
            high_priority: stats.priority_count(Priority::High),
            medium_priority: stats.priority_count(Priority::Medium),
            low_priority: stats.priority_count(Priority::Low),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_issue() -> Issue {
        let ts = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        Issue {
            id: 7,
            title: "Test Issue".to_string(),
            description: None,
            status: Status::Open,
            priority: Priority::Medium,
            assignee: Some("amy".to_string()),
            reporter: None,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn status_parse_is_exact() {
        assert_eq!("in_progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!(
            "Open".parse::<Status>().unwrap_err(),
            ValidationError::InvalidStatus("Open".to_string())
        );
        assert!("in progress".parse::<Status>().is_err());
    }

    #[test]
    fn priority_parse_is_exact() {
        assert_eq!("critical".parse::<Priority>().unwrap(), Priority::Critical);
        assert_eq!(
            "HIGH".parse::<Priority>().unwrap_err().to_string(),
            "invalid priority: HIGH"
        );
    }

    #[test]
    fn defaults_match_new_issue_defaults() {
        assert_eq!(Status::default(), Status::Open);
        assert_eq!(Priority::default(), Priority::Medium);
        let input = IssueInput::new("x");
        assert_eq!(input.status, Status::Open);
        assert_eq!(input.priority, Priority::Medium);
    }

    #[test]
    fn test_issue_serialization() {
        let json = serde_json::to_string(&sample_issue()).unwrap();
        assert!(json.contains("\"id\":7"));
        assert!(json.contains("\"status\":\"open\""));
        assert!(json.contains("\"priority\":\"medium\""));
        assert!(json.contains("\"assignee\":\"amy\""));
        assert!(!json.contains("description"));
        assert!(!json.contains("reporter"));
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let mut issue = sample_issue();
        let patch = IssuePatch {
            status: Some(Status::Resolved),
            assignee: Some(None),
            ..IssuePatch::default()
        };
        patch.apply_to(&mut issue);

        assert_eq!(issue.status, Status::Resolved);
        assert_eq!(issue.assignee, None);
        assert_eq!(issue.title, "Test Issue");
        assert_eq!(issue.priority, Priority::Medium);
    }

    #[test]
    fn empty_patch_is_empty() {
        assert!(IssuePatch::default().is_empty());
        assert!(PatchRequest::default().is_empty());
        let req = PatchRequest {
            reporter: Some(None),
            ..PatchRequest::default()
        };
        assert!(!req.is_empty());
    }

    #[test]
    fn summary_tallies_outcomes_in_order() {
        let summary = ImportSummary::from_outcomes(vec![
            ImportRowOutcome::created(1, 10),
            ImportRowOutcome::failed(2, "title is required"),
            ImportRowOutcome::created(3, 11),
        ]);

        assert_eq!(summary.total_rows, 3);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].row_number, 2);
        assert_eq!(summary.created_ids, vec![10, 11]);
    }

    #[test]
    fn bulk_failure_serializes_snake_case() {
        let json = serde_json::to_string(&BulkFailure::StoreError).unwrap();
        assert_eq!(json, "\"store_error\"");
        assert_eq!(BulkFailure::NotFound.to_string(), "not found");
    }

    #[test]
    fn stats_serialize_enum_keys() {
        let mut stats = IssueStats::empty();
        stats.total_issues = 1;
        stats.by_status.insert(Status::InProgress, 1);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["by_status"]["in_progress"], 1);
        assert_eq!(json["by_priority"]["critical"], 0);
    }

    #[test]
    fn summary_from_stats() {
        let mut stats = IssueStats::empty();
        stats.total_issues = 3;
        stats.by_status.insert(Status::Open, 2);
        stats.by_status.insert(Status::Closed, 1);
        stats.by_priority.insert(Priority::High, 3);

        let summary = IssueSummary::from(&stats);
        assert_eq!(summary.total_issues, 3);
        assert_eq!(summary.open_issues, 2);
        assert_eq!(summary.closed_issues, 1);
        assert_eq!(summary.in_progress_issues, 0);
        assert_eq!(summary.high_priority, 3);
    }
}
