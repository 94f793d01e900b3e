//! Record store contract and its `SQLite` backend.
//!
//! The batch pipeline only talks to [`IssueStore`]. Every write is atomic per
//! record; there is no multi-record transaction in the contract.

mod schema;
mod sqlite;

pub use schema::{CURRENT_SCHEMA_VERSION, apply_schema};
pub use sqlite::SqliteStorage;

use crate::error::Result;
use crate::model::{Issue, IssueFilter, IssueId, IssueInput, IssuePatch, IssueStats};
use std::path::PathBuf;

/// Default `SQLite` busy timeout in milliseconds.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 30_000;

/// Persistence operations used by the import, bulk and export paths.
pub trait IssueStore {
    /// Create an issue, assigning its id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn create(&mut self, input: &IssueInput) -> Result<Issue>;

    /// Apply the present fields of `patch` and refresh `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::IssueNotFound` if no issue has `id`, or a store
    /// error if the write fails.
    fn update(&mut self, id: IssueId, patch: &IssuePatch) -> Result<Issue>;

    /// Remove an issue.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::IssueNotFound` if no issue has `id`, or a store
    /// error if the write fails.
    fn delete(&mut self, id: IssueId) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn get(&self, id: IssueId) -> Result<Option<Issue>>;

    /// Fetch the issues that exist among `ids`, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn get_by_ids(&self, ids: &[IssueId]) -> Result<Vec<Issue>>;

    /// Issues matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn query(&self, filter: &IssueFilter) -> Result<Vec<Issue>>;

    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn stats(&self) -> Result<IssueStats>;
}

/// Connection settings for [`SqliteStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub busy_timeout_ms: u64,
}

impl StoreConfig {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }

    #[must_use]
    pub fn with_busy_timeout(mut self, timeout_ms: u64) -> Self {
        self.busy_timeout_ms = timeout_ms;
        self
    }
}
