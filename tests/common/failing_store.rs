#![allow(dead_code)]

use issue_tracker::error::{Result, TrackerError};
use issue_tracker::model::{
    Issue, IssueFilter, IssueId, IssueInput, IssuePatch, IssueStats,
};
use issue_tracker::storage::{IssueStore, SqliteStorage};
use std::collections::HashSet;

/// Store double that fails selected writes and forwards everything else to
/// an in-memory `SqliteStorage`.
pub struct FailingStore {
    pub inner: SqliteStorage,
    fail_titles: HashSet<String>,
    fail_ids: HashSet<IssueId>,
    fail_all: bool,
    pub write_attempts: usize,
}

impl FailingStore {
    pub fn new() -> Self {
        Self {
            inner: SqliteStorage::open_memory().expect("memory db"),
            fail_titles: HashSet::new(),
            fail_ids: HashSet::new(),
            fail_all: false,
            write_attempts: 0,
        }
    }

    /// `create` fails for inputs with this title.
    pub fn fail_title(mut self, title: &str) -> Self {
        self.fail_titles.insert(title.to_string());
        self
    }

    /// `update` and `delete` fail for this id.
    pub fn fail_id(mut self, id: IssueId) -> Self {
        self.fail_ids.insert(id);
        self
    }

    /// Every write fails, as if the backend were down.
    pub fn fail_all(mut self) -> Self {
        self.fail_all = true;
        self
    }

    fn injected() -> TrackerError {
        TrackerError::Other(anyhow::anyhow!("injected store failure"))
    }
}

impl IssueStore for FailingStore {
    fn create(&mut self, input: &IssueInput) -> Result<Issue> {
        self.write_attempts += 1;
        if self.fail_all || self.fail_titles.contains(&input.title) {
            return Err(Self::injected());
        }
        self.inner.create(input)
    }

    fn update(&mut self, id: IssueId, patch: &IssuePatch) -> Result<Issue> {
        self.write_attempts += 1;
        if self.fail_all || self.fail_ids.contains(&id) {
            return Err(Self::injected());
        }
        self.inner.update(id, patch)
    }

    fn delete(&mut self, id: IssueId) -> Result<()> {
        self.write_attempts += 1;
        if self.fail_all || self.fail_ids.contains(&id) {
            return Err(Self::injected());
        }
        self.inner.delete(id)
    }

    fn get(&self, id: IssueId) -> Result<Option<Issue>> {
        self.inner.get(id)
    }

    fn get_by_ids(&self, ids: &[IssueId]) -> Result<Vec<Issue>> {
        self.inner.get_by_ids(ids)
    }

    fn query(&self, filter: &IssueFilter) -> Result<Vec<Issue>> {
        self.inner.query(filter)
    }

    fn stats(&self) -> Result<IssueStats> {
        self.inner.stats()
    }
}
