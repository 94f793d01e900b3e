//! `SQLite` storage implementation.

use crate::error::{Result, TrackerError};
use crate::model::{
    Issue, IssueFilter, IssueId, IssueInput, IssuePatch, IssueStats, Priority, Status,
};
use crate::storage::schema::apply_schema;
use crate::storage::{IssueStore, StoreConfig};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, TimeZone, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Transaction};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Bound on host parameters per statement.
const SQLITE_VAR_LIMIT: usize = 900;

const ISSUE_COLUMNS: &str =
    "id, title, description, status, priority, assignee, reporter, created_at, updated_at";

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStorage {
    /// Open the database at `path` with the default busy timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema application fails.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_config(&StoreConfig::new(path))
    }

    /// Open the database described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema application fails.
    pub fn open_with_config(config: &StoreConfig) -> Result<Self> {
        let conn = Connection::open(&config.path)?;
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
        apply_schema(&conn)?;
        tracing::debug!(path = %config.path.display(), timeout_ms = config.busy_timeout_ms, "Opened database");
        Ok(Self {
            conn,
            path: Some(config.path.clone()),
        })
    }

    /// Open an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn, path: None })
    }

    /// Path of the database file, `None` for in-memory stores.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run one write in its own `IMMEDIATE` transaction.
    ///
    /// The transaction is rolled back if `f` fails.
    fn mutate<F, R>(&mut self, op: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        let result = f(&tx)?;
        tx.commit()?;
        tracing::trace!(op, "Committed mutation");
        Ok(result)
    }

    /// Count all issues.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_issues(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM issues", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Get a metadata value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_metadata(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM metadata WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Set a metadata value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn set_metadata(&mut self, key: &str, value: &str) -> Result<()> {
        self.mutate("set_metadata", |tx| {
            tx.execute(
                "INSERT OR REPLACE INTO metadata (key, value) VALUES (?, ?)",
                rusqlite::params![key, value],
            )?;
            Ok(())
        })
    }

    fn issue_from_row(row: &rusqlite::Row) -> rusqlite::Result<Issue> {
        Ok(Issue {
            id: row.get(0)?,
            title: row.get(1)?,
            description: empty_to_none(row.get::<_, Option<String>>(2)?),
            status: parse_column::<Status>(row, 3)?,
            priority: parse_column::<Priority>(row, 4)?,
            assignee: empty_to_none(row.get::<_, Option<String>>(5)?),
            reporter: empty_to_none(row.get::<_, Option<String>>(6)?),
            created_at: datetime_column(row, 7)?,
            updated_at: datetime_column(row, 8)?,
        })
    }
}

impl IssueStore for SqliteStorage {
    fn create(&mut self, input: &IssueInput) -> Result<Issue> {
        let now = timestamp_now();
        let id = self.mutate("create_issue", |tx| {
            tx.execute(
                "INSERT INTO issues (
                    title, description, status, priority, assignee, reporter,
                    created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    input.title,
                    input.description,
                    input.status.as_str(),
                    input.priority.as_str(),
                    input.assignee,
                    input.reporter,
                    format_datetime(now),
                    format_datetime(now),
                ],
            )?;
            Ok(tx.last_insert_rowid())
        })?;

        tracing::debug!(id, title = %input.title, "Created issue");

        Ok(Issue {
            id,
            title: input.title.clone(),
            description: input.description.clone(),
            status: input.status,
            priority: input.priority,
            assignee: input.assignee.clone(),
            reporter: input.reporter.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    fn update(&mut self, id: IssueId, patch: &IssuePatch) -> Result<Issue> {
        let mut issue = self.get(id)?.ok_or(TrackerError::IssueNotFound { id })?;
        if patch.is_empty() {
            return Ok(issue);
        }

        let now = timestamp_now();
        self.mutate("update_issue", |tx| {
            let mut set_clauses: Vec<&str> = vec![];
            let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![];

            let mut add_update = |clause: &'static str, val: Box<dyn rusqlite::ToSql>| {
                set_clauses.push(clause);
                params.push(val);
            };

            if let Some(ref title) = patch.title {
                add_update("title = ?", Box::new(title.clone()));
            }
            if let Some(ref description) = patch.description {
                add_update("description = ?", Box::new(description.clone()));
            }
            if let Some(status) = patch.status {
                add_update("status = ?", Box::new(status.as_str()));
            }
            if let Some(priority) = patch.priority {
                add_update("priority = ?", Box::new(priority.as_str()));
            }
            if let Some(ref assignee) = patch.assignee {
                add_update("assignee = ?", Box::new(assignee.clone()));
            }
            if let Some(ref reporter) = patch.reporter {
                add_update("reporter = ?", Box::new(reporter.clone()));
            }
            add_update("updated_at = ?", Box::new(format_datetime(now)));
            params.push(Box::new(id));

            let sql = format!("UPDATE issues SET {} WHERE id = ?", set_clauses.join(", "));
            let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(AsRef::as_ref).collect();
            let changed = tx.execute(&sql, params_refs.as_slice())?;
            if changed == 0 {
                return Err(TrackerError::IssueNotFound { id });
            }
            Ok(())
        })?;

        patch.apply_to(&mut issue);
        issue.updated_at = now;
        tracing::debug!(id, "Updated issue");
        Ok(issue)
    }

    fn delete(&mut self, id: IssueId) -> Result<()> {
        self.mutate("delete_issue", |tx| {
            let changed = tx.execute("DELETE FROM issues WHERE id = ?", [id])?;
            if changed == 0 {
                return Err(TrackerError::IssueNotFound { id });
            }
            Ok(())
        })?;
        tracing::debug!(id, "Deleted issue");
        Ok(())
    }

    fn get(&self, id: IssueId) -> Result<Option<Issue>> {
        let sql = format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE id = ?");
        let mut stmt = self.conn.prepare(&sql)?;
        let issue = stmt.query_row([id], Self::issue_from_row).optional()?;
        Ok(issue)
    }

    fn get_by_ids(&self, ids: &[IssueId]) -> Result<Vec<Issue>> {
        let mut issues = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(SQLITE_VAR_LIMIT) {
            let placeholders = vec!["?"; chunk.len()].join(",");
            let sql = format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE id IN ({placeholders})");
            let mut stmt = self.conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(chunk), Self::issue_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            issues.extend(rows);
        }
        issues.sort_by_key(|issue| issue.id);
        issues.dedup_by_key(|issue| issue.id);
        Ok(issues)
    }

    fn query(&self, filter: &IssueFilter) -> Result<Vec<Issue>> {
        let mut sql = format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE 1=1");
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(status) = filter.status {
            sql.push_str(" AND status = ?");
            params.push(Box::new(status.as_str()));
        }

        if let Some(priority) = filter.priority {
            sql.push_str(" AND priority = ?");
            params.push(Box::new(priority.as_str()));
        }

        if let Some(ref assignee) = filter.assignee {
            sql.push_str(" AND assignee = ?");
            params.push(Box::new(assignee.clone()));
        }

        if let Some(ref search) = filter.search {
            let pattern = format!("%{}%", escape_like(search));
            sql.push_str(" AND (title LIKE ? ESCAPE '\\' OR description LIKE ? ESCAPE '\\')");
            params.push(Box::new(pattern.clone()));
            params.push(Box::new(pattern));
        }

        sql.push_str(" ORDER BY created_at DESC, id DESC");

        // SQLite only accepts OFFSET after LIMIT; -1 means unbounded.
        let limit = filter
            .limit
            .and_then(|l| i64::try_from(l).ok())
            .unwrap_or(-1);
        let _ = write!(sql, " LIMIT {limit}");
        if filter.offset > 0 {
            sql.push_str(" OFFSET ?");
            params.push(Box::new(i64::try_from(filter.offset).unwrap_or(i64::MAX)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(AsRef::as_ref).collect();
        let issues = stmt
            .query_map(params_refs.as_slice(), Self::issue_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(issues)
    }

    fn stats(&self) -> Result<IssueStats> {
        let mut stats = IssueStats::empty();

        let mut stmt = self
            .conn
            .prepare("SELECT status, COUNT(*) FROM issues GROUP BY status")?;
        let rows = stmt.query_map([], |row| {
            Ok((parse_column::<Status>(row, 0)?, row.get::<_, i64>(1)?))
        })?;
        for row in rows {
            let (status, count) = row?;
            stats.by_status.insert(status, to_count(count));
        }

        let mut stmt = self
            .conn
            .prepare("SELECT priority, COUNT(*) FROM issues GROUP BY priority")?;
        let rows = stmt.query_map([], |row| {
            Ok((parse_column::<Priority>(row, 0)?, row.get::<_, i64>(1)?))
        })?;
        for row in rows {
            let (priority, count) = row?;
            stats.by_priority.insert(priority, to_count(count));
        }

        let mut stmt = self.conn.prepare(
            "SELECT assignee, COUNT(*) FROM issues
             WHERE assignee IS NOT NULL AND assignee != ''
             GROUP BY assignee",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        for row in rows {
            let (assignee, count) = row?;
            stats.by_assignee.insert(assignee, to_count(count));
        }

        stats.unassigned = to_count(self.conn.query_row(
            "SELECT COUNT(*) FROM issues WHERE assignee IS NULL OR assignee = ''",
            [],
            |row| row.get::<_, i64>(0),
        )?);
        stats.total_issues = self.count_issues()?;

        Ok(stats)
    }
}

fn to_count(n: i64) -> usize {
    usize::try_from(n).unwrap_or(0)
}

fn empty_to_none(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.is_empty())
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Current time at the precision stored in the database.
fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width UTC timestamps so text ordering matches time ordering.
fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn datetime_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_datetime(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("invalid timestamp: {raw}").into(),
        )
    })
}

fn parse_column<T>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
impl SqliteStorage {
    /// Execute raw SQL for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the SQL execution fails.
    pub fn execute_test_sql(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }
}
