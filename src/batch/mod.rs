//! Batch operations over an [`IssueStore`](crate::storage::IssueStore).
//!
//! - [`import`] - best-effort CSV import with per-row outcomes
//! - [`bulk`] - one patch or delete applied to a set of ids
//! - [`export`] - filtered CSV export
//!
//! None of these hold a transaction across items: each row or id is one
//! independent store call, and one item's failure never aborts the batch.
//! Store failures inside a batch are reported with the generic
//! [`STORE_ERROR`] message and logged at `warn` with the underlying cause.

pub mod bulk;
pub mod export;
pub mod import;

pub use bulk::{bulk_delete, bulk_update};
pub use export::{export_csv, export_csv_to};
pub use import::{ImportProgress, import_csv, import_csv_with_progress};

/// Message recorded for an item whose store call failed.
pub const STORE_ERROR: &str = "store error";
