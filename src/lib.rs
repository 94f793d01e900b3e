//! Issue tracker core: CSV import/export and best-effort bulk mutations.
//!
//! The crate is organised leaf first:
//! - [`model`] - `Issue` and the batch report types
//! - [`validation`] - row and patch validation
//! - [`format`] - CSV codec and plain-text rendering
//! - [`storage`] - the `IssueStore` record-store contract and its `SQLite` backend
//! - [`batch`] - import pipeline, bulk mutation executor, export
//! - [`config`], [`logging`], [`cli`] - the ambient stack behind the `itr` binary

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod model;
pub mod storage;
pub mod util;
pub mod validation;

pub use error::{ErrorCode, Result, StructuredError, TrackerError, ValidationError};
