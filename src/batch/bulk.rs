//! Bulk mutation executor.
//!
//! Ids are deduplicated, then attempted one by one in ascending order. Each
//! id lands in exactly one of `succeeded` or `failed`.

use crate::error::{Result, TrackerError};
use crate::model::{BulkFailure, BulkResult, IssueId, PatchRequest};
use crate::storage::IssueStore;
use crate::validation::validate_patch;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Apply one patch to every id.
///
/// The patch is validated before any mutation.
///
/// # Errors
///
/// Returns `TrackerError::InvalidPatch` if the patch is empty or any of its
/// fields is invalid; in that case no issue is touched. Per-id failures are
/// reported in the result.
pub fn bulk_update<S>(store: &mut S, ids: &[IssueId], patch: &PatchRequest) -> Result<BulkResult>
where
    S: IssueStore + ?Sized,
{
    let patch = validate_patch(patch)?;
    let requested: BTreeSet<IssueId> = ids.iter().copied().collect();
    let mut result = BulkResult::new(requested.clone());

    for id in requested {
        match store.update(id, &patch) {
            Ok(_) => {
                debug!(id, "Bulk updated issue");
                result.succeeded.insert(id);
            }
            Err(err) => record_failure(&mut result, id, &err, "update"),
        }
    }

    info!(
        requested = result.requested_ids.len(),
        succeeded = result.succeeded.len(),
        failed = result.failed.len(),
        "Bulk update finished"
    );
    Ok(result)
}

/// Delete every id.
pub fn bulk_delete<S>(store: &mut S, ids: &[IssueId]) -> BulkResult
where
    S: IssueStore + ?Sized,
{
    let requested: BTreeSet<IssueId> = ids.iter().copied().collect();
    let mut result = BulkResult::new(requested.clone());

    for id in requested {
        match store.delete(id) {
            Ok(()) => {
                debug!(id, "Bulk deleted issue");
                result.succeeded.insert(id);
            }
            Err(err) => record_failure(&mut result, id, &err, "delete"),
        }
    }

    info!(
        requested = result.requested_ids.len(),
        succeeded = result.succeeded.len(),
        failed = result.failed.len(),
        "Bulk delete finished"
    );
    result
}

fn record_failure(result: &mut BulkResult, id: IssueId, err: &TrackerError, op: &str) {
    let failure = match err {
        TrackerError::IssueNotFound { .. } => {
            debug!(id, op, "Bulk target not found");
            BulkFailure::NotFound
        }
        other => {
            warn!(id, op, error = %other, "Store rejected bulk mutation");
            BulkFailure::StoreError
        }
    };
    result.failed.insert(id, failure);
}
