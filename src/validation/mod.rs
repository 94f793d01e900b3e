//! Validation for import rows and patches.
//!
//! These routines are pure: they turn untyped input into typed values or a
//! structured `ValidationError` without touching storage. Rules are checked
//! in a fixed order and the first failure wins:
//!
//! 1. `title` present, non-empty, at most 200 characters
//! 2. `status`, when present, one of the lowercase status names
//! 3. `priority`, when present, one of the lowercase priority names
//! 4. `assignee` / `reporter`, when present, at most 100 characters
//!
//! Values are trimmed first, and a value that is empty after trimming counts
//! as absent. Lengths are counted in characters, not bytes.

use crate::error::{Result, TrackerError, ValidationError};
use crate::model::{
    IssueInput, IssuePatch, MAX_PERSON_LEN, MAX_TITLE_LEN, PatchRequest, Priority, Row, Status,
};

/// Trim a raw value, mapping blank to `None`.
fn clean(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn check_title(raw: Option<&str>) -> std::result::Result<String, ValidationError> {
    match clean(raw) {
        Some(title) if title.chars().count() <= MAX_TITLE_LEN => Ok(title.to_string()),
        _ => Err(ValidationError::TitleRequired),
    }
}

fn check_person(
    field: &'static str,
    raw: Option<&str>,
) -> std::result::Result<Option<String>, ValidationError> {
    match clean(raw) {
        Some(value) if value.chars().count() > MAX_PERSON_LEN => {
            Err(ValidationError::TooLong { field })
        }
        other => Ok(other.map(str::to_string)),
    }
}

/// Validate one decoded row into a creation payload.
///
/// Unknown columns are ignored. Absent `status` and `priority` take their
/// defaults (`open`, `medium`).
///
/// # Errors
///
/// Returns the first `ValidationError` encountered, in rule order.
pub fn validate_row(row: &Row) -> std::result::Result<IssueInput, ValidationError> {
    let field = |name: &str| row.get(name).map(String::as_str);

    let title = check_title(field("title"))?;

    let status = match clean(field("status")) {
        Some(raw) => raw.parse::<Status>()?,
        None => Status::default(),
    };

    let priority = match clean(field("priority")) {
        Some(raw) => raw.parse::<Priority>()?,
        None => Priority::default(),
    };

    let assignee = check_person("assignee", field("assignee"))?;
    let reporter = check_person("reporter", field("reporter"))?;

    Ok(IssueInput {
        title,
        description: clean(field("description")).map(str::to_string),
        status,
        priority,
        assignee,
        reporter,
    })
}

/// Validate an untyped patch, applying the row rules to every present field.
///
/// Nullable fields set to a blank value are cleared. Status and priority
/// cannot be cleared, so a blank value for either is invalid.
///
/// # Errors
///
/// Returns `TrackerError::InvalidPatch` if the patch carries no fields or any
/// present field fails validation. Nothing is partially accepted.
pub fn validate_patch(request: &PatchRequest) -> Result<IssuePatch> {
    if request.is_empty() {
        return Err(TrackerError::invalid_patch("patch has no fields"));
    }

    build_patch(request).map_err(TrackerError::invalid_patch_field)
}

fn build_patch(request: &PatchRequest) -> std::result::Result<IssuePatch, ValidationError> {
    let title = request
        .title
        .as_deref()
        .map(|raw| check_title(Some(raw)))
        .transpose()?;

    let status = request
        .status
        .as_deref()
        .map(|raw| raw.trim().parse::<Status>())
        .transpose()?;

    let priority = request
        .priority
        .as_deref()
        .map(|raw| raw.trim().parse::<Priority>())
        .transpose()?;

    let assignee = request
        .assignee
        .as_ref()
        .map(|raw| check_person("assignee", raw.as_deref()))
        .transpose()?;

    let reporter = request
        .reporter
        .as_ref()
        .map(|raw| check_person("reporter", raw.as_deref()))
        .transpose()?;

    let description = request
        .description
        .as_ref()
        .map(|raw| clean(raw.as_deref()).map(str::to_string));

    Ok(IssuePatch {
        title,
        description,
        status,
        priority,
        assignee,
        reporter,
    })
}
