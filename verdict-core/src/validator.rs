//! Response validation
//!
//! Checks the decoded status API payload against the documented shape and
//! extracts the most recent work item.

use serde_json::Value;
use tracing::debug;

use crate::domain::WorkItem;
use crate::error::{EmptySection, Result, ShapeViolation, StatusError};

/// Key holding the list of work items
pub const HOMEWORKS_KEY: &str = "homeworks";

/// Validates a raw payload and returns its first work item
///
/// The item is borrowed from `raw` unchanged. Each structural problem maps to
/// its own error so the failure notification says exactly what was wrong.
pub fn validate(raw: &Value) -> Result<&WorkItem> {
    let response = raw
        .as_object()
        .ok_or(StatusError::Shape(ShapeViolation::NotAMapping))?;

    let homeworks = response
        .get(HOMEWORKS_KEY)
        .ok_or(StatusError::Shape(ShapeViolation::MissingHomeworksKey))?
        .as_array()
        .ok_or(StatusError::Shape(ShapeViolation::HomeworksNotASequence))?;

    debug!("Status API returned {} work item(s)", homeworks.len());

    let first = homeworks
        .first()
        .ok_or(StatusError::EmptyResult(EmptySection::Homeworks))?;

    let item = first
        .as_object()
        .ok_or(StatusError::Shape(ShapeViolation::ItemNotAMapping))?;

    if item.is_empty() {
        return Err(StatusError::EmptyResult(EmptySection::WorkItem));
    }

    Ok(item)
}
