//! Status interpretation
//!
//! Maps a validated work item onto the notification text for its verdict.

use serde_json::Value;

use crate::domain::{HomeworkStatus, WorkItem};
use crate::error::{Result, StatusError};

/// Field holding the work-item name
pub const NAME_FIELD: &str = "homework_name";

/// Field holding the review status code
pub const STATUS_FIELD: &str = "status";

/// Builds the notification text for a work item
///
/// Fails when either required field is absent or the status is not one of
/// the known codes.
pub fn interpret(item: &WorkItem) -> Result<String> {
    let name = item
        .get(NAME_FIELD)
        .ok_or(StatusError::MissingField(NAME_FIELD))?;
    let code = item
        .get(STATUS_FIELD)
        .ok_or(StatusError::MissingField(STATUS_FIELD))?;

    let status = match code {
        Value::String(code) => code
            .parse::<HomeworkStatus>()
            .map_err(|unknown| StatusError::UnknownStatus(unknown.0))?,
        other => return Err(StatusError::UnknownStatus(other.to_string())),
    };

    Ok(status_message(&display_name(name), status))
}

/// Formats the message announcing a new status
pub fn status_message(name: &str, status: HomeworkStatus) -> String {
    format!("Changed review status for \"{}\". {}", name, status.verdict())
}

// Names are normally strings; anything else is shown as its JSON text
fn display_name(name: &Value) -> String {
    match name {
        Value::String(name) => name.clone(),
        other => other.to_string(),
    }
}
