//! Error types for status checking

use thiserror::Error;

/// Result type alias for status checking operations
pub type Result<T> = std::result::Result<T, StatusError>;

/// Errors that can occur while checking the review status
///
/// Only `Configuration` is fatal. Every other variant is reported to the
/// chat by the poll loop and the loop carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    /// Required configuration values are absent
    #[error("missing required configuration: {}", .missing.join(", "))]
    Configuration {
        /// Names of the absent values
        missing: Vec<String>,
    },

    /// The status API could not be reached or answered with a non-2xx status
    #[error("status API unavailable: {message}")]
    Transport {
        /// HTTP status code, when a response was received
        status: Option<u16>,
        /// Transport-level description
        message: String,
    },

    /// The payload does not have the expected structure
    #[error("unexpected response shape: {0}")]
    Shape(ShapeViolation),

    /// The payload is well-formed but carries no data
    #[error("empty result: {0}")]
    EmptyResult(EmptySection),

    /// A required work-item field is absent
    #[error("work item has no `{0}` field")]
    MissingField(&'static str),

    /// The work item carries a status outside the known set
    #[error("unknown review status `{0}`")]
    UnknownStatus(String),
}

/// Structural problems in the status API payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShapeViolation {
    #[error("not a mapping")]
    NotAMapping,

    #[error("missing homeworks key")]
    MissingHomeworksKey,

    #[error("homeworks not a sequence")]
    HomeworksNotASequence,

    #[error("item not a mapping")]
    ItemNotAMapping,
}

/// Part of the payload that turned out to be empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EmptySection {
    #[error("homeworks list is empty")]
    Homeworks,

    #[error("work item has no data")]
    WorkItem,
}
