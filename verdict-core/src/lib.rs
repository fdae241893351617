//! Verdict Core
//!
//! Core types and pure logic for the review status bot.
//!
//! This crate contains:
//! - Domain types: review status codes, verdict texts and work items
//! - Validation: structural checks on the raw status API payload
//! - Interpretation: turning a work item into a notification text
//! - Gate: suppression of repeated notifications

pub mod domain;
pub mod error;
pub mod gate;
pub mod interpreter;
pub mod validator;

pub use error::{EmptySection, ShapeViolation, StatusError};
pub use gate::NotificationGate;
pub use interpreter::interpret;
pub use validator::validate;
