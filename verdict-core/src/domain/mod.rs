//! Core domain types
//!
//! Shared between the poll loop (which interprets them) and the clients
//! (which only move raw payloads around).

pub mod homework;

pub use homework::{HomeworkStatus, WorkItem};
