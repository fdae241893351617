//! Scheduler layer for the bot
//!
//! This layer drives the poll cycle: fetch the latest status, interpret it
//! and notify the chat when the outcome changes.

pub mod poller;

pub use poller::{CycleOutcome, PollState, StatusPoller};
