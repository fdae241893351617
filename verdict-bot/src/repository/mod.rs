//! Repository layer
//!
//! Repositories abstract the two external capabilities the poll loop
//! depends on: fetching raw statuses and delivering chat messages. They
//! carry no business logic.
//!
//! All repositories are trait-based so the poll loop can be tested with
//! in-memory fakes.

mod notifications;
mod statuses;

// Re-export traits
pub use notifications::NotificationRepository;
pub use statuses::StatusRepository;

// Re-export implementations
pub use notifications::TelegramNotificationRepository;
pub use statuses::HttpStatusRepository;
