//! Notification gate
//!
//! Suppresses a notification when its text is identical to the one sent
//! (or attempted) on the previous decision.

/// Remembers the last notified message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationGate {
    last_sent: String,
}

impl NotificationGate {
    /// Creates a gate that has not notified anything yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when `candidate` differs from the last notified text
    ///
    /// Comparison is exact string equality.
    pub fn should_send(&self, candidate: &str) -> bool {
        self.last_sent != candidate
    }

    /// Records `candidate` as the last notified text
    ///
    /// Called once a send has been attempted, whether or not it succeeded.
    pub fn record(&mut self, candidate: impl Into<String>) {
        self.last_sent = candidate.into();
    }

    /// The last notified text, empty before the first notification
    pub fn last_sent(&self) -> &str {
        &self.last_sent
    }
}
