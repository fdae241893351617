//! Status poller
//!
//! Polls the status API on a fixed cadence and forwards every change of the
//! interpreted status to the chat. Failures inside a cycle are reported to
//! the chat as well; only the process owner can stop the loop.

use std::future::Future;
use std::sync::Arc;
use tokio::time::{self, Duration};
use tracing::{debug, error, info, warn};
use verdict_core::{NotificationGate, StatusError, interpret, validate};

use crate::repository::{NotificationRepository, StatusRepository};

/// State carried from one poll cycle to the next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    /// Lower bound of every fetch window, in epoch seconds. Never advanced.
    pub cursor: i64,

    /// Last notified message
    pub gate: NotificationGate,
}

impl PollState {
    /// Creates state with an explicit cursor
    pub fn new(cursor: i64) -> Self {
        Self {
            cursor,
            gate: NotificationGate::new(),
        }
    }

    /// Creates state whose cursor lies `lookback` before the current time
    pub fn starting_now(lookback: Duration) -> Self {
        let lookback = i64::try_from(lookback.as_secs()).unwrap_or(i64::MAX);
        Self::new(chrono::Utc::now().timestamp().saturating_sub(lookback))
    }
}

/// Result of a single poll cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleOutcome {
    /// Candidate notification produced by the cycle
    pub message: String,

    /// Whether a send was attempted for the candidate
    pub notified: bool,
}

/// Poller that checks the review status and notifies on change
pub struct StatusPoller {
    statuses: Arc<dyn StatusRepository>,
    notifier: Arc<dyn NotificationRepository>,
    poll_interval: Duration,
}

impl StatusPoller {
    /// Creates a new status poller
    ///
    /// # Arguments
    /// * `statuses` - Source of raw status payloads
    /// * `notifier` - Destination for notifications
    /// * `poll_interval` - Pause after each cycle
    pub fn new(
        statuses: Arc<dyn StatusRepository>,
        notifier: Arc<dyn NotificationRepository>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            statuses,
            notifier,
            poll_interval,
        }
    }

    /// Runs poll cycles until `shutdown` completes
    ///
    /// Shutdown is only observed between cycles, so a cycle in flight
    /// always finishes its notification step.
    pub async fn run<F>(&self, state: &mut PollState, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!(
            "Starting status poller (interval: {:?}, from_date: {})",
            self.poll_interval, state.cursor
        );

        tokio::pin!(shutdown);

        loop {
            let outcome = self.poll_once(state).await;
            if !outcome.notified {
                debug!("No new statuses");
            }

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping status poller");
                    break;
                }
                _ = time::sleep(self.poll_interval) => {}
            }
        }
    }

    /// Performs a single poll cycle
    ///
    /// Never fails: a failing fetch or an invalid payload becomes the
    /// cycle's candidate message.
    pub async fn poll_once(&self, state: &mut PollState) -> CycleOutcome {
        let message = match self.check_status(state.cursor).await {
            Ok(message) => message,
            Err(e) => failure_message(&e),
        };

        let notified = self.notify(&mut state.gate, &message).await;

        CycleOutcome { message, notified }
    }

    /// Fetches, validates and interprets the current status
    async fn check_status(&self, cursor: i64) -> Result<String, StatusError> {
        debug!("Polling status API (from_date: {})", cursor);

        let raw = self.statuses.fetch_statuses(cursor).await?;
        let item = validate(&raw)?;
        interpret(item)
    }

    /// Sends `message` unless it repeats the last notification
    ///
    /// The gate is updated once the send was attempted, even if it failed,
    /// so a lost message is not retried on the next cycle.
    async fn notify(&self, gate: &mut NotificationGate, message: &str) -> bool {
        if !gate.should_send(message) {
            return false;
        }

        debug!("Sending message \"{}\"", message);
        match self.notifier.send_message(message).await {
            Ok(()) => info!("Message sent: \"{}\"", message),
            Err(e) => error!("Failed to send message: {:#}", e),
        }

        gate.record(message);
        true
    }
}

/// Builds the chat message reporting a failed cycle
fn failure_message(err: &StatusError) -> String {
    match err {
        StatusError::EmptyResult(_) => warn!("Status API returned no data: {}", err),
        StatusError::Transport {
            status: Some(status),
            ..
        } => error!("Status API answered with status {}: {}", status, err),
        StatusError::Transport { status: None, .. } => {
            error!("Status API unreachable: {}", err)
        }
        StatusError::Shape(_) | StatusError::MissingField(_) | StatusError::UnknownStatus(_) => {
            error!("Invalid status response: {}", err)
        }
        // Raised only by startup checks, never by a cycle
        StatusError::Configuration { .. } => {
            error!("Unexpected configuration error inside a poll cycle: {}", err)
        }
    }

    format!("Program failure: {}", err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::Mutex;
    use verdict_client::ClientError;

    /// Scripted reply of the fake status API
    #[derive(Clone)]
    enum Reply {
        Body(Value),
        Status(u16),
    }

    /// Plays back replies in order, repeating the last one when exhausted
    struct ScriptedStatuses {
        replies: Vec<Reply>,
        cursors: Mutex<Vec<i64>>,
    }

    impl ScriptedStatuses {
        fn new(replies: Vec<Reply>) -> Arc<Self> {
            Arc::new(Self {
                replies,
                cursors: Mutex::new(Vec::new()),
            })
        }

        fn cursors(&self) -> Vec<i64> {
            self.cursors.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl StatusRepository for ScriptedStatuses {
        async fn fetch_statuses(&self, from_date: i64) -> verdict_client::Result<Value> {
            let mut cursors = self.cursors.lock().unwrap();
            let index = cursors.len().min(self.replies.len() - 1);
            cursors.push(from_date);

            match self.replies[index].clone() {
                Reply::Body(body) => Ok(body),
                Reply::Status(status) => Err(ClientError::api_error(status, "unavailable")),
            }
        }
    }

    /// Records every attempted send
    struct RecordingNotifier {
        attempts: Mutex<Vec<String>>,
        fail: bool,
    }

    impl RecordingNotifier {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                attempts: Mutex::new(Vec::new()),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                attempts: Mutex::new(Vec::new()),
                fail: true,
            })
        }

        fn attempts(&self) -> Vec<String> {
            self.attempts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationRepository for RecordingNotifier {
        async fn send_message(&self, text: &str) -> verdict_client::Result<()> {
            self.attempts.lock().unwrap().push(text.to_string());
            if self.fail {
                return Err(ClientError::Rejected("chat not found".to_string()));
            }
            Ok(())
        }
    }

    fn homework(name: &str, status: &str) -> Reply {
        Reply::Body(json!({
            "homeworks": [{"homework_name": name, "status": status}],
            "current_date": 1_700_000_000
        }))
    }

    fn poller(
        statuses: &Arc<ScriptedStatuses>,
        notifier: &Arc<RecordingNotifier>,
    ) -> StatusPoller {
        StatusPoller::new(
            statuses.clone(),
            notifier.clone(),
            Duration::from_secs(600),
        )
    }

    #[tokio::test]
    async fn test_approved_status_is_sent() {
        let statuses = ScriptedStatuses::new(vec![homework("hw1", "approved")]);
        let notifier = RecordingNotifier::new();
        let mut state = PollState::new(1_000);

        let outcome = poller(&statuses, &notifier).poll_once(&mut state).await;

        let expected =
            "Changed review status for \"hw1\". Работа проверена: ревьюеру всё понравилось. Ура!";
        assert_eq!(
            outcome,
            CycleOutcome {
                message: expected.to_string(),
                notified: true,
            }
        );
        assert_eq!(notifier.attempts(), vec![expected.to_string()]);
        assert_eq!(state.gate.last_sent(), expected);
    }

    #[tokio::test]
    async fn test_empty_result_is_reported_once() {
        let statuses = ScriptedStatuses::new(vec![Reply::Body(json!({"homeworks": []}))]);
        let notifier = RecordingNotifier::new();
        let poller = poller(&statuses, &notifier);
        let mut state = PollState::new(1_000);

        let first = poller.poll_once(&mut state).await;
        let second = poller.poll_once(&mut state).await;

        assert_eq!(
            first.message,
            "Program failure: empty result: homeworks list is empty"
        );
        assert!(first.notified);
        assert_eq!(second.message, first.message);
        assert!(!second.notified);
        assert_eq!(notifier.attempts().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported_and_loop_continues() {
        let statuses =
            ScriptedStatuses::new(vec![Reply::Status(503), homework("hw1", "reviewing")]);
        let notifier = RecordingNotifier::new();
        let poller = poller(&statuses, &notifier);
        let mut state = PollState::new(1_000);

        let failed = poller.poll_once(&mut state).await;
        assert_eq!(
            failed.message,
            "Program failure: status API unavailable: API error (status 503): unavailable"
        );
        assert!(failed.notified);

        let recovered = poller.poll_once(&mut state).await;
        assert!(recovered.notified);
        assert_eq!(
            notifier.attempts(),
            vec![
                failed.message,
                "Changed review status for \"hw1\". Работа взята на проверку ревьюером."
                    .to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_payloads_are_reported() {
        let cases = [
            (json!([1, 2]), "unexpected response shape: not a mapping"),
            (json!({"homework": []}), "unexpected response shape: missing homeworks key"),
            (
                json!({"homeworks": [{"homework_name": "hw1"}]}),
                "work item has no `status` field",
            ),
            (
                json!({"homeworks": [{"homework_name": "hw1", "status": "lost"}]}),
                "unknown review status `lost`",
            ),
        ];

        for (body, detail) in cases {
            let statuses = ScriptedStatuses::new(vec![Reply::Body(body)]);
            let notifier = RecordingNotifier::new();
            let mut state = PollState::new(1_000);

            let outcome = poller(&statuses, &notifier).poll_once(&mut state).await;
            assert_eq!(outcome.message, format!("Program failure: {}", detail));
            assert_eq!(notifier.attempts(), vec![outcome.message]);
        }
    }

    #[tokio::test]
    async fn test_only_changes_are_sent() {
        let statuses = ScriptedStatuses::new(vec![
            homework("hw1", "reviewing"),
            homework("hw1", "reviewing"),
            homework("hw1", "rejected"),
            homework("hw1", "rejected"),
            homework("hw1", "rejected"),
            homework("hw1", "approved"),
        ]);
        let notifier = RecordingNotifier::new();
        let poller = poller(&statuses, &notifier);
        let mut state = PollState::new(1_000);

        let mut notified = Vec::new();
        for _ in 0..6 {
            notified.push(poller.poll_once(&mut state).await.notified);
        }

        assert_eq!(notified, vec![true, false, true, false, false, true]);
        assert_eq!(notifier.attempts().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_send_is_not_retried() {
        let statuses = ScriptedStatuses::new(vec![homework("hw1", "approved")]);
        let notifier = RecordingNotifier::failing();
        let poller = poller(&statuses, &notifier);
        let mut state = PollState::new(1_000);

        let first = poller.poll_once(&mut state).await;
        let second = poller.poll_once(&mut state).await;

        assert!(first.notified);
        assert!(!second.notified);
        assert_eq!(notifier.attempts().len(), 1);
        assert_eq!(state.gate.last_sent(), first.message);
    }

    #[tokio::test]
    async fn test_cursor_is_never_advanced() {
        let statuses = ScriptedStatuses::new(vec![
            homework("hw1", "reviewing"),
            Reply::Status(500),
            homework("hw1", "approved"),
        ]);
        let notifier = RecordingNotifier::new();
        let poller = poller(&statuses, &notifier);
        let mut state = PollState::new(1_234);

        for _ in 0..3 {
            poller.poll_once(&mut state).await;
        }

        assert_eq!(statuses.cursors(), vec![1_234, 1_234, 1_234]);
        assert_eq!(state.cursor, 1_234);
    }

    #[test]
    fn test_failure_message_covers_configuration() {
        let err = StatusError::Configuration {
            missing: vec!["TELEGRAM_TOKEN".to_string()],
        };
        assert_eq!(
            failure_message(&err),
            "Program failure: missing required configuration: TELEGRAM_TOKEN"
        );
    }

    #[test]
    fn test_state_starts_before_now() {
        let lookback = Duration::from_secs(2_592_000);
        let now = chrono::Utc::now().timestamp();
        let state = PollState::starting_now(lookback);

        let expected = now - 2_592_000;
        assert!((state.cursor - expected).abs() <= 1);
        assert_eq!(state.gate.last_sent(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_between_cycles_on_shutdown() {
        let statuses = ScriptedStatuses::new(vec![homework("hw1", "reviewing")]);
        let notifier = RecordingNotifier::new();
        let poller = poller(&statuses, &notifier);
        let mut state = PollState::new(1_000);

        // Cycles run at 0s, 600s and 1200s; shutdown fires at 1500s
        poller
            .run(&mut state, time::sleep(Duration::from_secs(1_500)))
            .await;

        assert_eq!(statuses.cursors().len(), 3);
        assert_eq!(notifier.attempts().len(), 1);
    }
}
