//! Verdict HTTP Clients
//!
//! Typed HTTP clients for the two services the bot talks to:
//! - The homework status API, polled for the latest review status
//! - The Telegram Bot API, used to deliver notifications
//!
//! Both clients are built with an explicit request timeout and share one
//! error type.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use verdict_client::{StatusApiClient, TelegramClient};
//!
//! # async fn example() -> verdict_client::Result<()> {
//! let timeout = Duration::from_secs(30);
//! let statuses = StatusApiClient::new(
//!     "https://practicum.yandex.ru/api/user_api/homework_statuses/",
//!     "practicum-token",
//!     timeout,
//! )?;
//! let telegram = TelegramClient::new("https://api.telegram.org", "bot-token", timeout)?;
//!
//! let raw = statuses.fetch_statuses(1_700_000_000).await?;
//! telegram.send_message("123456", &raw.to_string()).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
mod statuses;
mod telegram;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use statuses::StatusApiClient;
pub use telegram::TelegramClient;

use reqwest::Client;
use std::time::Duration;

/// Builds the underlying HTTP client with a request timeout
fn build_http_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(client)
}

/// Longest response body excerpt carried in an error message
const MAX_BODY_EXCERPT: usize = 300;

/// Sends a request and reads the full body, keeping the status code
///
/// Request URLs may embed credentials, so they are stripped from any
/// transport error.
async fn execute(request: reqwest::RequestBuilder) -> Result<(reqwest::StatusCode, Vec<u8>)> {
    let response = request
        .send()
        .await
        .map_err(|e| ClientError::RequestFailed(e.without_url()))?;
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| ClientError::RequestFailed(e.without_url()))?;
    Ok((status, body.to_vec()))
}

/// Renders a response body for an error message, capped at `MAX_BODY_EXCERPT` chars
fn body_excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    match text.char_indices().nth(MAX_BODY_EXCERPT) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_excerpt_keeps_short_bodies() {
        assert_eq!(body_excerpt(b"  Bad Gateway\n"), "Bad Gateway");
    }

    #[test]
    fn test_body_excerpt_truncates_on_char_boundary() {
        let body = "ж".repeat(MAX_BODY_EXCERPT + 50);
        let excerpt = body_excerpt(body.as_bytes());
        assert_eq!(excerpt.chars().count(), MAX_BODY_EXCERPT + 3);
        assert!(excerpt.ends_with("..."));
    }
}
