//! Telegram Bot API client

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::{body_excerpt, build_http_client, execute};

/// HTTP client for the Telegram Bot API
#[derive(Debug, Clone)]
pub struct TelegramClient {
    /// Base URL of the Bot API (e.g., "https://api.telegram.org")
    api_url: String,
    /// Bot token
    token: String,
    /// HTTP client instance
    client: Client,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Envelope every Bot API reply is wrapped in
#[derive(Debug, Deserialize)]
struct BotApiReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramClient {
    /// Create a new Telegram client
    ///
    /// # Arguments
    /// * `api_url` - Base URL of the Bot API
    /// * `token` - Bot token issued by @BotFather
    /// * `timeout` - Per-request timeout
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let api_url = api_url.into();
        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.into(),
            client: build_http_client(timeout)?,
        })
    }

    /// Get the base URL of the Bot API
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Send a text message to a chat
    ///
    /// # Arguments
    /// * `chat_id` - Destination chat identifier
    /// * `text` - Message text
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        debug!("Sending message to chat {}", chat_id);

        let (status, body) = execute(self.request(chat_id, text)).await?;

        check_reply(status, &body)
    }

    fn request(&self, chat_id: &str, text: &str) -> RequestBuilder {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.token);
        self.client
            .post(url)
            .json(&SendMessageRequest { chat_id, text })
    }
}

/// Checks a Bot API reply, surfacing Telegram's `description` on failure
fn check_reply(status: StatusCode, body: &[u8]) -> Result<()> {
    let reply = serde_json::from_slice::<BotApiReply>(body);

    if !status.is_success() {
        let message = match reply {
            Ok(BotApiReply {
                description: Some(description),
                ..
            }) => description,
            _ => body_excerpt(body),
        };
        return Err(ClientError::api_error(status.as_u16(), message));
    }

    let reply = reply
        .map_err(|e| ClientError::ParseError(format!("Failed to parse Bot API reply: {}", e)))?;

    if !reply.ok {
        return Err(ClientError::Rejected(
            reply
                .description
                .unwrap_or_else(|| "no description".to_string()),
        ));
    }

    Ok(())
}
