//! Notification repository
//!
//! Delivers notification texts to the configured chat.

use async_trait::async_trait;
use verdict_client::{Result, TelegramClient};

/// Repository trait for delivering notifications
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Sends a text to the destination chat
    ///
    /// # Arguments
    /// * `text` - The message text
    async fn send_message(&self, text: &str) -> Result<()>;
}

/// Telegram implementation of NotificationRepository
pub struct TelegramNotificationRepository {
    client: TelegramClient,
    chat_id: String,
}

impl TelegramNotificationRepository {
    /// Creates a new Telegram notification repository
    ///
    /// # Arguments
    /// * `client` - Bot API client
    /// * `chat_id` - Chat that receives every message
    pub fn new(client: TelegramClient, chat_id: String) -> Self {
        Self { client, chat_id }
    }
}

#[async_trait]
impl NotificationRepository for TelegramNotificationRepository {
    async fn send_message(&self, text: &str) -> Result<()> {
        self.client.send_message(&self.chat_id, text).await
    }
}
