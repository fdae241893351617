//! Homework status API client

use reqwest::{Client, RequestBuilder, StatusCode, header};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::{body_excerpt, build_http_client, execute};

/// HTTP client for the homework status API
#[derive(Debug, Clone)]
pub struct StatusApiClient {
    /// Endpoint URL (e.g., "https://practicum.yandex.ru/api/user_api/homework_statuses/")
    endpoint: String,
    /// OAuth token sent with every request
    token: String,
    /// HTTP client instance
    client: Client,
}

impl StatusApiClient {
    /// Create a new status API client
    ///
    /// # Arguments
    /// * `endpoint` - The status endpoint URL
    /// * `token` - OAuth token for the `Authorization` header
    /// * `timeout` - Per-request timeout
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            endpoint: endpoint.into(),
            token: token.into(),
            client: build_http_client(timeout)?,
        })
    }

    /// Fetch review statuses changed since `from_date`
    ///
    /// # Arguments
    /// * `from_date` - Lower bound of the fetch window, in epoch seconds
    ///
    /// # Returns
    /// The decoded JSON body, unvalidated
    pub async fn fetch_statuses(&self, from_date: i64) -> Result<Value> {
        debug!("Requesting statuses from {} (from_date={})", self.endpoint, from_date);

        let (status, body) = execute(self.request(from_date)).await?;

        decode_statuses(status, &body)
    }

    fn request(&self, from_date: i64) -> RequestBuilder {
        self.client
            .get(&self.endpoint)
            .header(header::AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
    }
}

/// Decodes a status API reply; anything but 200 is an error
fn decode_statuses(status: StatusCode, body: &[u8]) -> Result<Value> {
    if status != StatusCode::OK {
        let mut message = body_excerpt(body);
        if message.is_empty() {
            message = status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string();
        }
        return Err(ClientError::api_error(status.as_u16(), message));
    }

    serde_json::from_slice(body)
        .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
}
