//! Status repository
//!
//! Fetches the raw review status payload from the status API.

use async_trait::async_trait;
use serde_json::Value;
use verdict_client::{Result, StatusApiClient};

/// Repository trait for fetching review statuses
#[async_trait]
pub trait StatusRepository: Send + Sync {
    /// Fetches statuses changed since `from_date`
    ///
    /// # Arguments
    /// * `from_date` - Lower bound of the fetch window, in epoch seconds
    ///
    /// # Returns
    /// The decoded, unvalidated response body
    async fn fetch_statuses(&self, from_date: i64) -> Result<Value>;
}

/// HTTP implementation of StatusRepository
pub struct HttpStatusRepository {
    client: StatusApiClient,
}

impl HttpStatusRepository {
    /// Creates a new HTTP status repository
    pub fn new(client: StatusApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatusRepository for HttpStatusRepository {
    async fn fetch_statuses(&self, from_date: i64) -> Result<Value> {
        self.client.fetch_statuses(from_date).await
    }
}
