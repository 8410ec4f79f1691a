// Range query seam for the append-only sample log
//
// The `RangeQuery` trait lets the sync client run against the real HTTP
// service in production and a scripted in-memory implementation in tests.

use crate::sync::types::{Channel, Sample, SyncError, SyncResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Request timeout for the range query service. A hung connection
/// degrades to a retryable `Transport` error instead of stalling a tick
/// indefinitely.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// One page of a range query response.
///
/// Points are ordered ascending by id with `id > since_id`; `last_id` is
/// the maximum id present. Callers must not advance their cursor when
/// `points` is empty (some servers echo `since_id` there, others omit the
/// field entirely).
#[derive(Debug, Clone, Deserialize)]
pub struct LivePage {
    pub points: Vec<Sample>,
    #[serde(default)]
    pub last_id: Option<i64>,
}

/// "Give me up to `limit` samples for `channel` with id greater than
/// `since_id`, ascending."
#[async_trait]
pub trait RangeQuery: Send + Sync {
    async fn fetch(&self, channel: Channel, since_id: i64, limit: usize) -> SyncResult<LivePage>;
}

/// HTTP implementation against the sample log backend's `/live` route
pub struct HttpRangeQuery {
    client: Client,
    base_url: String,
}

impl HttpRangeQuery {
    pub fn new(base_url: impl Into<String>) -> SyncResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| SyncError::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RangeQuery for HttpRangeQuery {
    async fn fetch(&self, channel: Channel, since_id: i64, limit: usize) -> SyncResult<LivePage> {
        let url = format!("{}/live", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("channel", channel.as_str().to_string()),
                ("since_id", since_id.to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Server(format!("{} returned {}", url, status)));
        }

        response
            .json::<LivePage>()
            .await
            .map_err(|e| SyncError::Protocol(format!("invalid /live response: {}", e)))
    }
}
