use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;

use crate::error::FetchError;

/// ZET (Zagreb) public GTFS-realtime feed
pub const DEFAULT_FEED_URL: &str = "https://www.zet.hr/gtfs-rt-protobuf";

/// Something that can hand over the raw bytes of one feed message
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> Result<Bytes, FetchError>;

    /// Where the bytes come from, for logging
    fn describe(&self) -> &str;
}

/// GTFS-RT client for an HTTP(S) feed endpoint
pub struct HttpFeedSource {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpFeedSource {
    /// Create a new client whose requests give up after `timeout`
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn transport_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    /// Fetch one feed message; any non-2xx status is an error
    async fn fetch(&self) -> Result<Bytes, FetchError> {
        tracing::debug!(url = %self.url, "Fetching vehicle positions");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        tracing::debug!(bytes = bytes.len(), "Received data from feed");
        Ok(bytes)
    }

    fn describe(&self) -> &str {
        &self.url
    }
}
