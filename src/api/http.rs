//! HTTP client abstraction so the fetchers can be exercised without a network.

use crate::error::{Result, TrackerError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET `url` and parse the body as JSON. Non-2xx statuses are errors.
    async fn get_json(&self, url: &str) -> Result<Value>;
}

pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    /// Client whose requests fail once `timeout` elapses.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("outbreak_tracker/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| TrackerError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get_json(&self, url: &str) -> Result<Value> {
        debug!("Sending request to {}", url);
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                TrackerError::Network(format!("request to {} timed out", url))
            } else {
                TrackerError::Network(format!("request to {} failed: {}", url, e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| {
                TrackerError::Network(format!("failed to read body from {}: {}", url, e))
            })?;

        serde_json::from_str(&body).map_err(|e| TrackerError::MalformedPayload {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
