//! HTTP client for the sync and status endpoints.
//!
//! Bodies are fetched as text and parsed separately so transport,
//! HTTP-status and parse failures map to distinct error variants.

use crate::error::{SyncError, SyncResult};
use questline_types::{Capabilities, SyncCursor, SyncResponse};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Configuration for the sync engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Server base URL, e.g. `https://api.questline.app`.
    pub base_url: String,
    /// Path of the pull endpoint.
    pub sync_path: String,
    /// Path of the capability-probe endpoint.
    pub status_path: String,
    /// Path of the push-channel (SSE) endpoint.
    pub events_path: String,
    /// Per-request timeout for pulls and the probe (seconds).
    pub timeout_secs: u64,
    /// Interval of the timer-driven safety-net pull (seconds).
    pub poll_interval_secs: u64,
    /// Initial push-channel reconnect delay (seconds).
    pub reconnect_min_secs: u64,
    /// Push-channel reconnect delay cap (seconds).
    pub reconnect_max_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.questline.app".to_string(),
            sync_path: "/api/sync".to_string(),
            status_path: "/api/status".to_string(),
            events_path: "/api/events".to_string(),
            timeout_secs: 30,
            poll_interval_secs: 300,
            reconnect_min_secs: 1,
            reconnect_max_secs: 60,
        }
    }
}

/// Client for the pull endpoint and the capability probe.
pub struct SyncClient {
    config: SyncConfig,
    client: Client,
}

impl SyncClient {
    /// Creates a new sync client.
    pub fn new(config: SyncConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to create HTTP client");

        Self { config, client }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Issues a pull against the sync endpoint.
    ///
    /// Without a cursor this is the initial pull (full snapshot);
    /// with a cursor, a delta pull of changes since that point.
    pub async fn pull(&self, cursor: Option<&SyncCursor>) -> SyncResult<SyncResponse> {
        let url = format!("{}{}", self.config.base_url, self.config.sync_path);
        let mut request = self.client.get(&url);
        if let Some(cursor) = cursor {
            request = request.query(&[("lastSync", cursor.as_str())]);
        }
        debug!(url, delta = cursor.is_some(), "issuing pull");

        let response = request
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Protocol {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Queries the status endpoint for server capabilities.
    pub async fn probe(&self) -> SyncResult<Capabilities> {
        let url = format!("{}{}", self.config.base_url, self.config.status_path);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Protocol {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;
        Ok(serde_json::from_str(&body)?)
    }
}
