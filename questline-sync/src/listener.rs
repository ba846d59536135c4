//! Change notification listener.
//!
//! Holds one persistent SSE connection to the server for the life of
//! the process. The channel is signal-only: events carry no payload
//! and mean "re-run a delta pull now", so there is a single
//! reconciliation code path (pull-then-merge) regardless of trigger.
//! Transport errors are logged, never fatal; the listener reconnects
//! with a doubling backoff.

use crate::client::SyncConfig;
use crate::coordinator::SyncCoordinator;
use crate::error::{SyncError, SyncResult};
use futures::StreamExt;
use reqwest::Client;
use reqwest::header::ACCEPT;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Background task holding the push connection.
pub struct ChangeListener {
    task: Option<JoinHandle<()>>,
}

impl ChangeListener {
    /// Spawns the listener. Every received signal triggers a pull on
    /// the coordinator.
    pub fn spawn(config: SyncConfig, coordinator: Arc<SyncCoordinator>) -> Self {
        let task = tokio::spawn(run(config, coordinator));
        Self { task: Some(task) }
    }

    /// Closes the push connection and stops the listener.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for ChangeListener {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run(config: SyncConfig, coordinator: Arc<SyncCoordinator>) {
    // No overall request timeout: the event stream outlives any
    // single request window. Only the connect is bounded.
    let client = match Client::builder()
        .connect_timeout(Duration::from_secs(config.timeout_secs))
        .build()
    {
        Ok(client) => client,
        Err(err) => {
            warn!(error = %err, "failed to create push-channel client; listener disabled");
            return;
        }
    };

    let url = format!("{}{}", config.base_url, config.events_path);
    let min = Duration::from_secs(config.reconnect_min_secs.max(1));
    let max = Duration::from_secs(config.reconnect_max_secs.max(config.reconnect_min_secs));
    let mut backoff = min;

    loop {
        match listen_once(&client, &url, &coordinator, &mut backoff, min).await {
            Ok(()) => {
                info!("push channel closed by server; reconnecting");
            }
            Err(SyncError::Closed) => {
                debug!("engine shut down; stopping listener");
                return;
            }
            Err(err) => {
                warn!(error = %err, delay = ?backoff, "push channel error; reconnecting");
            }
        }

        tokio::time::sleep(backoff).await;
        backoff = (backoff * 2).min(max);
    }
}

/// Connects to the event stream and pumps signals until the stream
/// ends. Resets `backoff` once the connection is established.
async fn listen_once(
    client: &Client,
    url: &str,
    coordinator: &Arc<SyncCoordinator>,
    backoff: &mut Duration,
    min: Duration,
) -> SyncResult<()> {
    let response = client
        .get(url)
        .header(ACCEPT, "text/event-stream")
        .send()
        .await
        .map_err(|e| SyncError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SyncError::Protocol {
            status: status.as_u16(),
        });
    }

    info!(url, "push channel connected");
    *backoff = min;

    let mut stream = response.bytes_stream();
    let mut buffer = String::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| SyncError::Network(e.to_string()))?;
        buffer.push_str(&String::from_utf8_lossy(&chunk));

        while let Some(newline) = buffer.find('\n') {
            let line = buffer[..newline].trim_end_matches('\r').to_string();
            buffer.drain(..=newline);

            if is_signal(&line) {
                debug!("change signal received; triggering pull");
                match coordinator.sync().await {
                    Ok(()) => {}
                    Err(SyncError::Closed) => return Err(SyncError::Closed),
                    Err(err) => {
                        // The pull already moved the status to Error;
                        // the next signal retries.
                        warn!(error = %err, "pull triggered by push signal failed");
                    }
                }
            }
        }
    }

    Ok(())
}

/// Whether an SSE line carries a change signal. The channel delivers
/// a single event type with no payload, so any `data:` line counts;
/// comments (`:` keepalives) and field lines do not.
fn is_signal(line: &str) -> bool {
    line.starts_with("data:")
}
