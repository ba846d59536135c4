//! Periodic sync trigger.
//!
//! Push signals cover the common case; the timer is the safety net
//! that reconciles after missed signals or long disconnects. Both
//! feed the same coordinator entry point, so overlapping triggers
//! coalesce there.

use crate::client::SyncConfig;
use crate::coordinator::SyncCoordinator;
use crate::error::SyncError;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// Background task running a pull on a fixed interval.
pub struct SyncScheduler {
    task: Option<JoinHandle<()>>,
}

impl SyncScheduler {
    /// Spawns the scheduler.
    pub fn spawn(config: &SyncConfig, coordinator: Arc<SyncCoordinator>) -> Self {
        let period = Duration::from_secs(config.poll_interval_secs.max(1));
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of a tokio interval fires immediately;
            // skip it so the schedule starts one period from now.
            interval.tick().await;

            loop {
                interval.tick().await;
                match coordinator.sync().await {
                    Ok(()) => {}
                    Err(SyncError::Closed) => {
                        debug!("engine shut down; stopping scheduler");
                        return;
                    }
                    Err(err) => {
                        // Status already reflects the failure; the
                        // next tick retries.
                        warn!(error = %err, "scheduled pull failed");
                    }
                }
            }
        });
        Self { task: Some(task) }
    }

    /// Stops the scheduler.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
