//! The sync coordinator.
//!
//! Owns the cursor and the status state machine, and is the only
//! caller of the store's reconciliation operations. At most one pull
//! is in flight at any time; signals arriving during a pull are
//! coalesced into a single follow-up pull once the current one
//! settles.

use crate::client::{SyncClient, SyncConfig};
use crate::error::{SyncError, SyncResult};
use crate::owner::CollectionOwner;
use questline_store::{CollectionStore, SyncStatus};
use questline_types::{Capabilities, SyncCursor, SyncResponse};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct CoordinatorState {
    /// Point up to which the client has synchronized. `None` until
    /// the first successful initial pull.
    cursor: Option<SyncCursor>,
    /// Whether a pull is currently in flight.
    in_flight: bool,
    /// A signal arrived while a pull was in flight; run one follow-up
    /// pull when it settles.
    pending: bool,
    /// Whether the one-shot capability probe has run.
    probed: bool,
}

/// Coordinates pulls against the sync endpoint and applies their
/// results to the store and the user directory.
pub struct SyncCoordinator {
    client: SyncClient,
    store: Arc<RwLock<CollectionStore>>,
    owner: Arc<dyn CollectionOwner>,
    state: Mutex<CoordinatorState>,
    capabilities: RwLock<Option<Capabilities>>,
    closed: AtomicBool,
}

impl SyncCoordinator {
    /// Creates a coordinator over a fresh, empty store.
    pub fn new(config: SyncConfig, owner: Arc<dyn CollectionOwner>) -> Self {
        Self::with_store(config, owner, Arc::new(RwLock::new(CollectionStore::new())))
    }

    /// Creates a coordinator over an existing store handle.
    pub fn with_store(
        config: SyncConfig,
        owner: Arc<dyn CollectionOwner>,
        store: Arc<RwLock<CollectionStore>>,
    ) -> Self {
        Self {
            client: SyncClient::new(config),
            store,
            owner,
            state: Mutex::new(CoordinatorState::default()),
            capabilities: RwLock::new(None),
            closed: AtomicBool::new(false),
        }
    }

    /// Returns a handle to the store. Everything outside the engine
    /// only reads it.
    pub fn store(&self) -> Arc<RwLock<CollectionStore>> {
        Arc::clone(&self.store)
    }

    /// Returns the currently held cursor.
    pub async fn cursor(&self) -> Option<SyncCursor> {
        self.state.lock().await.cursor.clone()
    }

    /// Returns the probed server capabilities, if the probe has
    /// succeeded.
    pub async fn capabilities(&self) -> Option<Capabilities> {
        self.capabilities.read().await.clone()
    }

    /// Marks the engine shut down. A pull resolving after this point
    /// is discarded without touching the store.
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Runs a pull, or schedules one if a pull is already in flight.
    ///
    /// This is the single entry point for every trigger: startup,
    /// push signals, timers and user actions. Without a held cursor
    /// it performs the initial pull; afterwards, delta pulls.
    pub async fn sync(&self) -> SyncResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(SyncError::Closed);
        }

        {
            let mut state = self.state.lock().await;
            if state.in_flight {
                debug!("pull in flight; scheduling follow-up");
                state.pending = true;
                return Ok(());
            }
            state.in_flight = true;
        }

        loop {
            let result = self.pull_once().await;

            let mut state = self.state.lock().await;
            if state.pending && !matches!(result, Err(SyncError::Closed)) {
                state.pending = false;
                drop(state);
                debug!("running coalesced follow-up pull");
                continue;
            }
            state.in_flight = false;
            return result;
        }
    }

    async fn pull_once(&self) -> SyncResult<()> {
        let cursor = self.state.lock().await.cursor.clone();
        let initial = cursor.is_none();

        self.store.write().await.status = SyncStatus::Syncing;

        let result = self.client.pull(cursor.as_ref()).await;

        if self.closed.load(Ordering::SeqCst) {
            debug!("engine shut down mid-pull; discarding result");
            return Err(SyncError::Closed);
        }

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                // The response never parsed, so the store was never
                // touched: previously rendered data stays intact.
                warn!(error = %err, "pull failed");
                self.store.write().await.status = SyncStatus::Error(err.to_string());
                return Err(err);
            }
        };

        self.apply(response, initial).await;

        if initial {
            self.probe_once().await;
        }

        Ok(())
    }

    async fn apply(&self, response: SyncResponse, initial: bool) {
        let SyncResponse {
            mut updates,
            mut removed,
            new_sync_timestamp,
        } = response;

        // Ownership partition: users never reach the store.
        let owned_entries = updates.split_owned();
        let owned_removals = removed
            .as_mut()
            .map(|r| r.split_owned())
            .unwrap_or_default();

        {
            let mut store = self.store.write().await;
            if initial {
                store.replace_all(updates);
                info!("initial pull applied; store loaded");
            } else {
                store.merge_upsert(updates);
                if let Some(removed) = &removed {
                    store.remove_by_ids(removed);
                }
                debug!("delta pull applied");
            }
            store.status = SyncStatus::Success;
        }

        if let Some(entries) = owned_entries {
            self.owner.absorb(entries).await;
        }
        if !owned_removals.is_empty() {
            self.owner.retire(&owned_removals).await;
        }
        if initial {
            self.owner.on_initial_sync().await;
        }

        self.advance_cursor(new_sync_timestamp).await;
    }

    /// Advances the cursor. It advances even for an empty delta (so
    /// an already-seen window is not re-requested) but never moves
    /// backward: a non-newer response cursor is an anomaly.
    async fn advance_cursor(&self, received: SyncCursor) {
        let mut state = self.state.lock().await;
        match &state.cursor {
            Some(held) if !received.is_newer_than(held) => {
                warn!(held = %held, received = %received, "response cursor is not newer; keeping held cursor");
            }
            _ => {
                debug!(cursor = %received, "cursor advanced");
                state.cursor = Some(received);
            }
        }
    }

    /// One-shot, best-effort capability probe after the first
    /// successful initial pull. Failure is logged and never retried,
    /// and never surfaces as a sync error.
    async fn probe_once(&self) {
        {
            let mut state = self.state.lock().await;
            if state.probed {
                return;
            }
            state.probed = true;
        }

        match self.client.probe().await {
            Ok(capabilities) => {
                info!(chat_enabled = capabilities.chat_enabled, "capability probe succeeded");
                *self.capabilities.write().await = Some(capabilities);
            }
            Err(err) => {
                warn!(error = %err, "capability probe failed; continuing without capabilities");
            }
        }
    }
}
