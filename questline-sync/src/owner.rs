//! Ownership boundary for the users collection.
//!
//! Users are written by exactly one subsystem: the user directory.
//! The coordinator extracts user entries from every pull response and
//! forwards them here, so the generic reconciler and the directory
//! never race on the same records and directory-local invariants
//! (notably the identity of the active user) survive every sync.

use async_trait::async_trait;
use questline_types::UserRecord;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// The designated writer of an ownership-partitioned collection.
#[async_trait]
pub trait CollectionOwner: Send + Sync {
    /// Absorbs forwarded entries: merge into an existing record with
    /// the same id, insert otherwise.
    async fn absorb(&self, entries: Vec<UserRecord>);

    /// Drops entries removed on the server.
    async fn retire(&self, ids: &[String]);

    /// Invoked once, after the first successful initial pull.
    async fn on_initial_sync(&self);
}

/// Key-value persistence owned by the directory, read once at startup
/// to restore the last active user.
pub trait SelectionStore: Send + Sync {
    /// Returns the persisted id of the last active user, if any.
    fn load_last_active(&self) -> Option<String>;

    /// Persists the id of the currently active user.
    fn store_last_active(&self, id: &str);
}

#[derive(Debug, Default)]
struct DirectoryInner {
    users: Vec<UserRecord>,
    active_user_id: Option<String>,
}

/// In-memory user directory — the owning subsystem for users.
pub struct UserDirectory {
    inner: RwLock<DirectoryInner>,
    selection: Option<Arc<dyn SelectionStore>>,
}

impl UserDirectory {
    /// Creates an empty directory with no selection persistence.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(DirectoryInner::default()),
            selection: None,
        }
    }

    /// Creates a directory that restores and persists the active user
    /// through the given selection store.
    pub fn with_selection_store(selection: Arc<dyn SelectionStore>) -> Self {
        Self {
            inner: RwLock::new(DirectoryInner::default()),
            selection: Some(selection),
        }
    }

    /// Returns all known users, in insertion order.
    pub async fn users(&self) -> Vec<UserRecord> {
        self.inner.read().await.users.clone()
    }

    /// Returns the active user's id, if one is selected.
    pub async fn active_user_id(&self) -> Option<String> {
        self.inner.read().await.active_user_id.clone()
    }

    /// Selects the active user and persists the choice.
    pub async fn set_active(&self, id: &str) {
        let mut inner = self.inner.write().await;
        if !inner.users.iter().any(|u| u.id == id) {
            warn!(id, "cannot activate unknown user");
            return;
        }
        inner.active_user_id = Some(id.to_string());
        if let Some(selection) = &self.selection {
            selection.store_last_active(id);
        }
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CollectionOwner for UserDirectory {
    async fn absorb(&self, entries: Vec<UserRecord>) {
        if entries.is_empty() {
            return;
        }
        let mut inner = self.inner.write().await;
        for entry in entries {
            match inner.users.iter_mut().find(|u| u.id == entry.id) {
                Some(existing) => {
                    debug!(id = %entry.id, "updating existing user");
                    *existing = entry;
                }
                None => {
                    debug!(id = %entry.id, "inserting new user");
                    inner.users.push(entry);
                }
            }
        }
    }

    async fn retire(&self, ids: &[String]) {
        if ids.is_empty() {
            return;
        }
        let mut inner = self.inner.write().await;
        inner.users.retain(|u| !ids.contains(&u.id));
        // The active selection must always point at a present user.
        if let Some(active) = inner.active_user_id.clone()
            && !inner.users.iter().any(|u| u.id == active)
        {
            info!(id = %active, "active user removed on server; clearing selection");
            inner.active_user_id = None;
        }
    }

    async fn on_initial_sync(&self) {
        let Some(selection) = &self.selection else {
            return;
        };
        let Some(persisted) = selection.load_last_active() else {
            return;
        };

        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.id == persisted) {
            info!(id = %persisted, "restored last active user");
            inner.active_user_id = Some(persisted);
        } else {
            debug!(id = %persisted, "persisted active user no longer exists");
        }
    }
}
