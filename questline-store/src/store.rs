//! The collection store.
//!
//! Aggregate of every server-owned collection the client renders,
//! the settings singleton, the loaded flag, the sync status and the
//! derived tag index. Users are deliberately absent: that collection
//! is ownership-partitioned to the user directory, and the store
//! never holds a copy it writes to.

use crate::index::rebuild_tag_index;
use crate::reconcile;
use questline_types::{
    ChatMessage, MarketItem, Notification, Quest, RemovedIds, Settings, SyncUpdates, Trophy,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

/// Synchronization status, as rendered by the status indicator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncStatus {
    /// No pull has run yet.
    #[default]
    Idle,
    /// A pull is in flight.
    Syncing,
    /// The last pull applied cleanly.
    Success,
    /// The last pull failed; previously loaded data stays rendered.
    Error(String),
}

impl SyncStatus {
    /// Whether a pull is currently in flight.
    #[must_use]
    pub fn is_syncing(&self) -> bool {
        matches!(self, SyncStatus::Syncing)
    }
}

/// In-memory aggregate of all synchronized collections.
///
/// Mutated only through [`replace_all`](CollectionStore::replace_all),
/// [`merge_upsert`](CollectionStore::merge_upsert) and
/// [`remove_by_ids`](CollectionStore::remove_by_ids), each of which
/// ends by rebuilding the derived index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionStore {
    pub quests: Vec<Quest>,
    pub markets: Vec<MarketItem>,
    pub trophies: Vec<Trophy>,
    pub notifications: Vec<Notification>,
    pub chat_messages: Vec<ChatMessage>,
    pub settings: Settings,
    /// True once the initial pull has populated the store.
    pub loaded: bool,
    pub status: SyncStatus,
    /// Derived: deduplicated quest tags. Never mutated directly.
    pub tag_index: BTreeSet<String>,
}

impl CollectionStore {
    /// Creates an empty, not-yet-loaded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every collection present in the full snapshot and
    /// marks the store loaded. Initial pull only — a partial payload
    /// must go through [`merge_upsert`](Self::merge_upsert) instead.
    pub fn replace_all(&mut self, mut snapshot: SyncUpdates) {
        self.reject_owned(&mut snapshot);

        if let Some(quests) = snapshot.quests {
            self.quests = quests;
        }
        if let Some(markets) = snapshot.markets {
            self.markets = markets;
        }
        if let Some(trophies) = snapshot.trophies {
            self.trophies = trophies;
        }
        if let Some(notifications) = snapshot.notifications {
            self.notifications = notifications;
        }
        if let Some(chat_messages) = snapshot.chat_messages {
            self.chat_messages = chat_messages;
        }
        if let Some(patch) = snapshot.settings {
            let mut settings = Settings::default();
            settings.apply(&patch);
            self.settings = settings;
        }

        self.loaded = true;
        self.rebuild_indexes();
    }

    /// Overlays a delta onto the store: upsert by id for collections,
    /// shallow field merge for settings. Applying the same delta twice
    /// yields the same store as applying it once.
    pub fn merge_upsert(&mut self, mut delta: SyncUpdates) {
        self.reject_owned(&mut delta);

        if let Some(quests) = delta.quests {
            reconcile::merge_collection(&mut self.quests, quests);
        }
        if let Some(markets) = delta.markets {
            reconcile::merge_collection(&mut self.markets, markets);
        }
        if let Some(trophies) = delta.trophies {
            reconcile::merge_collection(&mut self.trophies, trophies);
        }
        if let Some(notifications) = delta.notifications {
            reconcile::merge_collection(&mut self.notifications, notifications);
        }
        if let Some(chat_messages) = delta.chat_messages {
            reconcile::merge_collection(&mut self.chat_messages, chat_messages);
        }
        if let Some(patch) = delta.settings {
            self.settings.apply(&patch);
        }

        self.rebuild_indexes();
    }

    /// Drops every record whose id appears in the removal sets.
    /// User removals are ignored here; the coordinator routes them to
    /// the owning directory.
    pub fn remove_by_ids(&mut self, removed: &RemovedIds) {
        if !removed.users.is_empty() {
            warn!(
                count = removed.users.len(),
                "user removals reached the store; routing belongs to the user directory"
            );
        }

        reconcile::remove_by_ids(&mut self.quests, &removed.quests);
        reconcile::remove_by_ids(&mut self.markets, &removed.markets);
        reconcile::remove_by_ids(&mut self.trophies, &removed.trophies);
        reconcile::remove_by_ids(&mut self.notifications, &removed.notifications);
        reconcile::remove_by_ids(&mut self.chat_messages, &removed.chat_messages);

        self.rebuild_indexes();
    }

    /// Invariant: the ownership-partitioned users collection is never
    /// written into the store. The coordinator extracts users before
    /// calling in; anything left over is dropped here.
    fn reject_owned(&self, updates: &mut SyncUpdates) {
        if let Some(users) = updates.users.take() {
            warn!(
                count = users.len(),
                "owned user entries reached the store; dropping"
            );
        }
    }

    fn rebuild_indexes(&mut self) {
        self.tag_index = rebuild_tag_index(&self.quests);
    }
}
