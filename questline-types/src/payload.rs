//! Sync wire payloads.
//!
//! The sync endpoint answers both the initial pull (full snapshot)
//! and the delta pull (changed collections only) with the same shape:
//! a [`SyncUpdates`] section, an optional [`RemovedIds`] section and
//! the new cursor. Collections absent from a payload are untouched.

use crate::cursor::SyncCursor;
use crate::records::{
    ChatMessage, MarketItem, Notification, Quest, SettingsPatch, Trophy, UserRecord,
};
use serde::{Deserialize, Serialize};

/// Snapshot of changed (or, on initial pull, all) collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncUpdates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quests: Option<Vec<Quest>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markets: Option<Vec<MarketItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trophies: Option<Vec<Trophy>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<Vec<Notification>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_messages: Option<Vec<ChatMessage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<UserRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<SettingsPatch>,
}

impl SyncUpdates {
    /// Whether no collection is present at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quests.is_none()
            && self.markets.is_none()
            && self.trophies.is_none()
            && self.notifications.is_none()
            && self.chat_messages.is_none()
            && self.users.is_none()
            && self.settings.is_none()
    }

    /// Extracts the externally-owned users entries.
    ///
    /// The collection store never receives user records; the
    /// coordinator forwards them to the owning user directory before
    /// the remaining updates touch the store.
    pub fn split_owned(&mut self) -> Option<Vec<UserRecord>> {
        self.users.take()
    }
}

/// Ids removed from each collection since the request cursor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemovedIds {
    pub quests: Vec<String>,
    pub markets: Vec<String>,
    pub trophies: Vec<String>,
    pub notifications: Vec<String>,
    pub chat_messages: Vec<String>,
    pub users: Vec<String>,
}

impl RemovedIds {
    /// Whether every removal set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
            && self.markets.is_empty()
            && self.trophies.is_empty()
            && self.notifications.is_empty()
            && self.chat_messages.is_empty()
            && self.users.is_empty()
    }

    /// Extracts removal ids for the externally-owned users collection.
    pub fn split_owned(&mut self) -> Vec<String> {
        std::mem::take(&mut self.users)
    }
}

/// Response body of both the initial and the delta pull.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    #[serde(default)]
    pub updates: SyncUpdates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed: Option<RemovedIds>,
    pub new_sync_timestamp: SyncCursor,
}

/// Response body of the capability probe (`GET /api/status`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Capabilities {
    pub chat_enabled: bool,
}
