//! Server-owned record types.
//!
//! Each collection record carries a server-assigned `id`, unique
//! within its collection. The [`Keyed`] trait exposes that id so the
//! reconciler can merge any collection with the same code path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A record with a collection-unique identity.
pub trait Keyed {
    /// The record's id within its collection.
    fn key(&self) -> &str;
}

/// A task a family member can take on and complete for a reward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    pub title: String,
    /// Free-text labels, e.g. "clean" or "school". Feeds the tag index.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub reward: i64,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl Keyed for Quest {
    fn key(&self) -> &str {
        &self.id
    }
}

/// An item purchasable with earned quest rewards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

impl Keyed for MarketItem {
    fn key(&self) -> &str {
        &self.id
    }
}

/// A milestone award granted by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trophy {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Ids of users who have earned this trophy.
    #[serde(default)]
    pub earned_by: Vec<String>,
}

impl Keyed for Trophy {
    fn key(&self) -> &str {
        &self.id
    }
}

/// A server-generated notification shown in the activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

impl Keyed for Notification {
    fn key(&self) -> &str {
        &self.id
    }
}

/// A family chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub sender_id: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

impl Keyed for ChatMessage {
    fn key(&self) -> &str {
        &self.id
    }
}

/// A family member as the server knows them.
///
/// Users are the ownership-partitioned collection: the collection
/// store never holds them. They are forwarded to the user directory,
/// which is the only writer of user state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub balance: i64,
}

impl Keyed for UserRecord {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Application-wide settings singleton.
///
/// Merged shallowly field by field, never by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub app_name: String,
    pub currency_name: String,
    pub push_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "Questline".to_string(),
            currency_name: "coins".to_string(),
            push_enabled: true,
        }
    }
}

impl Settings {
    /// Applies a partial settings update, field by field. Absent
    /// fields keep their current value.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(app_name) = &patch.app_name {
            self.app_name = app_name.clone();
        }
        if let Some(currency_name) = &patch.currency_name {
            self.currency_name = currency_name.clone();
        }
        if let Some(push_enabled) = patch.push_enabled {
            self.push_enabled = push_enabled;
        }
    }
}

/// Partial [`Settings`] as sent by the server in a delta.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_enabled: Option<bool>,
}
