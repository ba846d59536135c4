//! The sync cursor.
//!
//! An opaque server-issued token marking the point up to which the
//! client has synchronized. The server issues lexicographically
//! increasing tokens (RFC 3339 timestamps), so ordering two cursors
//! is a plain string comparison.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque server-issued sync cursor (`newSyncTimestamp` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncCursor(String);

impl SyncCursor {
    /// Wraps a server-issued token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token, e.g. for the `lastSync` query parameter.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this cursor marks a later point than `other`.
    ///
    /// A held cursor must never be replaced by one that is not newer;
    /// the coordinator logs such responses as anomalies.
    #[must_use]
    pub fn is_newer_than(&self, other: &SyncCursor) -> bool {
        self.0 > other.0
    }
}

impl fmt::Display for SyncCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
