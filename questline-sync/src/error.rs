//! Error types for the sync layer.

use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur in sync operations.
///
/// Any of these during a pull moves the store's status to `Error`
/// while leaving its content untouched. A capability-probe failure is
/// logged and never surfaced through the status at all.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Transport failure reaching the server.
    #[error("network error: {0}")]
    Network(String),

    /// Non-success HTTP status from the server.
    #[error("sync endpoint returned HTTP {status}")]
    Protocol { status: u16 },

    /// Malformed response body.
    #[error("malformed response body: {0}")]
    Parse(#[from] serde_json::Error),

    /// The engine has been shut down; the result was discarded.
    #[error("sync engine is shut down")]
    Closed,
}
