//! Pull/delta sync engine for the Questline client.
//!
//! Keeps the in-memory collection store consistent with the server
//! through polling plus a lightweight push-to-pull signal. The server
//! is the single source of truth; the client never resolves
//! concurrent writes locally.
//!
//! # Components
//!
//! - **Client**: HTTP access to the sync endpoint and the capability
//!   probe
//! - **Coordinator**: owns the cursor and the status state machine;
//!   applies pull results through the store's reconciler
//! - **Owner boundary**: routes the externally-owned users collection
//!   to the user directory instead of the store
//! - **Listener**: persistent SSE connection turning "something
//!   changed" signals into delta pulls
//!
//! # Sync process
//!
//! 1. Initial pull: full snapshot, store loaded, cursor set
//! 2. One-shot capability probe (best effort)
//! 3. Push signal arrives, or a timer/user action fires
//! 4. Delta pull with the held cursor; merge, forward owned entries,
//!    rebuild indexes; cursor advances
//! 5. Repeat until teardown
//!
//! # Example
//!
//! ```no_run
//! use questline_sync::{ChangeListener, SyncConfig, SyncCoordinator, UserDirectory};
//! use std::sync::Arc;
//!
//! # async fn demo() -> questline_sync::SyncResult<()> {
//! let config = SyncConfig::default();
//! let directory = Arc::new(UserDirectory::new());
//! let coordinator = Arc::new(SyncCoordinator::new(config.clone(), directory));
//!
//! coordinator.sync().await?;
//! let listener = ChangeListener::spawn(config, Arc::clone(&coordinator));
//! # drop(listener);
//! # Ok(())
//! # }
//! ```

mod client;
mod coordinator;
mod error;
mod listener;
mod owner;
mod scheduler;

pub use client::{SyncClient, SyncConfig};
pub use coordinator::SyncCoordinator;
pub use error::{SyncError, SyncResult};
pub use listener::ChangeListener;
pub use owner::{CollectionOwner, SelectionStore, UserDirectory};
pub use scheduler::SyncScheduler;
