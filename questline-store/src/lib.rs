//! In-memory collection store and reconciler for the Questline client.
//!
//! The store holds every server-owned collection the client renders,
//! plus the settings singleton and the derived tag index. It is
//! mutated exclusively through the three reconciliation operations —
//! replace-all, merge-upsert and remove-by-ids — which the sync
//! coordinator invokes after a pull has fully parsed. All three are
//! deterministic and leave the store consistent; a failed pull never
//! reaches them.

mod index;
pub mod reconcile;
mod store;

pub use index::rebuild_tag_index;
pub use store::{CollectionStore, SyncStatus};
