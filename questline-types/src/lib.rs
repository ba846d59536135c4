//! Core type definitions for the Questline client.
//!
//! Contains the server-owned record types, the sync wire payloads and
//! the sync cursor. Everything here is plain data: no I/O, no state.

pub mod cursor;
pub mod payload;
pub mod records;

pub use cursor::SyncCursor;
pub use payload::{Capabilities, RemovedIds, SyncResponse, SyncUpdates};
pub use records::{
    ChatMessage, Keyed, MarketItem, Notification, Quest, Settings, SettingsPatch, Trophy,
    UserRecord,
};
