//! Derived index builder.
//!
//! Indexes are recomputed in full from the primary collections after
//! every store mutation, never patched incrementally, so they can
//! never diverge from a from-scratch computation.

use questline_types::Quest;
use std::collections::BTreeSet;

/// Deduplicated set of free-text tags across all quests.
///
/// Deterministic and order-independent: a `BTreeSet` built by a full
/// scan yields the same value for any permutation of the input.
#[must_use]
pub fn rebuild_tag_index(quests: &[Quest]) -> BTreeSet<String> {
    quests
        .iter()
        .flat_map(|quest| quest.tags.iter().cloned())
        .collect()
}
