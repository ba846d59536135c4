//! Pure merge primitives over identity-keyed collections.
//!
//! `merge_collection` implements the upsert contract: items already
//! in the collection are overwritten in place (keeping their relative
//! order), unseen ids are appended in delta order. Applying the same
//! delta twice yields the same result as applying it once.

use questline_types::Keyed;
use std::collections::{HashMap, HashSet};

/// Overlays `incoming` onto `existing`, keyed by record id.
///
/// Pre-existing ids keep their position; new ids are appended in the
/// order they appear in the delta. If the delta repeats an id, the
/// last occurrence wins.
pub fn merge_collection<T: Keyed>(existing: &mut Vec<T>, incoming: Vec<T>) {
    let mut by_id: HashMap<String, T> = HashMap::with_capacity(incoming.len());
    let mut appended_order: Vec<String> = Vec::new();

    for item in incoming {
        if !by_id.contains_key(item.key()) {
            appended_order.push(item.key().to_string());
        }
        by_id.insert(item.key().to_string(), item);
    }

    for slot in existing.iter_mut() {
        if let Some(updated) = by_id.remove(slot.key()) {
            *slot = updated;
        }
    }

    for id in appended_order {
        // Ids already consumed above belonged to pre-existing records.
        if let Some(item) = by_id.remove(&id) {
            existing.push(item);
        }
    }
}

/// Drops every record whose id appears in `ids`.
pub fn remove_by_ids<T: Keyed>(existing: &mut Vec<T>, ids: &[String]) {
    if ids.is_empty() {
        return;
    }
    let removal: HashSet<&str> = ids.iter().map(String::as_str).collect();
    existing.retain(|item| !removal.contains(item.key()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Rec {
        id: String,
        v: String,
    }

    impl Keyed for Rec {
        fn key(&self) -> &str {
            &self.id
        }
    }

    fn rec(id: &str, v: &str) -> Rec {
        Rec {
            id: id.to_string(),
            v: v.to_string(),
        }
    }

    #[test]
    fn merge_overwrites_in_place_and_appends() {
        let mut existing = vec![rec("1", "a"), rec("2", "b")];
        merge_collection(&mut existing, vec![rec("2", "c"), rec("3", "d")]);
        assert_eq!(existing, vec![rec("1", "a"), rec("2", "c"), rec("3", "d")]);
    }

    #[test]
    fn merge_twice_equals_merge_once() {
        let delta = vec![rec("2", "c"), rec("3", "d")];

        let mut once = vec![rec("1", "a"), rec("2", "b")];
        merge_collection(&mut once, delta.clone());

        let mut twice = once.clone();
        merge_collection(&mut twice, delta);

        assert_eq!(once, twice);
    }

    #[test]
    fn merge_duplicate_delta_id_last_wins() {
        let mut existing = vec![rec("1", "a")];
        merge_collection(&mut existing, vec![rec("2", "x"), rec("2", "y")]);
        assert_eq!(existing, vec![rec("1", "a"), rec("2", "y")]);
    }

    #[test]
    fn merge_into_empty_keeps_delta_order() {
        let mut existing: Vec<Rec> = Vec::new();
        merge_collection(&mut existing, vec![rec("b", "1"), rec("a", "2")]);
        assert_eq!(existing, vec![rec("b", "1"), rec("a", "2")]);
    }

    #[test]
    fn remove_filters_listed_ids() {
        let mut existing = vec![rec("1", "a"), rec("2", "b"), rec("3", "c")];
        remove_by_ids(&mut existing, &["2".to_string()]);
        assert_eq!(existing, vec![rec("1", "a"), rec("3", "c")]);
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let mut existing = vec![rec("1", "a")];
        remove_by_ids(&mut existing, &["9".to_string()]);
        assert_eq!(existing, vec![rec("1", "a")]);
    }
}
