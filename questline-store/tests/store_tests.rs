use pretty_assertions::assert_eq;
use questline_store::{CollectionStore, SyncStatus};
use questline_types::{Quest, RemovedIds, SettingsPatch, SyncUpdates, UserRecord};

fn quest(id: &str, title: &str, tags: &[&str]) -> Quest {
    Quest {
        id: id.to_string(),
        title: title.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        reward: 0,
        completed: false,
        assigned_to: None,
    }
}

fn user(id: &str, name: &str) -> UserRecord {
    UserRecord {
        id: id.to_string(),
        name: name.to_string(),
        avatar: None,
        balance: 0,
    }
}

fn loaded_store(quests: Vec<Quest>) -> CollectionStore {
    let mut store = CollectionStore::new();
    store.replace_all(SyncUpdates {
        quests: Some(quests),
        ..Default::default()
    });
    store
}

// ── Replace-all ─────────────────────────────────────────────────

#[test]
fn new_store_is_not_loaded() {
    let store = CollectionStore::new();
    assert!(!store.loaded);
    assert_eq!(store.status, SyncStatus::Idle);
    assert!(store.quests.is_empty());
}

#[test]
fn replace_all_marks_loaded_and_sets_collections() {
    let mut store = CollectionStore::new();
    store.replace_all(SyncUpdates {
        quests: Some(vec![quest("q1", "Sweep", &["clean"])]),
        settings: Some(SettingsPatch {
            app_name: Some("X".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    });

    assert!(store.loaded);
    assert_eq!(store.quests.len(), 1);
    assert_eq!(store.settings.app_name, "X");
    assert!(store.tag_index.contains("clean"));
}

#[test]
fn replace_all_overwrites_outright() {
    let mut store = loaded_store(vec![quest("q1", "Sweep", &["clean"])]);
    store.replace_all(SyncUpdates {
        quests: Some(vec![quest("q2", "Homework", &["school"])]),
        ..Default::default()
    });

    assert_eq!(store.quests.len(), 1);
    assert_eq!(store.quests[0].id, "q2");
    assert!(!store.tag_index.contains("clean"));
}

// ── Merge-upsert ────────────────────────────────────────────────

#[test]
fn merge_preserves_order_and_appends() {
    let mut store = loaded_store(vec![
        quest("1", "a", &[]),
        quest("2", "b", &[]),
    ]);

    store.merge_upsert(SyncUpdates {
        quests: Some(vec![quest("2", "c", &[]), quest("3", "d", &[])]),
        ..Default::default()
    });

    let ids: Vec<&str> = store.quests.iter().map(|q| q.id.as_str()).collect();
    let titles: Vec<&str> = store.quests.iter().map(|q| q.title.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(titles, vec!["a", "c", "d"]);
}

#[test]
fn merge_is_idempotent() {
    let delta = SyncUpdates {
        quests: Some(vec![quest("2", "c", &["new"]), quest("3", "d", &[])]),
        settings: Some(SettingsPatch {
            currency_name: Some("stars".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };

    let mut once = loaded_store(vec![quest("1", "a", &[]), quest("2", "b", &[])]);
    once.merge_upsert(delta.clone());

    let mut twice = once.clone();
    twice.merge_upsert(delta);

    assert_eq!(once, twice);
}

#[test]
fn merge_shallow_merges_settings() {
    let mut store = loaded_store(Vec::new());
    let default_app_name = store.settings.app_name.clone();

    store.merge_upsert(SyncUpdates {
        settings: Some(SettingsPatch {
            push_enabled: Some(false),
            ..Default::default()
        }),
        ..Default::default()
    });

    assert!(!store.settings.push_enabled);
    assert_eq!(store.settings.app_name, default_app_name);
}

#[test]
fn merge_absent_collections_are_untouched() {
    let mut store = loaded_store(vec![quest("q1", "Sweep", &[])]);
    store.merge_upsert(SyncUpdates::default());
    assert_eq!(store.quests.len(), 1);
}

// ── Remove-by-ids ───────────────────────────────────────────────

#[test]
fn remove_filters_each_collection() {
    let mut store = loaded_store(vec![
        quest("1", "a", &[]),
        quest("2", "b", &[]),
        quest("3", "c", &[]),
    ]);

    store.remove_by_ids(&RemovedIds {
        quests: vec!["2".to_string()],
        ..Default::default()
    });

    let ids: Vec<&str> = store.quests.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3"]);
}

#[test]
fn remove_rebuilds_tag_index() {
    let mut store = loaded_store(vec![
        quest("1", "a", &["clean"]),
        quest("2", "b", &["school"]),
    ]);

    store.remove_by_ids(&RemovedIds {
        quests: vec!["2".to_string()],
        ..Default::default()
    });

    assert!(store.tag_index.contains("clean"));
    assert!(!store.tag_index.contains("school"));
}

// ── Ownership exclusion ─────────────────────────────────────────

#[test]
fn owned_users_never_enter_the_store() {
    let mut store = CollectionStore::new();
    let with_users = SyncUpdates {
        quests: Some(vec![quest("q1", "Sweep", &[])]),
        users: Some(vec![user("u1", "Ada")]),
        ..Default::default()
    };

    store.replace_all(with_users.clone());
    let after_replace = store.clone();

    store.merge_upsert(with_users);
    // Merging the same payload again (users included) changes nothing.
    assert_eq!(store, after_replace);

    let json = serde_json::to_string(&store).unwrap();
    assert!(!json.contains("Ada"));
}

// ── Derived index ───────────────────────────────────────────────

#[test]
fn tag_index_deduplicates_regardless_of_order() {
    let a = loaded_store(vec![
        quest("q1", "x", &["clean", "school"]),
        quest("q2", "y", &["clean"]),
    ]);
    let b = loaded_store(vec![
        quest("q2", "y", &["clean"]),
        quest("q1", "x", &["school", "clean"]),
    ]);

    assert_eq!(a.tag_index, b.tag_index);
    assert_eq!(
        a.tag_index.iter().cloned().collect::<Vec<_>>(),
        vec!["clean".to_string(), "school".to_string()]
    );
}

// ── Property: merge idempotence over arbitrary deltas ───────────

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn arb_quest() -> impl Strategy<Value = Quest> {
        ("[a-e]", "[a-z]{1,6}", proptest::collection::vec("[a-d]", 0..3)).prop_map(
            |(id, title, tags)| Quest {
                id,
                title,
                tags,
                reward: 0,
                completed: false,
                assigned_to: None,
            },
        )
    }

    fn dedup_by_id(quests: Vec<Quest>) -> Vec<Quest> {
        let mut seen = std::collections::HashSet::new();
        quests
            .into_iter()
            .filter(|q| seen.insert(q.id.clone()))
            .collect()
    }

    proptest! {
        #[test]
        fn merge_upsert_idempotent(
            existing in proptest::collection::vec(arb_quest(), 0..6),
            delta in proptest::collection::vec(arb_quest(), 0..6),
        ) {
            let mut store = loaded_store(dedup_by_id(existing));
            let delta = SyncUpdates {
                quests: Some(delta),
                ..Default::default()
            };

            store.merge_upsert(delta.clone());
            let once = store.clone();
            store.merge_upsert(delta);

            prop_assert_eq!(store, once);
        }

        #[test]
        fn merge_upsert_keeps_ids_unique(
            existing in proptest::collection::vec(arb_quest(), 0..6),
            delta in proptest::collection::vec(arb_quest(), 0..6),
        ) {
            let mut store = loaded_store(dedup_by_id(existing));
            store.merge_upsert(SyncUpdates {
                quests: Some(delta),
                ..Default::default()
            });

            let mut ids: Vec<&str> = store.quests.iter().map(|q| q.id.as_str()).collect();
            ids.sort_unstable();
            let before = ids.len();
            ids.dedup();
            prop_assert_eq!(before, ids.len());
        }
    }
}
