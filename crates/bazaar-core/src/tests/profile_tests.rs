//! Tests for interaction tracking and profile persistence

use super::fixtures::*;
use crate::profile::{
    PROFILE_KEY, ProfileReader, ProfileStore, ProfileWriter, SEARCH_WEIGHT, UserProfile,
    tokenize_query,
};
use crate::storage::{KeyValueStore, MemoryStore};
use crate::{InteractionKind, Plugin};

// ===== Tokenizer =====

#[test]
fn test_tokenize_lowercases_and_splits() {
    assert_eq!(
        tokenize_query("Weather, NEWS & stocks!"),
        vec!["weather", "news", "stocks"]
    );
}

#[test]
fn test_tokenize_drops_single_chars() {
    assert_eq!(tokenize_query("a b cd 7 42"), vec!["cd", "42"]);
}

#[test]
fn test_tokenize_keeps_cjk_runs() {
    assert_eq!(tokenize_query("天气 bot 好"), vec!["天气", "bot"]);
}

#[test]
fn test_tokenize_ignores_other_scripts() {
    assert!(tokenize_query("éé ßß -- !!").is_empty());
}

// ===== Tracking =====

#[test]
fn test_interaction_weights_accumulate() {
    let plugin = make_authored_plugin("p", "alice", &["ai", "tools"], 0);
    let mut profile = UserProfile::new();

    assert!(profile.track_interaction(&InteractionKind::Favorite, Some(&plugin)));
    assert!(profile.track_interaction(&InteractionKind::Impression, Some(&plugin)));

    assert!((profile.total_interactions() - 2.2).abs() < 1e-9);
    assert!((profile.tag_weight("ai") - 2.2).abs() < 1e-9);
    assert!((profile.tag_weight("tools") - 2.2).abs() < 1e-9);
    assert!((profile.author_weight("alice") - 2.2).abs() < 1e-9);
    assert!(profile.tag_weight("music").abs() < 1e-9);
}

#[test]
fn test_unknown_kind_uses_fallback_weight() {
    let plugin = make_plugin("p", &["x"], 0);
    let mut profile = UserProfile::new();
    profile.track_interaction(&InteractionKind::from("share"), Some(&plugin));
    assert!((profile.total_interactions() - 0.5).abs() < 1e-9);
}

#[test]
fn test_interaction_without_plugin_is_noop() {
    let mut profile = UserProfile::new();
    assert!(!profile.track_interaction(&InteractionKind::Open, None));
    assert!(!profile.track_interaction(&InteractionKind::Open, Some(&Plugin::new(""))));
    assert!(!profile.track_interaction(
        &InteractionKind::from(""),
        Some(&make_plugin("p", &["x"], 0))
    ));
    assert!(profile.is_empty());
}

#[test]
fn test_interaction_skips_blank_author() {
    let plugin = make_authored_plugin("p", "  ", &[], 0);
    let mut profile = UserProfile::new();
    profile.track_interaction(&InteractionKind::Open, Some(&plugin));
    assert!(profile.author_count.is_empty());
    assert!((profile.total_interactions() - 1.0).abs() < 1e-9);
}

#[test]
fn test_duplicate_tags_counted_once() {
    let plugin = make_plugin("p", &["ai", "ai"], 0);
    let mut profile = UserProfile::new();
    profile.track_interaction(&InteractionKind::Open, Some(&plugin));
    assert!((profile.tag_weight("ai") - 1.0).abs() < 1e-9);
}

#[test]
fn test_track_search_counts_tokens() {
    let mut profile = UserProfile::new();
    assert!(profile.track_search("Weather weather bot"));

    assert!((profile.total_interactions() - SEARCH_WEIGHT).abs() < 1e-9);
    let weights: Vec<_> = profile.keyword_weights().collect();
    assert_eq!(weights, vec![("bot", 1.0), ("weather", 2.0)]);
}

#[test]
fn test_track_search_empty_is_noop() {
    let mut profile = UserProfile::new();
    assert!(!profile.track_search(""));
    assert!(!profile.track_search("   "));
    assert!(profile.is_empty());
}

#[test]
fn test_track_search_without_tokens_still_counts() {
    let mut profile = UserProfile::new();
    assert!(profile.track_search("a"));
    assert!((profile.total_interactions() - SEARCH_WEIGHT).abs() < 1e-9);

    assert!(profile.track_search("a ! ?"));
    assert!((profile.total_interactions() - 2.0 * SEARCH_WEIGHT).abs() < 1e-9);
    assert!(profile.keyword_count.is_empty());
}

#[test]
fn test_profile_counters_never_decrease() {
    let catalog = make_catalog(10);
    let mut profile = UserProfile::new();
    let mut last_total = 0.0;

    for (i, plugin) in catalog.iter().enumerate() {
        let kind = if i % 2 == 0 {
            InteractionKind::Impression
        } else {
            InteractionKind::Detail
        };
        profile.track_interaction(&kind, Some(plugin));
        profile.track_search(&plugin.name);
        assert!(profile.total_interactions() >= last_total);
        last_total = profile.total_interactions();
    }
    assert!(profile.tag_count.values().all(|w| *w >= 0.0));
}

// ===== Persistence =====

#[test]
fn test_store_persists_after_each_change() {
    let storage = MemoryStore::new();
    let mut store = ProfileStore::load(storage.clone());

    store.track_interaction(&InteractionKind::Copy, Some(&make_plugin("p", &["x"], 0)));
    let saved = storage.get(PROFILE_KEY).expect("profile saved");
    let restored: UserProfile = serde_json::from_str(&saved).unwrap();
    assert_eq!(&restored, store.profile());

    store.track_search("weather");
    let reloaded = ProfileStore::load(storage);
    assert_eq!(reloaded.profile(), store.profile());
    assert!((reloaded.total_interactions() - 2.0).abs() < 1e-9);
}

#[test]
fn test_store_noop_does_not_write() {
    let storage = MemoryStore::new();
    let mut store = ProfileStore::load(storage.clone());
    store.track_search("");
    assert!(storage.get(PROFILE_KEY).is_none());
}

#[test]
fn test_store_tokenless_search_is_saved() {
    let storage = MemoryStore::new();
    let mut store = ProfileStore::load(storage.clone());
    store.track_search("a ! ?");

    let saved = storage.get(PROFILE_KEY).expect("profile saved");
    let restored: UserProfile = serde_json::from_str(&saved).unwrap();
    assert!((restored.total_interactions - SEARCH_WEIGHT).abs() < 1e-9);
}

#[test]
fn test_store_uses_camel_case_keys() {
    let storage = MemoryStore::new();
    let mut store = ProfileStore::load(storage.clone());
    store.track_interaction(
        &InteractionKind::Open,
        Some(&make_authored_plugin("p", "alice", &["x"], 0)),
    );

    let saved = storage.get(PROFILE_KEY).unwrap();
    for key in ["tagCount", "authorCount", "keywordCount", "totalInteractions"] {
        assert!(saved.contains(key), "missing {key} in {saved}");
    }
}

#[test]
fn test_store_corrupt_data_starts_empty() {
    let storage = MemoryStore::new();
    storage.set(PROFILE_KEY, "{ not json");
    let store = ProfileStore::load(storage);
    assert!(store.profile().is_empty());
}

#[test]
fn test_store_partial_data_fills_defaults() {
    let storage = MemoryStore::new();
    storage.set(PROFILE_KEY, r#"{"tagCount": {"ai": 2.0}}"#);
    let store = ProfileStore::load(storage);
    assert!((store.tag_weight("ai") - 2.0).abs() < 1e-9);
    assert!(store.total_interactions().abs() < 1e-9);
}

#[test]
fn test_store_drops_negative_weights() {
    let storage = MemoryStore::new();
    storage.set(
        PROFILE_KEY,
        r#"{"tagCount": {"ai": -1.0, "ok": 1.0}, "totalInteractions": -5.0}"#,
    );
    let store = ProfileStore::load(storage);
    assert!(store.profile().tag_count.get("ai").is_none());
    assert!((store.tag_weight("ok") - 1.0).abs() < 1e-9);
    assert!(store.total_interactions().abs() < 1e-9);
}
