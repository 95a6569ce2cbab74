//! Tests for the marketplace state root

use super::fixtures::*;
use crate::config::Config;
use crate::profile::PROFILE_KEY;
use crate::storage::{KeyValueStore, MemoryStore};
use crate::theme::THEME_KEY;
use crate::{Error, InteractionKind, Marketplace, SortMode, Theme};

#[test]
fn test_new_market_is_empty_and_idle() {
    let market = Marketplace::new(MemoryStore::new(), &Config::default());
    assert!(market.catalog().is_empty());
    assert!(!market.is_loading());
    assert_eq!(market.total_pages(), 0);
    assert!(market.paginated_plugins().is_empty());
    assert!(market.recommended_for_you().is_empty());
}

#[test]
fn test_load_ticket_sets_loading_flag() {
    let mut market = Marketplace::new(MemoryStore::new(), &Config::default());
    let ticket = market.begin_load();
    assert!(market.is_loading());

    assert!(market.finish_load(ticket, Ok(example_catalog())));
    assert!(!market.is_loading());
    assert_eq!(market.catalog().len(), 2);
}

#[test]
fn test_stale_response_is_discarded() {
    let mut market = Marketplace::new(MemoryStore::new(), &Config::default());
    let first = market.begin_load();
    let second = market.begin_load();

    assert!(market.finish_load(second, Ok(example_catalog())));
    assert!(!market.finish_load(first, Ok(make_catalog(40))));

    assert_eq!(names(market.catalog()), vec!["A", "B"]);
    assert!(!market.is_loading());
}

#[test]
fn test_stale_response_keeps_newer_request_loading() {
    let mut market = Marketplace::new(MemoryStore::new(), &Config::default());
    let first = market.begin_load();
    let _second = market.begin_load();

    assert!(!market.finish_load(first, Ok(example_catalog())));
    assert!(market.is_loading(), "newer request still in flight");
    assert!(market.catalog().is_empty());
}

#[test]
fn test_failed_load_empties_catalog() {
    let (mut market, _) = make_market(example_catalog());
    let ticket = market.begin_load();

    assert!(market.finish_load(ticket, Err(Error::Status(500))));
    assert!(market.catalog().is_empty());
    assert!(!market.is_loading());
}

#[test]
fn test_query_mutators_reset_page() {
    let (mut market, _) = make_market(make_catalog(40));
    market.set_current_page(3);
    assert_eq!(market.query().current_page(), 3);

    market.set_search_query("plugin");
    assert_eq!(market.query().current_page(), 1);

    market.set_current_page(2);
    market.set_selected_tag(Some("ai".to_string()));
    assert_eq!(market.query().current_page(), 1);

    market.set_current_page(2);
    market.set_sort_by(SortMode::Stars);
    assert_eq!(market.query().current_page(), 1);
}

#[test]
fn test_paginated_view_follows_query() {
    let (mut market, _) = make_market(make_catalog(30));
    assert_eq!(market.total_pages(), 3);
    assert_eq!(market.paginated_plugins().len(), 12);

    market.set_current_page(3);
    assert_eq!(market.paginated_plugins().len(), 6);

    let view = market.page_view();
    assert_eq!(view.total_matches, 30);
    assert_eq!(view.items.len(), 6);
}

#[test]
fn test_random_mode_shows_one_page() {
    let (mut market, _) = make_market(make_catalog(30));
    market.set_sort_by(SortMode::Random);
    market.set_random_seed(0.25);

    assert_eq!(market.total_pages(), 1);
    let first = names(market.paginated_plugins())
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>();
    assert_eq!(first.len(), 12);

    // Same seed, same order
    market.set_search_query("");
    assert_eq!(names(market.paginated_plugins()), first);
}

#[test]
fn test_random_seed_only_rerolled_on_entering_random() {
    let (mut market, _) = make_market(make_catalog(5));
    market.set_sort_by(SortMode::Random);
    market.set_random_seed(0.5);

    market.set_sort_by(SortMode::Random);
    assert!((market.query().random_seed() - 0.5).abs() < 1e-12);
}

#[test]
fn test_reshuffle_changes_random_order() {
    let (mut market, _) = make_market(make_catalog(30));
    market.set_sort_by(SortMode::Random);
    market.set_random_seed(0.25);
    let before: Vec<String> = names(market.paginated_plugins())
        .into_iter()
        .map(String::from)
        .collect();

    market.reshuffle();
    assert!((market.query().random_seed() - 0.25).abs() > 1e-12);
    assert_eq!(market.query().sort_by(), SortMode::Random);

    let mut after: Vec<String> = names(market.paginated_plugins())
        .into_iter()
        .map(String::from)
        .collect();
    assert_ne!(after, before);

    // Same plugins, new order
    let mut sorted_before = before;
    sorted_before.sort();
    after.sort();
    assert_eq!(after, sorted_before);
}

#[test]
fn test_track_interaction_by_name() {
    let (mut market, storage) = make_market(example_catalog());

    assert!(market.track_interaction(&InteractionKind::Open, "A"));
    assert!(!market.track_interaction(&InteractionKind::Open, "missing"));

    assert!((market.profile().total_interactions - 1.0).abs() < 1e-9);
    assert!(storage.get(PROFILE_KEY).is_some());
}

#[test]
fn test_track_impressions_for_page() {
    let (mut market, _) = make_market(example_catalog());
    market.track_impressions(["A", "B"]);
    assert!((market.profile().total_interactions - 0.4).abs() < 1e-9);
    assert!((market.profile().tag_count["x"] - 0.4).abs() < 1e-9);
}

#[test]
fn test_cold_start_flag_tracks_profile() {
    let (mut market, _) = make_market(example_catalog());
    assert!(market.is_cold_start());

    market.track_interaction(&InteractionKind::Favorite, "A");
    assert!(market.is_cold_start());
    market.track_interaction(&InteractionKind::Open, "B");
    assert!(!market.is_cold_start());
}

#[test]
fn test_profile_survives_restart() {
    let (mut market, storage) = make_market(example_catalog());
    market.track_interaction(&InteractionKind::Detail, "A");
    market.track_search("weather bot");

    let restarted = Marketplace::new(storage, &Config::default());
    assert_eq!(restarted.profile(), market.profile());
}

#[test]
fn test_similar_and_score_by_name() {
    let (market, _) = make_market(example_catalog());

    let similar = market.similar_plugins("A", None).unwrap();
    assert_eq!(names(similar.iter().map(|s| s.plugin)), vec!["B"]);

    let score = market.compute_score("A").unwrap();
    assert!((0.0..=1.0).contains(&score));
}

#[test]
fn test_unknown_plugin_errors() {
    let (market, _) = make_market(example_catalog());
    assert!(matches!(
        market.similar_plugins("nope", Some(3)),
        Err(Error::PluginNotFound(name)) if name == "nope"
    ));
    assert!(matches!(
        market.compute_score("nope"),
        Err(Error::PluginNotFound(_))
    ));
}

#[test]
fn test_toggle_theme_persists() {
    let (mut market, storage) = make_market(Vec::new());
    assert_eq!(market.theme(), Theme::Light);

    let theme = market.toggle_theme();
    assert_eq!(theme, Theme::Dark);
    assert!(market.is_dark_mode());
    assert_eq!(storage.get(THEME_KEY).as_deref(), Some("dark"));

    market.toggle_theme();
    assert_eq!(storage.get(THEME_KEY).as_deref(), Some("light"));
}

#[test]
fn test_theme_restored_on_restart() {
    let (mut market, storage) = make_market(Vec::new());
    market.set_dark_mode(true);

    let restarted = Marketplace::new(storage, &Config::default());
    assert!(restarted.is_dark_mode());
}

#[test]
fn test_page_size_from_config() {
    let mut config = Config::default();
    config.browse.page_size = 5;
    let mut market = Marketplace::new(MemoryStore::new(), &config);
    let ticket = market.begin_load();
    market.finish_load(ticket, Ok(make_catalog(11)));

    assert_eq!(market.total_pages(), 3);
    assert_eq!(market.paginated_plugins().len(), 5);
}
