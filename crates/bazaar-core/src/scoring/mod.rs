//! Recommendation and similarity scoring.
//!
//! Scores combine corpus-relative popularity and recency with the user's
//! learned affinities. Corpus statistics are taken from the catalog passed
//! in, so scores always reflect the current load.

mod similar;

pub use similar::{jaccard, similar_plugins};

use crate::profile::ProfileReader;
use crate::utils::{parse_timestamp_millis, updated_millis_or_epoch};
use bazaar_types::Plugin;
use serde::Serialize;
use std::cmp::{Ordering, Reverse};
use std::collections::HashSet;

/// Default size of the recommendation list
pub const RECOMMEND_LIMIT: usize = 6;

/// Default size of the related-plugins list
pub const SIMILAR_LIMIT: usize = 6;

/// Below this accumulated weight recommendations fall back to popularity
pub const COLD_START_THRESHOLD: f64 = 3.0;

/// Signal weights for the recommendation score. They sum to 1.0.
pub struct SignalWeights;

impl SignalWeights {
    pub const POPULARITY: f64 = 0.30;
    pub const RECENCY: f64 = 0.20;
    pub const TAG_AFFINITY: f64 = 0.30;
    pub const AUTHOR_AFFINITY: f64 = 0.10;
    pub const KEYWORD_AFFINITY: f64 = 0.10;
}

/// A plugin paired with the score that ranked it
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScoredPlugin<'a> {
    pub plugin: &'a Plugin,
    pub score: f64,
}

/// Catalog-wide statistics the per-plugin signals are normalized against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CorpusStats {
    /// Highest star count, at least 1
    pub max_stars: u64,
    /// Newest parseable `updated_at`, in epoch millis
    pub newest: Option<i64>,
    /// Oldest parseable `updated_at`, in epoch millis
    pub oldest: Option<i64>,
}

impl CorpusStats {
    #[must_use]
    pub fn from_catalog(catalog: &[Plugin]) -> Self {
        let max_stars = catalog
            .iter()
            .map(Plugin::star_count)
            .max()
            .unwrap_or(0)
            .max(1);

        let timestamps = catalog
            .iter()
            .filter_map(|p| p.updated_at.as_deref().and_then(parse_timestamp_millis));
        let (newest, oldest) = timestamps.fold((None, None), |(newest, oldest), ts| {
            (
                Some(newest.map_or(ts, |n: i64| n.max(ts))),
                Some(oldest.map_or(ts, |o: i64| o.min(ts))),
            )
        });

        Self {
            max_stars,
            newest,
            oldest,
        }
    }

    /// `stars / max_stars`, capped at 1
    // Star counts stay far below 2^52
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn popularity(&self, plugin: &Plugin) -> f64 {
        (plugin.star_count() as f64 / self.max_stars.max(1) as f64).min(1.0)
    }

    /// 1.0 for the newest plugin down to 0.0 for the oldest; 0.0 without a
    /// parseable timestamp
    // Millisecond spans stay far below 2^52
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn recency(&self, plugin: &Plugin) -> f64 {
        let (Some(newest), Some(oldest)) = (self.newest, self.oldest) else {
            return 0.0;
        };
        let Some(ts) = plugin.updated_at.as_deref().and_then(parse_timestamp_millis) else {
            return 0.0;
        };
        let span = (newest - oldest).max(1) as f64;
        (1.0 - (newest - ts) as f64 / span).clamp(0.0, 1.0)
    }
}

/// Scores plugins of one catalog against one profile
pub struct Scorer<'a, R> {
    stats: CorpusStats,
    profile: &'a R,
}

impl<'a, R: ProfileReader> Scorer<'a, R> {
    #[must_use]
    pub fn new(catalog: &[Plugin], profile: &'a R) -> Self {
        Self {
            stats: CorpusStats::from_catalog(catalog),
            profile,
        }
    }

    /// Affinity denominator, floored at 1 so an empty profile scores zero
    fn denominator(&self) -> f64 {
        self.profile.total_interactions().max(1.0)
    }

    #[must_use]
    pub fn tag_affinity(&self, plugin: &Plugin) -> f64 {
        let mut seen = HashSet::new();
        let sum: f64 = plugin
            .tags
            .iter()
            .filter(|t| seen.insert(t.as_str()))
            .map(|t| self.profile.tag_weight(t))
            .sum();
        (sum / self.denominator()).min(1.0)
    }

    #[must_use]
    pub fn author_affinity(&self, plugin: &Plugin) -> f64 {
        plugin.author_name().map_or(0.0, |author| {
            (self.profile.author_weight(author) / self.denominator()).min(1.0)
        })
    }

    #[must_use]
    pub fn keyword_affinity(&self, plugin: &Plugin) -> f64 {
        let text = format!(
            "{} {}",
            plugin.name,
            plugin.desc.as_deref().unwrap_or_default()
        )
        .to_lowercase();

        let sum: f64 = self
            .profile
            .keyword_weights()
            .filter(|(keyword, _)| text.contains(keyword))
            .map(|(_, count)| count)
            .sum();
        (sum / self.denominator()).min(1.0)
    }

    /// Weighted recommendation score in `[0, 1]`
    #[must_use]
    pub fn score(&self, plugin: &Plugin) -> f64 {
        let score = SignalWeights::POPULARITY * self.stats.popularity(plugin)
            + SignalWeights::RECENCY * self.stats.recency(plugin)
            + SignalWeights::TAG_AFFINITY * self.tag_affinity(plugin)
            + SignalWeights::AUTHOR_AFFINITY * self.author_affinity(plugin)
            + SignalWeights::KEYWORD_AFFINITY * self.keyword_affinity(plugin);
        score.clamp(0.0, 1.0)
    }
}

/// Score a single plugin against the whole catalog
#[must_use]
pub fn compute_score<R: ProfileReader>(
    catalog: &[Plugin],
    profile: &R,
    plugin: &Plugin,
) -> f64 {
    Scorer::new(catalog, profile).score(plugin)
}

/// Every plugin with its score, best first; ties keep catalog order
#[must_use]
pub fn rank_by_score<'a, R: ProfileReader>(
    catalog: &'a [Plugin],
    profile: &R,
) -> Vec<ScoredPlugin<'a>> {
    let scorer = Scorer::new(catalog, profile);
    let mut scored: Vec<_> = catalog
        .iter()
        .map(|plugin| ScoredPlugin {
            plugin,
            score: scorer.score(plugin),
        })
        .collect();
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored
}

/// Most popular plugins: stars descending, then most recently updated
#[must_use]
pub fn most_popular(catalog: &[Plugin], limit: usize) -> Vec<&Plugin> {
    let mut plugins: Vec<&Plugin> = catalog.iter().collect();
    plugins.sort_by_cached_key(|p| {
        (
            Reverse(p.star_count()),
            Reverse(updated_millis_or_epoch(p.updated_at.as_deref())),
        )
    });
    plugins.truncate(limit);
    plugins
}

/// Personalized picks.
///
/// While the profile has accumulated less than `cold_start_threshold` weight
/// scoring is skipped and the most popular plugins are returned instead.
#[must_use]
pub fn recommended_for_you<'a, R: ProfileReader>(
    catalog: &'a [Plugin],
    profile: &R,
    limit: usize,
    cold_start_threshold: f64,
) -> Vec<&'a Plugin> {
    if profile.total_interactions() < cold_start_threshold {
        return most_popular(catalog, limit);
    }

    rank_by_score(catalog, profile)
        .into_iter()
        .take(limit)
        .map(|scored| scored.plugin)
        .collect()
}
