//! Implicitly learned user affinity profile.
//!
//! The profile only grows: every tracked event adds a non-negative weight to
//! the total and to the counters it touches. Reading and writing are split
//! into [`ProfileReader`] (used by the scorer) and [`ProfileWriter`] (used by
//! the tracker) so the feedback loop between them stays explicit.

mod store;

pub use store::{PROFILE_KEY, ProfileStore};

use bazaar_types::{InteractionKind, Plugin};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

/// Weight added to the total for one recorded search
pub const SEARCH_WEIGHT: f64 = 0.5;

/// Minimum token length (in characters) kept from a search query
const MIN_KEYWORD_CHARS: usize = 2;

/// Runs of ASCII letters, digits or CJK unified ideographs
static KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9\x{4e00}-\x{9fa5}]+").expect("keyword pattern is valid")
});

/// Accumulated affinity signals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub tag_count: BTreeMap<String, f64>,

    #[serde(default)]
    pub author_count: BTreeMap<String, f64>,

    #[serde(default)]
    pub keyword_count: BTreeMap<String, f64>,

    #[serde(default)]
    pub total_interactions: f64,
}

impl UserProfile {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop entries that would break the non-negative invariant.
    /// Only needed for data read back from storage.
    pub(crate) fn sanitize(&mut self) {
        let valid = |w: &f64| w.is_finite() && *w >= 0.0;
        self.tag_count.retain(|_, w| valid(w));
        self.author_count.retain(|_, w| valid(w));
        self.keyword_count.retain(|_, w| valid(w));
        if !valid(&self.total_interactions) {
            self.total_interactions = 0.0;
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_interactions == 0.0
            && self.tag_count.is_empty()
            && self.author_count.is_empty()
            && self.keyword_count.is_empty()
    }
}

/// Split a search query into lower-cased keywords of at least two characters
#[must_use]
pub fn tokenize_query(query: &str) -> Vec<String> {
    KEYWORD_RE
        .find_iter(query)
        .map(|m| m.as_str().to_lowercase())
        .filter(|token| token.chars().count() >= MIN_KEYWORD_CHARS)
        .collect()
}

/// Read-only view of affinity signals
pub trait ProfileReader {
    /// Sum of all recorded event weights
    fn total_interactions(&self) -> f64;

    /// Accumulated weight for a tag, zero if never seen
    fn tag_weight(&self, tag: &str) -> f64;

    /// Accumulated weight for an author, zero if never seen
    fn author_weight(&self, author: &str) -> f64;

    /// All learned search keywords with their counts
    fn keyword_weights(&self) -> impl Iterator<Item = (&str, f64)>;
}

/// Mutations driven by user activity.
///
/// Both operations return `true` when the profile changed and are no-ops on
/// empty input. A non-empty search always counts toward the total, even when
/// none of its tokens is long enough to be kept.
pub trait ProfileWriter {
    /// Record one event of `kind` against `plugin`
    fn track_interaction(&mut self, kind: &InteractionKind, plugin: Option<&Plugin>) -> bool;

    /// Record the keywords of a search query
    fn track_search(&mut self, query: &str) -> bool;
}

impl ProfileReader for UserProfile {
    fn total_interactions(&self) -> f64 {
        self.total_interactions
    }

    fn tag_weight(&self, tag: &str) -> f64 {
        self.tag_count.get(tag).copied().unwrap_or(0.0)
    }

    fn author_weight(&self, author: &str) -> f64 {
        self.author_count.get(author).copied().unwrap_or(0.0)
    }

    fn keyword_weights(&self) -> impl Iterator<Item = (&str, f64)> {
        self.keyword_count.iter().map(|(k, w)| (k.as_str(), *w))
    }
}

impl ProfileWriter for UserProfile {
    fn track_interaction(&mut self, kind: &InteractionKind, plugin: Option<&Plugin>) -> bool {
        let Some(plugin) = plugin.filter(|p| !p.name.is_empty()) else {
            return false;
        };
        if kind.as_str().is_empty() {
            return false;
        }

        let weight = kind.weight();
        self.total_interactions += weight;

        let mut seen = HashSet::new();
        for tag in plugin.tags.iter().filter(|t| seen.insert(t.as_str())) {
            *self.tag_count.entry(tag.clone()).or_insert(0.0) += weight;
        }

        if let Some(author) = plugin.author_name() {
            *self.author_count.entry(author.to_string()).or_insert(0.0) += weight;
        }

        true
    }

    fn track_search(&mut self, query: &str) -> bool {
        if query.trim().is_empty() {
            return false;
        }

        for token in tokenize_query(query) {
            *self.keyword_count.entry(token).or_insert(0.0) += 1.0;
        }
        self.total_interactions += SEARCH_WEIGHT;
        true
    }
}
