use super::{CorpusStats, ScoredPlugin};
use bazaar_types::Plugin;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Bonus for sharing a (non-empty) author with the target
const SAME_AUTHOR_BONUS: f64 = 0.2;

/// Weight of the candidate's normalized popularity
const POPULARITY_WEIGHT: f64 = 0.1;

/// Jaccard index of two tag lists treated as sets.
///
/// Two empty lists yield 0.0 rather than a division by zero.
// Tag counts are tiny
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn jaccard(a: &[String], b: &[String]) -> f64 {
    let a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let b: HashSet<&str> = b.iter().map(String::as_str).collect();
    let intersection = a.intersection(&b).count();
    let union = a.union(&b).count().max(1);
    intersection as f64 / union as f64
}

/// Up to `k` plugins most related to `target`, best first.
///
/// The target itself (matched by name) is never included. Ties keep
/// catalog order.
#[must_use]
pub fn similar_plugins<'a>(catalog: &'a [Plugin], target: &Plugin, k: usize) -> Vec<ScoredPlugin<'a>> {
    let stats = CorpusStats::from_catalog(catalog);
    let target_author = target.author_name();

    let mut scored: Vec<_> = catalog
        .iter()
        .filter(|candidate| candidate.name != target.name)
        .map(|candidate| {
            let same_author = target_author.is_some() && candidate.author_name() == target_author;
            let score = jaccard(&target.tags, &candidate.tags)
                + if same_author { SAME_AUTHOR_BONUS } else { 0.0 }
                + POPULARITY_WEIGHT * stats.popularity(candidate);
            ScoredPlugin {
                plugin: candidate,
                score,
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(k);
    scored
}
