//! Filter, sort and paginate the catalog.
//!
//! Everything here is a pure function of the catalog and a [`QueryState`]
//! snapshot. Callers decide when to recompute.

mod query;

pub use query::{PAGE_SIZE, QueryState};

use crate::hash::stable_hash;
use crate::utils::updated_millis_or_epoch;
use bazaar_types::{Plugin, SortMode};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeSet;

/// One page of the filtered, ordered catalog
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView<'a> {
    pub items: Vec<&'a Plugin>,
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
}

/// Plugins whose name, description or author contains `search`
/// (case-insensitive) and, when `tag` is given, that carry that exact tag.
/// Catalog order is preserved.
#[must_use]
pub fn filter_plugins<'a>(catalog: &'a [Plugin], search: &str, tag: Option<&str>) -> Vec<&'a Plugin> {
    let needle = search.to_lowercase();
    catalog
        .iter()
        .filter(|plugin| plugin.matches_text(&needle))
        .filter(|plugin| tag.is_none_or(|t| plugin.has_tag(t)))
        .collect()
}

/// Order plugins in place.
///
/// `Default` keeps the incoming order, which is catalog order when the list
/// came from [`filter_plugins`]. All sorts are stable.
pub fn sort_plugins(plugins: &mut [&Plugin], mode: SortMode, seed: f64) {
    match mode {
        SortMode::Default => {}
        SortMode::Stars => plugins.sort_by_key(|p| Reverse(p.star_count())),
        SortMode::Updated => plugins
            .sort_by_cached_key(|p| Reverse(updated_millis_or_epoch(p.updated_at.as_deref()))),
        SortMode::Random => plugins.sort_by_cached_key(|p| stable_hash(&p.name, seed)),
    }
}

/// Filter and sort according to the query
#[must_use]
pub fn filtered_plugins<'a>(catalog: &'a [Plugin], query: &QueryState) -> Vec<&'a Plugin> {
    let mut plugins = filter_plugins(catalog, query.search_query(), query.selected_tag());
    sort_plugins(&mut plugins, query.sort_by(), query.random_seed());
    plugins
}

/// Number of pages for `match_count` results.
///
/// Random mode never paginates: one page if anything matched, else none.
#[must_use]
pub fn total_pages(match_count: usize, query: &QueryState) -> usize {
    if query.sort_by() == SortMode::Random {
        return usize::from(match_count > 0);
    }
    match_count.div_ceil(query.page_size())
}

/// Slice of `filtered` for the current page, empty when past the end.
/// Random mode always yields the first `page_size` items.
#[must_use]
pub fn paginate<'s, T>(filtered: &'s [T], query: &QueryState) -> &'s [T] {
    let page = if query.sort_by() == SortMode::Random {
        1
    } else {
        query.current_page()
    };
    let size = query.page_size();
    let start = page.saturating_sub(1).saturating_mul(size).min(filtered.len());
    let end = start.saturating_add(size).min(filtered.len());
    &filtered[start..end]
}

/// Filter, sort and slice in one go
#[must_use]
pub fn page_view<'a>(catalog: &'a [Plugin], query: &QueryState) -> PageView<'a> {
    let filtered = filtered_plugins(catalog, query);
    PageView {
        items: paginate(&filtered, query).to_vec(),
        page: if query.sort_by() == SortMode::Random {
            1
        } else {
            query.current_page()
        },
        total_pages: total_pages(filtered.len(), query),
        total_matches: filtered.len(),
    }
}

/// Every distinct tag in the catalog, sorted
#[must_use]
pub fn all_tags(catalog: &[Plugin]) -> Vec<String> {
    catalog
        .iter()
        .flat_map(|plugin| plugin.tags.iter())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .cloned()
        .collect()
}
