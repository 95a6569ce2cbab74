use bazaar_types::SortMode;
use serde::Serialize;

/// Default number of plugins per page
pub const PAGE_SIZE: usize = 12;

/// User-controlled listing parameters.
///
/// The random seed is re-rolled only when the sort mode switches into
/// [`SortMode::Random`] or on an explicit [`QueryState::reshuffle`], so a
/// shuffled listing stays put while the user pages, searches or filters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryState {
    search_query: String,
    selected_tag: Option<String>,
    sort_by: SortMode,
    current_page: usize,
    page_size: usize,
    random_seed: f64,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl QueryState {
    /// Fresh state on page 1. A zero page size falls back to [`PAGE_SIZE`].
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            search_query: String::new(),
            selected_tag: None,
            sort_by: SortMode::Default,
            current_page: 1,
            page_size: if page_size == 0 { PAGE_SIZE } else { page_size },
            random_seed: roll_seed(),
        }
    }

    /// Pin the shuffle seed. Values outside `[0, 1)` are wrapped into range.
    #[must_use]
    pub fn with_seed(mut self, seed: f64) -> Self {
        self.set_random_seed(seed);
        self
    }

    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    #[must_use]
    pub fn selected_tag(&self) -> Option<&str> {
        self.selected_tag.as_deref()
    }

    #[must_use]
    pub fn sort_by(&self) -> SortMode {
        self.sort_by
    }

    #[must_use]
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn random_seed(&self) -> f64 {
        self.random_seed
    }

    /// Replace the search text and go back to page 1
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.current_page = 1;
    }

    /// Select a tag (empty clears it) and go back to page 1
    pub fn set_selected_tag(&mut self, tag: Option<String>) {
        self.selected_tag = tag.filter(|t| !t.is_empty());
        self.current_page = 1;
    }

    /// Change the sort mode and go back to page 1.
    ///
    /// Entering random mode from any other mode rolls a new seed.
    pub fn set_sort_by(&mut self, mode: SortMode) {
        if mode == SortMode::Random && self.sort_by != SortMode::Random {
            self.random_seed = roll_seed();
        }
        self.sort_by = mode;
        self.current_page = 1;
    }

    /// Pin the shuffle seed, wrapping it into `[0, 1)`
    pub fn set_random_seed(&mut self, seed: f64) {
        self.random_seed = normalize_seed(seed);
    }

    /// Roll a new shuffle seed without touching anything else
    pub fn reshuffle(&mut self) {
        self.random_seed = roll_seed();
    }

    /// Jump to a page; pages are 1-based and clamped at 1
    pub fn set_current_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }
}

fn roll_seed() -> f64 {
    rand::random::<f64>()
}

fn normalize_seed(seed: f64) -> f64 {
    if !seed.is_finite() {
        return 0.0;
    }
    let wrapped = seed.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}
