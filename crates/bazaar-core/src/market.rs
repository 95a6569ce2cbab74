//! The marketplace state root.
//!
//! `Marketplace` owns everything the viewer needs: the loaded catalog, the
//! listing query, the affinity profile and the theme preference. Derived
//! views are recomputed from that state on every call.

use crate::browse::{self, PageView, QueryState};
use crate::catalog::CatalogSource;
use crate::config::{Config, RecommendConfig};
use crate::profile::{ProfileReader, ProfileStore, ProfileWriter, UserProfile};
use crate::scoring::{self, ScoredPlugin};
use crate::storage::KeyValueStore;
use crate::theme::ThemePreference;
use crate::{Error, Result};
use bazaar_types::{InteractionKind, Plugin, SortMode, Theme};
use tracing::{debug, error, info};

/// Identifies one catalog request. Only the newest ticket may replace the
/// catalog, so a slow response cannot overwrite a fresher one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

pub struct Marketplace<S> {
    catalog: Vec<Plugin>,
    is_loading: bool,
    latest_ticket: u64,
    query: QueryState,
    profile: ProfileStore<S>,
    theme: ThemePreference<S>,
    recommend: RecommendConfig,
}

impl<S: KeyValueStore + Clone> Marketplace<S> {
    /// Build the state root, reading profile and theme from `storage`
    pub fn new(storage: S, config: &Config) -> Self {
        Self {
            catalog: Vec::new(),
            is_loading: false,
            latest_ticket: 0,
            query: QueryState::new(config.browse.page_size),
            profile: ProfileStore::load(storage.clone()),
            theme: ThemePreference::load(storage),
            recommend: config.recommend.clone(),
        }
    }
}

impl<S: KeyValueStore> Marketplace<S> {
    // === Catalog ===

    #[must_use]
    pub fn catalog(&self) -> &[Plugin] {
        &self.catalog
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Look a plugin up by name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Plugin> {
        self.catalog.iter().find(|p| p.name == name)
    }

    /// Start a catalog request and mark the marketplace as loading
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_ticket += 1;
        self.is_loading = true;
        LoadTicket(self.latest_ticket)
    }

    /// Apply the outcome of the request identified by `ticket`.
    ///
    /// Results of superseded requests are dropped. A failed request empties
    /// the catalog. Returns whether the result was applied.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Vec<Plugin>>) -> bool {
        if ticket.0 != self.latest_ticket {
            debug!(
                "Discarding stale catalog response (ticket {}, latest {})",
                ticket.0, self.latest_ticket
            );
            return false;
        }

        self.catalog = match result {
            Ok(plugins) => {
                info!("Catalog loaded with {} plugins", plugins.len());
                plugins
            }
            Err(e) => {
                error!("Error loading plugins: {}", e);
                Vec::new()
            }
        };
        self.is_loading = false;
        true
    }

    /// Fetch the catalog from `source` and apply it
    pub async fn load<C: CatalogSource>(&mut self, source: &C) {
        let ticket = self.begin_load();
        let result = source.fetch().await;
        self.finish_load(ticket, result);
    }

    // === Query ===

    #[must_use]
    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.query.set_search_query(query);
    }

    pub fn set_selected_tag(&mut self, tag: Option<String>) {
        self.query.set_selected_tag(tag);
    }

    pub fn set_sort_by(&mut self, mode: SortMode) {
        self.query.set_sort_by(mode);
    }

    pub fn set_current_page(&mut self, page: usize) {
        self.query.set_current_page(page);
    }

    /// New shuffle for random mode
    pub fn reshuffle(&mut self) {
        self.query.reshuffle();
    }

    /// Pin the shuffle seed, for reproducible listings
    pub fn set_random_seed(&mut self, seed: f64) {
        self.query.set_random_seed(seed);
    }

    // === Derived views ===

    #[must_use]
    pub fn all_tags(&self) -> Vec<String> {
        browse::all_tags(&self.catalog)
    }

    #[must_use]
    pub fn filtered_plugins(&self) -> Vec<&Plugin> {
        browse::filtered_plugins(&self.catalog, &self.query)
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        browse::total_pages(self.filtered_plugins().len(), &self.query)
    }

    #[must_use]
    pub fn paginated_plugins(&self) -> Vec<&Plugin> {
        browse::paginate(&self.filtered_plugins(), &self.query).to_vec()
    }

    #[must_use]
    pub fn page_view(&self) -> PageView<'_> {
        browse::page_view(&self.catalog, &self.query)
    }

    #[must_use]
    pub fn recommended_for_you(&self) -> Vec<&Plugin> {
        scoring::recommended_for_you(
            &self.catalog,
            &self.profile,
            self.recommend.limit,
            self.recommend.cold_start_threshold,
        )
    }

    /// Plugins related to `name`
    ///
    /// # Errors
    ///
    /// Returns [`Error::PluginNotFound`] if `name` is not in the catalog.
    pub fn similar_plugins(&self, name: &str, k: Option<usize>) -> Result<Vec<ScoredPlugin<'_>>> {
        let target = self
            .find(name)
            .ok_or_else(|| Error::PluginNotFound(name.to_string()))?;
        Ok(scoring::similar_plugins(
            &self.catalog,
            target,
            k.unwrap_or(self.recommend.similar_limit),
        ))
    }

    /// Recommendation score of `name`
    ///
    /// # Errors
    ///
    /// Returns [`Error::PluginNotFound`] if `name` is not in the catalog.
    pub fn compute_score(&self, name: &str) -> Result<f64> {
        let plugin = self
            .find(name)
            .ok_or_else(|| Error::PluginNotFound(name.to_string()))?;
        Ok(scoring::compute_score(&self.catalog, &self.profile, plugin))
    }

    // === Profile ===

    #[must_use]
    pub fn profile(&self) -> &UserProfile {
        self.profile.profile()
    }

    /// Whether recommendations are still in the popularity fallback
    #[must_use]
    pub fn is_cold_start(&self) -> bool {
        self.profile.total_interactions() < self.recommend.cold_start_threshold
    }

    /// Record an interaction with the plugin called `name`.
    /// Unknown names are ignored.
    pub fn track_interaction(&mut self, kind: &InteractionKind, name: &str) -> bool {
        let plugin = self.catalog.iter().find(|p| p.name == name);
        self.profile.track_interaction(kind, plugin)
    }

    /// Record an impression for every plugin in `names`
    pub fn track_impressions<'n>(&mut self, names: impl IntoIterator<Item = &'n str>) {
        for name in names {
            self.track_interaction(&InteractionKind::Impression, name);
        }
    }

    pub fn track_search(&mut self, query: &str) -> bool {
        self.profile.track_search(query)
    }

    // === Theme ===

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme.theme()
    }

    #[must_use]
    pub fn is_dark_mode(&self) -> bool {
        self.theme.is_dark()
    }

    pub fn set_dark_mode(&mut self, dark: bool) {
        self.theme.set_dark_mode(dark);
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme.toggle()
    }
}
