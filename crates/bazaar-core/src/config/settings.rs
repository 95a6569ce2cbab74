use crate::browse::PAGE_SIZE;
use crate::scoring::{COLD_START_THRESHOLD, RECOMMEND_LIMIT, SIMILAR_LIMIT};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Published marketplace catalog
pub const DEFAULT_CATALOG_URL: &str = "https://raw.githubusercontent.com/IGCrystal-NEO/Astrbot_Plugins_Market/main/plugin_cache_original.json";

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub browse: BrowseConfig,

    #[serde(default)]
    pub recommend: RecommendConfig,
}

impl Config {
    /// Load config from file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid JSON,
    /// or holds values that fail [`Config::validate`].
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        super::validation::warn_unknown_fields(&content, "config.json");
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the engine cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.catalog.url.trim().is_empty() {
            return Err(Error::Config("catalog.url must not be empty".to_string()));
        }
        if self.catalog.timeout_secs == 0 {
            return Err(Error::Config(
                "catalog.timeoutSecs must be positive".to_string(),
            ));
        }
        if self.browse.page_size == 0 {
            return Err(Error::Config("browse.pageSize must be positive".to_string()));
        }
        if !self.recommend.cold_start_threshold.is_finite()
            || self.recommend.cold_start_threshold < 0.0
        {
            return Err(Error::Config(
                "recommend.coldStartThreshold must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where and how the catalog is fetched
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_url")]
    pub url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl CatalogConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    15
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: default_catalog_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Listing options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    PAGE_SIZE
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Recommendation and related-plugin options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendConfig {
    #[serde(default = "default_recommend_limit")]
    pub limit: usize,

    #[serde(default = "default_similar_limit")]
    pub similar_limit: usize,

    /// Accumulated interaction weight below which recommendations fall back
    /// to the most popular plugins
    #[serde(default = "default_cold_start_threshold")]
    pub cold_start_threshold: f64,
}

fn default_recommend_limit() -> usize {
    RECOMMEND_LIMIT
}
fn default_similar_limit() -> usize {
    SIMILAR_LIMIT
}
fn default_cold_start_threshold() -> f64 {
    COLD_START_THRESHOLD
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            limit: default_recommend_limit(),
            similar_limit: default_similar_limit(),
            cold_start_threshold: default_cold_start_threshold(),
        }
    }
}
