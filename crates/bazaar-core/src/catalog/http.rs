use super::{CatalogSource, parse_catalog};
use crate::config::CatalogConfig;
use crate::{Error, Result};
use bazaar_types::Plugin;
use std::time::Duration;
use tracing::{debug, info};

/// Catalog served over HTTP
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    url: String,
    client: reqwest::Client,
}

impl HttpCatalog {
    /// Create a client for `url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Create a client from the `catalog` config section.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        Self::new(config.url.clone(), config.timeout())
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl CatalogSource for HttpCatalog {
    async fn fetch(&self) -> Result<Vec<Plugin>> {
        debug!("Fetching catalog from {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let plugins = parse_catalog(&body)?;
        info!("Fetched {} plugins from {}", plugins.len(), self.url);
        Ok(plugins)
    }
}
