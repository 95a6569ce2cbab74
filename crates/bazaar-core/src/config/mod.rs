mod dirs;
mod settings;
mod validation;

pub use dirs::Directories;
pub use settings::{BrowseConfig, CatalogConfig, Config, DEFAULT_CATALOG_URL, RecommendConfig};
pub use validation::warn_unknown_fields;
