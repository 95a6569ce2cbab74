//! Catalog loading and normalization.
//!
//! The marketplace publishes its catalog as one JSON object mapping plugin
//! name to a detail object. Loading turns that into a list of [`Plugin`]
//! records in source order.

mod http;

pub use http::HttpCatalog;

use crate::{Error, Result};
use bazaar_types::Plugin;
use serde_json::Value;
use std::future::Future;

/// Anything that can produce a full catalog in one shot
pub trait CatalogSource {
    /// Fetch and normalize the whole catalog
    fn fetch(&self) -> impl Future<Output = Result<Vec<Plugin>>> + Send;
}

/// Parse a raw catalog body
///
/// # Errors
///
/// Returns [`Error::Json`] for invalid JSON and [`Error::Payload`] when the
/// document is not an object.
pub fn parse_catalog(body: &str) -> Result<Vec<Plugin>> {
    let value: Value = serde_json::from_str(body)?;
    normalize_catalog(&value)
}

/// Turn a `name -> details` object into plugin records, keeping source order
///
/// # Errors
///
/// Returns [`Error::Payload`] when `value` is not a JSON object.
pub fn normalize_catalog(value: &Value) -> Result<Vec<Plugin>> {
    let Value::Object(entries) = value else {
        return Err(Error::Payload(format!(
            "expected an object of plugins, got {}",
            json_kind(value)
        )));
    };

    Ok(entries
        .iter()
        .map(|(name, details)| Plugin::from_entry(name, details))
        .collect())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
