//! Shared types for Bazaar marketplace components.
//!
//! This crate provides the plugin record and the small enums used across
//! bazaar-core and bazaar-cli. All types are serializable so they can be
//! persisted or printed as JSON.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Fields of a catalog entry that map onto named `Plugin` fields.
/// Everything else is kept in `Plugin::extra`.
const KNOWN_FIELDS: &[&str] = &[
    "name",
    "desc",
    "author",
    "tags",
    "stars",
    "updated_at",
    "repo",
    "version",
    "social_link",
    "logo",
];

/// Deserialize tags that may be a single string, an array, null or missing
fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(|v| tags_from_value(&v)).unwrap_or_default())
}

fn tags_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::String(tag) => vec![tag.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

/// Read a star count leniently: integers, non-negative floats (truncated)
/// and numeric strings are accepted, anything else is treated as absent.
// Star counts are far below 2^53, truncation is the intent
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn stars_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read an optional text field. Numbers are stringified, blanks and other
/// shapes are treated as absent.
fn text_from_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A single marketplace plugin.
///
/// Identity is `name`. Optional fields that are missing or malformed in the
/// catalog are defaulted rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plugin {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stars: Option<u64>,

    /// Last update time as published by the catalog (not validated)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,

    /// Catalog fields without a dedicated slot, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Plugin {
    /// Create a plugin with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build a plugin from one `name -> details` entry of the catalog.
    ///
    /// A single-string `tags` becomes a one-element list, a missing `tags`
    /// becomes empty. A `details` value that is not an object yields a
    /// plugin that only carries its name.
    pub fn from_entry(name: &str, details: &Value) -> Self {
        let Value::Object(obj) = details else {
            return Self::new(name);
        };

        let extra = obj
            .iter()
            .filter(|(key, _)| !KNOWN_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            name: name.to_string(),
            desc: text_from_value(obj.get("desc")),
            author: text_from_value(obj.get("author")),
            tags: obj.get("tags").map(tags_from_value).unwrap_or_default(),
            stars: obj.get("stars").and_then(stars_from_value),
            updated_at: text_from_value(obj.get("updated_at")),
            repo: text_from_value(obj.get("repo")),
            version: text_from_value(obj.get("version")),
            social_link: text_from_value(obj.get("social_link")),
            logo: text_from_value(obj.get("logo")),
            extra,
        }
    }

    /// Star count, missing treated as zero
    #[must_use]
    pub fn star_count(&self) -> u64 {
        self.stars.unwrap_or(0)
    }

    /// Exact tag membership
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Author, if present and not blank
    #[must_use]
    pub fn author_name(&self) -> Option<&str> {
        self.author.as_deref().filter(|a| !a.trim().is_empty())
    }

    /// Case-insensitive substring match against name, description and author.
    /// `needle` must already be lower-cased. An empty needle matches.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let contains = |field: Option<&str>| {
            field.is_some_and(|value| value.to_lowercase().contains(needle))
        };
        contains(Some(self.name.as_str()))
            || contains(self.desc.as_deref())
            || contains(self.author_name())
    }
}

/// Ordering applied to the filtered catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Catalog order
    #[default]
    Default,
    /// Most stars first
    Stars,
    /// Most recently updated first
    Updated,
    /// Seeded shuffle
    Random,
}

impl SortMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Stars => "stars",
            Self::Updated => "updated",
            Self::Random => "random",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown sort mode or theme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

impl FromStr for SortMode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "stars" => Ok(Self::Stars),
            "updated" => Ok(Self::Updated),
            "random" => Ok(Self::Random),
            _ => Err(ParseEnumError {
                kind: "sort mode",
                value: s.to_string(),
            }),
        }
    }
}

/// A user action that feeds the affinity profile.
///
/// Unrecognized kinds are kept as `Other` and weighted with the fallback
/// weight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InteractionKind {
    Impression,
    Open,
    Detail,
    Copy,
    Social,
    Favorite,
    Other(String),
}

impl InteractionKind {
    pub const FALLBACK_WEIGHT: f64 = 0.5;

    /// Weight added to the profile for one event of this kind
    #[must_use]
    pub fn weight(&self) -> f64 {
        match self {
            Self::Impression => 0.2,
            Self::Open | Self::Social => 1.0,
            Self::Detail => 1.2,
            Self::Copy => 1.5,
            Self::Favorite => 2.0,
            Self::Other(_) => Self::FALLBACK_WEIGHT,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Impression => "impression",
            Self::Open => "open",
            Self::Detail => "detail",
            Self::Copy => "copy",
            Self::Social => "social",
            Self::Favorite => "favorite",
            Self::Other(kind) => kind,
        }
    }
}

impl From<&str> for InteractionKind {
    fn from(s: &str) -> Self {
        match s {
            "impression" => Self::Impression,
            "open" => Self::Open,
            "detail" => Self::Detail,
            "copy" => Self::Copy,
            "social" => Self::Social,
            "favorite" => Self::Favorite,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for InteractionKind {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<InteractionKind> for String {
    fn from(kind: InteractionKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color scheme preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    #[must_use]
    pub fn from_dark(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        Self::from_dark(!self.is_dark())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            _ => Err(ParseEnumError {
                kind: "theme",
                value: s.to_string(),
            }),
        }
    }
}


/// Property-based tests for catalog normalization.
#[cfg(test)]
mod proptest_normalization_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_json_string() -> impl Strategy<Value = String> {
        proptest::string::string_regex("[a-zA-Z0-9_\\-. ]{0,40}")
            .unwrap()
            .boxed()
    }

    fn arb_leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| Value::Number(n.into())),
            arb_json_string().prop_map(Value::String),
        ]
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        arb_leaf().prop_recursive(3, 32, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::hash_map(
                    prop_oneof![
                        Just("tags".to_string()),
                        Just("stars".to_string()),
                        Just("desc".to_string()),
                        Just("author".to_string()),
                        arb_json_string(),
                    ],
                    inner,
                    0..6
                )
                .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn from_entry_never_loses_name(name in arb_json_string(), details in arb_value()) {
            let plugin = Plugin::from_entry(&name, &details);
            prop_assert_eq!(plugin.name, name);
        }

        #[test]
        fn from_entry_tags_are_strings_from_source(details in arb_value()) {
            let plugin = Plugin::from_entry("p", &details);
            let source = details.get("tags").cloned().unwrap_or(Value::Null);
            for tag in &plugin.tags {
                let found = match &source {
                    Value::String(s) => s == tag,
                    Value::Array(items) => items.iter().any(|v| v.as_str() == Some(tag)),
                    _ => false,
                };
                prop_assert!(found);
            }
        }
    }
}
