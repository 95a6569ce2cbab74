//! Config validation - warns about unknown fields

use serde_json::{Map, Value};
use tracing::warn;

/// Shape of one config object: each known key is either a plain value or a
/// nested section with its own keys.
enum Key {
    Value,
    Section(&'static [(&'static str, Key)]),
}

/// Keys understood by `Config` (settings.rs)
const CONFIG_KEYS: &[(&str, Key)] = &[
    (
        "catalog",
        Key::Section(&[("url", Key::Value), ("timeoutSecs", Key::Value)]),
    ),
    ("browse", Key::Section(&[("pageSize", Key::Value)])),
    (
        "recommend",
        Key::Section(&[
            ("limit", Key::Value),
            ("similarLimit", Key::Value),
            ("coldStartThreshold", Key::Value),
        ]),
    ),
];

/// Validate JSON config and warn about unknown fields.
pub fn warn_unknown_fields(content: &str, config_name: &str) {
    let Ok(Value::Object(root)) = serde_json::from_str::<Value>(content) else {
        return;
    };

    let mut unknowns = Vec::new();
    collect_unknown(&root, CONFIG_KEYS, "", &mut unknowns);
    for path in unknowns {
        warn!("Unknown config field in {config_name}: {path}");
    }
}

/// Push the dotted path of every key in `object` that `known` does not list.
/// Sections are only descended into when they hold an object.
fn collect_unknown(
    object: &Map<String, Value>,
    known: &[(&str, Key)],
    prefix: &str,
    out: &mut Vec<String>,
) {
    for (key, child) in object {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        match known.iter().find(|(name, _)| *name == key.as_str()).map(|(_, k)| k) {
            None => out.push(path),
            Some(Key::Section(keys)) => {
                if let Value::Object(section) = child {
                    collect_unknown(section, keys, &path, out);
                }
            }
            Some(Key::Value) => {}
        }
    }
}
