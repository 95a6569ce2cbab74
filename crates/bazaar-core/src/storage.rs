//! Best-effort string key-value storage.
//!
//! Mirrors the semantics of browser local storage: reads return `None` when
//! the key is missing or the backing store cannot be read, writes that fail
//! are logged and dropped. Callers never see a storage error.

use crate::Result;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// String-keyed, string-valued persistent store
pub trait KeyValueStore {
    /// Read a value. Missing keys and unreadable storage both yield `None`.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value. Failures are swallowed.
    fn set(&self, key: &str, value: &str);
}

/// JSON-file backed store.
///
/// Every write re-reads the file and rewrites it whole, so several handles
/// to the same path stay consistent with each other.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_entry(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_entries().unwrap_or_else(|e| {
            warn!(
                "Discarding unreadable storage file {}: {}",
                self.path.display(),
                e
            );
            BTreeMap::new()
        });
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_entries() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                warn!("Failed to read storage {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        match self.write_entry(key, value) {
            Ok(()) => debug!("Stored {} ({} bytes)", key, value.len()),
            Err(e) => warn!(
                "Failed to write {} to storage {}: {}",
                key,
                self.path.display(),
                e
            ),
        }
    }
}

/// In-memory store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }
}
