use super::{ProfileReader, ProfileWriter, UserProfile};
use crate::storage::KeyValueStore;
use bazaar_types::{InteractionKind, Plugin};
use tracing::{debug, info, warn};

/// Storage key holding the JSON-serialized profile
pub const PROFILE_KEY: &str = "user_profile";

/// A [`UserProfile`] bound to the storage it is persisted in.
///
/// Every successful write is followed by a synchronous save. Storage
/// failures never surface; the in-memory profile keeps working.
pub struct ProfileStore<S> {
    profile: UserProfile,
    storage: S,
}

impl<S: KeyValueStore> ProfileStore<S> {
    /// Load the profile from storage, starting empty if it is absent or
    /// unreadable
    pub fn load(storage: S) -> Self {
        let profile = match storage.get(PROFILE_KEY) {
            None => {
                debug!("No stored profile, starting empty");
                UserProfile::new()
            }
            Some(raw) => match serde_json::from_str::<UserProfile>(&raw) {
                Ok(mut profile) => {
                    profile.sanitize();
                    info!(
                        "Loaded profile ({} tags, {} authors, {} keywords, total {:.1})",
                        profile.tag_count.len(),
                        profile.author_count.len(),
                        profile.keyword_count.len(),
                        profile.total_interactions
                    );
                    profile
                }
                Err(e) => {
                    warn!(
                        "Failed to parse stored profile: {} (at line {}, column {})",
                        e,
                        e.line(),
                        e.column()
                    );
                    UserProfile::new()
                }
            },
        };

        Self { profile, storage }
    }

    #[must_use]
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    fn save(&self) {
        match serde_json::to_string(&self.profile) {
            Ok(json) => self.storage.set(PROFILE_KEY, &json),
            Err(e) => warn!("Failed to serialize profile: {}", e),
        }
    }
}

impl<S> ProfileReader for ProfileStore<S> {
    fn total_interactions(&self) -> f64 {
        self.profile.total_interactions()
    }

    fn tag_weight(&self, tag: &str) -> f64 {
        self.profile.tag_weight(tag)
    }

    fn author_weight(&self, author: &str) -> f64 {
        self.profile.author_weight(author)
    }

    fn keyword_weights(&self) -> impl Iterator<Item = (&str, f64)> {
        self.profile.keyword_weights()
    }
}

impl<S: KeyValueStore> ProfileWriter for ProfileStore<S> {
    fn track_interaction(&mut self, kind: &InteractionKind, plugin: Option<&Plugin>) -> bool {
        let changed = self.profile.track_interaction(kind, plugin);
        if changed {
            debug!(
                "Tracked {} on {}",
                kind,
                plugin.map_or("", |p| p.name.as_str())
            );
            self.save();
        }
        changed
    }

    fn track_search(&mut self, query: &str) -> bool {
        let changed = self.profile.track_search(query);
        if changed {
            debug!("Tracked search {:?}", query);
            self.save();
        }
        changed
    }
}
