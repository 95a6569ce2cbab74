use crate::storage::KeyValueStore;
use bazaar_types::Theme;
use tracing::{debug, warn};

/// Storage key holding `"dark"` or `"light"`
pub const THEME_KEY: &str = "theme";

/// Persisted color scheme preference
pub struct ThemePreference<S> {
    theme: Theme,
    storage: S,
}

impl<S: KeyValueStore> ThemePreference<S> {
    /// Read the stored preference, defaulting to light
    pub fn load(storage: S) -> Self {
        let theme = match storage.get(THEME_KEY) {
            None => Theme::default(),
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("Ignoring stored theme: {}", e);
                Theme::default()
            }),
        };
        debug!("Theme preference: {}", theme);
        Self { theme, storage }
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.theme.is_dark()
    }

    /// Set the flag and persist it
    pub fn set_dark_mode(&mut self, dark: bool) {
        self.theme = Theme::from_dark(dark);
        self.storage.set(THEME_KEY, self.theme.as_str());
    }

    /// Flip the flag and persist it; returns the new theme
    pub fn toggle(&mut self) -> Theme {
        self.set_dark_mode(!self.is_dark());
        self.theme
    }
}
