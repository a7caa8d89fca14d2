//! Persisted theme preference.

use crate::config::StorageKeys;
use crate::ports::key_value_store::KeyValueStore;
use mindmingle_domain::Theme;
use std::sync::Arc;
use tracing::{debug, warn};

/// Loads and toggles the installation-wide colour theme.
pub struct ThemeSettings {
    store: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
    fallback: Theme,
}

impl ThemeSettings {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self {
            store,
            keys,
            fallback: Theme::default(),
        }
    }

    /// Theme used while nothing has been stored yet.
    pub fn with_fallback(mut self, theme: Theme) -> Self {
        self.fallback = theme;
        self
    }

    pub fn current(&self) -> Theme {
        let raw = match self.store.get(&self.keys.theme()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return self.fallback,
            Err(e) => {
                warn!("Failed to read theme: {}", e);
                return self.fallback;
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|_| {
            debug!("Unknown stored theme {}, using {}", raw, self.fallback);
            self.fallback
        })
    }

    /// Flip between dark and light and persist the result.
    pub fn toggle(&self) -> Theme {
        let next = self.current().toggled();
        self.set(next);
        next
    }

    pub fn set(&self, theme: Theme) {
        let json = format!("\"{}\"", theme.as_str());
        if let Err(e) = self.store.set(&self.keys.theme(), &json) {
            warn!("Failed to save theme: {}", e);
        }
    }
}
