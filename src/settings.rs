//! Player preferences
//!
//! Persisted separately from level progress.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, load_json, save_json};

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Super-dense birds. Only honoured once every standard level is starred.
    pub max_density: bool,
    /// Manual pan speed override (pixels per frame)
    pub pan_speed: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_density: false,
            pan_speed: crate::consts::PAN_SPEED,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "settings";

    /// Load settings, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json(store, Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        save_json(store, Self::STORAGE_KEY, self);
        log::info!("Settings saved");
    }

    /// Whether max density is actually in effect
    pub fn effective_max_density(&self, allowed: bool) -> bool {
        self.max_density && allowed
    }
}
