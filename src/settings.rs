//! Game settings
//!
//! Persisted separately from the game save, in the same key-value store.

use serde::{Deserialize, Serialize};

use crate::assets::default_faces;
use crate::consts::{MISMATCH_DELAY_MS, SAVE_KEY, SETTINGS_KEY};
use crate::persistence::{KeyValueStore, PersistError};
use crate::sim::CardFace;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How long a mismatched pair stays visible (ms)
    pub mismatch_delay_ms: u32,
    /// Pairs on the board, taken from the front of the asset list
    pub pair_count: usize,
    /// Storage key for the in-progress game
    pub save_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mismatch_delay_ms: MISMATCH_DELAY_MS,
            pair_count: crate::assets::DEFAULT_FACES.len(),
            save_key: SAVE_KEY.to_string(),
        }
    }
}

impl Settings {
    /// Faces dealt into each new game (at least one pair, at most the full set)
    pub fn faces(&self) -> Vec<CardFace> {
        let mut faces = default_faces();
        faces.truncate(self.pair_count.clamp(1, faces.len()));
        faces
    }

    /// Load settings, falling back to defaults when missing or unreadable
    pub fn load<S: KeyValueStore>(storage: &S) -> Self {
        match storage.get(SETTINGS_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Failed to read settings: {}", e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings; failures are logged only
    pub fn save<S: KeyValueStore>(&self, storage: &mut S) {
        let result = serde_json::to_string(self)
            .map_err(PersistError::from)
            .and_then(|json| storage.set(SETTINGS_KEY, &json));
        match result {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }
}
