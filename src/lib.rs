//! Memory Quest - A memory-matching card game
//!
//! Core modules:
//! - `sim`: Pure turn/match state machine (deck, counters, selection, lock)
//! - `persistence`: Snapshot save/load over a key-value store
//! - `session`: Wires the engine, persistence and the mismatch timer together
//! - `assets`: The static card face list
//! - `settings`: Player-tunable configuration

pub mod assets;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::{BoardView, CardView, Session};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// How long a mismatched pair stays face-up before flipping back
    pub const MISMATCH_DELAY_MS: u32 = 1000;

    /// Storage key for the in-progress game snapshot
    pub const SAVE_KEY: &str = "memory_quest_save";

    /// Storage key for player settings
    pub const SETTINGS_KEY: &str = "memory_quest_settings";
}
