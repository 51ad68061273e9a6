//! Game logic
//!
//! All gameplay rules live here. This module must stay pure:
//! - No storage, timers or DOM access
//! - Seeded RNG only
//! - Side effects are returned to the caller as `Effect`s

pub mod card;
pub mod engine;
pub mod state;

pub use card::{Card, CardFace, CardId, build_deck, pair_count};
pub use engine::{Action, Effect, Engine, ResetToken};
pub use state::{GameState, Phase, Snapshot};
