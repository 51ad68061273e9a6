//! Game session
//!
//! Owns the engine, the snapshot store and the one pending mismatch timer.
//! The platform layer feeds clicks and the current time in, and renders
//! `view()` back out.

use crate::persistence::{KeyValueStore, SnapshotStore};
use crate::settings::Settings;
use crate::sim::{Action, CardId, Effect, Engine, ResetToken};

/// Per-card render state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: CardId,
    pub face_key: String,
    pub image_ref: String,
    /// Show the face side
    pub flipped: bool,
    pub matched: bool,
    /// Ignore clicks
    pub disabled: bool,
}

/// Everything the board needs to draw one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub cards: Vec<CardView>,
    pub turns: u32,
    pub matches: u32,
    pub is_won: bool,
    /// The New Game button is unavailable while a pair is being compared
    pub new_game_disabled: bool,
}

#[derive(Debug, Clone, Copy)]
struct PendingReset {
    token: ResetToken,
    due_at_ms: f64,
}

/// A running game wired to persistence
pub struct Session<S: KeyValueStore> {
    engine: Engine,
    store: SnapshotStore<S>,
    pending: Option<PendingReset>,
}

impl<S: KeyValueStore> Session<S> {
    /// Resume the saved game if there is a usable one, otherwise deal a new one
    pub fn start(storage: S, settings: &Settings, seed: u64) -> Self {
        let mut store = SnapshotStore::new(storage, settings.save_key.clone());
        let engine = match store.load() {
            Some(snapshot) => {
                log::info!(
                    "Resuming saved game (turn {}, {} matches)",
                    snapshot.turns,
                    snapshot.matches
                );
                Engine::restore(settings.faces(), seed, snapshot)
            }
            None => {
                log::info!("Starting new game with seed: {}", seed);
                Engine::new(settings.faces(), seed)
            }
        };

        Self {
            engine: engine.with_mismatch_delay(settings.mismatch_delay_ms),
            store,
            pending: None,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn store(&self) -> &SnapshotStore<S> {
        &self.store
    }

    /// A mismatched pair is waiting to flip back
    pub fn has_pending_reset(&self) -> bool {
        self.pending.is_some()
    }

    /// Player clicked a card
    pub fn select(&mut self, id: CardId, now_ms: f64) {
        self.run(Action::Choose(id), now_ms);
    }

    /// Deal a fresh deck, dropping any pending mismatch reset
    pub fn new_game(&mut self, now_ms: f64) {
        self.pending = None;
        self.run(Action::NewGame, now_ms);
    }

    /// Advance the clock, firing the mismatch reset once it is due
    pub fn update(&mut self, now_ms: f64) {
        let Some(pending) = self.pending else {
            return;
        };
        if now_ms >= pending.due_at_ms {
            self.pending = None;
            self.run(Action::ResolveMismatch(pending.token), now_ms);
        }
    }

    fn run(&mut self, action: Action, now_ms: f64) {
        let effects = self.engine.dispatch(action);
        for effect in effects {
            match effect {
                Effect::Save(snapshot) => self.store.save(&snapshot),
                Effect::Purge => self.store.clear(),
                Effect::ScheduleReset { token, delay_ms } => {
                    self.pending = Some(PendingReset {
                        token,
                        due_at_ms: now_ms + f64::from(delay_ms),
                    });
                }
            }
        }
    }

    /// Render state for the current frame
    pub fn view(&self) -> BoardView {
        let state = self.engine.state();
        BoardView {
            cards: state
                .cards
                .iter()
                .map(|card| CardView {
                    id: card.id,
                    face_key: card.face_key.clone(),
                    image_ref: card.image_ref.clone(),
                    flipped: card.is_face_up(),
                    matched: card.is_matched,
                    disabled: state.locked || card.is_matched,
                })
                .collect(),
            turns: state.turns,
            matches: state.matches,
            is_won: state.is_won(),
            new_game_disabled: state.locked,
        }
    }
}
