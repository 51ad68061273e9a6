//! Turn/match state machine
//!
//! Actions go in, effects come out. The engine never touches storage or
//! timers itself: it asks the caller to persist, purge, or schedule the
//! delayed mismatch reset, and ignores any reset whose token has gone stale.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::card::{CardFace, CardId, build_deck};
use super::state::{GameState, Phase, Snapshot};
use crate::consts::MISMATCH_DELAY_MS;

/// Input to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Discard the board and deal a fresh shuffled deck
    NewGame,
    /// Player picked a card
    Choose(CardId),
    /// The mismatch delay elapsed
    ResolveMismatch(ResetToken),
}

/// Identifies one pending mismatch reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetToken {
    /// Game generation the reset belongs to
    pub game: u64,
    /// Turn counter when the pair was chosen
    pub turn: u32,
}

/// Side effects requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Persist this snapshot
    Save(Snapshot),
    /// Delete any persisted snapshot
    Purge,
    /// Dispatch `ResolveMismatch(token)` after `delay_ms`
    ScheduleReset { token: ResetToken, delay_ms: u32 },
}

/// The game engine: owns the state, the face set and the shuffle RNG
pub struct Engine {
    state: GameState,
    faces: Vec<CardFace>,
    rng: Pcg32,
    mismatch_delay_ms: u32,
}

impl Engine {
    /// Start a fresh game
    pub fn new(faces: Vec<CardFace>, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let cards = build_deck(&faces, &mut rng);
        Self {
            state: GameState::new(cards, 0),
            faces,
            rng,
            mismatch_delay_ms: MISMATCH_DELAY_MS,
        }
    }

    /// Resume a saved game; later new games deal from `faces`
    pub fn restore(faces: Vec<CardFace>, seed: u64, snapshot: Snapshot) -> Self {
        Self {
            state: GameState::from_snapshot(snapshot, 0),
            faces,
            rng: Pcg32::seed_from_u64(seed),
            mismatch_delay_ms: MISMATCH_DELAY_MS,
        }
    }

    pub fn with_mismatch_delay(mut self, delay_ms: u32) -> Self {
        self.mismatch_delay_ms = delay_ms;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn is_won(&self) -> bool {
        self.state.is_won()
    }

    pub fn is_locked(&self) -> bool {
        self.state.locked
    }

    /// Apply one action
    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::NewGame => self.new_game(),
            Action::Choose(id) => self.choose(id),
            Action::ResolveMismatch(token) => self.resolve_mismatch(token),
        }
    }

    fn new_game(&mut self) -> Vec<Effect> {
        let cards = build_deck(&self.faces, &mut self.rng);
        let generation = self.state.generation + 1;
        self.state = GameState::new(cards, generation);
        log::info!(
            "New game: {} pairs (game {})",
            self.state.pair_count(),
            generation
        );
        vec![Effect::Purge]
    }

    fn choose(&mut self, id: CardId) -> Vec<Effect> {
        if self.state.locked {
            return Vec::new();
        }
        match self.state.card(id) {
            Some(card) if !card.is_flipped && !card.is_matched => {}
            _ => return Vec::new(),
        }

        match (self.state.choice_one, self.state.choice_two) {
            (None, _) => {
                self.flip(id);
                self.state.choice_one = Some(id);
                Vec::new()
            }
            (Some(first), None) if first != id => {
                self.flip(id);
                self.state.choice_two = Some(id);
                // Lock before the comparison result is known
                self.state.locked = true;
                self.compare(first, id)
            }
            _ => Vec::new(),
        }
    }

    fn flip(&mut self, id: CardId) {
        if let Some(card) = self.state.card_mut(id) {
            card.is_flipped = true;
        }
    }

    fn compare(&mut self, first: CardId, second: CardId) -> Vec<Effect> {
        let (Some(a), Some(b)) = (self.state.card(first), self.state.card(second)) else {
            return Vec::new();
        };

        if a.face_key != b.face_key {
            log::debug!("Mismatch: {} vs {}", a.face_key, b.face_key);
            return vec![Effect::ScheduleReset {
                token: ResetToken {
                    game: self.state.generation,
                    turn: self.state.turns,
                },
                delay_ms: self.mismatch_delay_ms,
            }];
        }

        let face_key = a.face_key.clone();
        for card in self.state.cards.iter_mut().filter(|c| c.face_key == face_key) {
            card.is_matched = true;
        }
        let pairs = self.state.pair_count() as u32;
        self.state.matches = (self.state.matches + 1).min(pairs);
        self.state.end_turn();
        log::info!(
            "Matched {} ({}/{} pairs, turn {})",
            face_key,
            self.state.matches,
            pairs,
            self.state.turns
        );

        if self.state.is_won() {
            log::info!("Puzzle solved in {} turns", self.state.turns);
            vec![Effect::Purge]
        } else {
            vec![Effect::Save(self.state.snapshot())]
        }
    }

    fn resolve_mismatch(&mut self, token: ResetToken) -> Vec<Effect> {
        let current = token.game == self.state.generation
            && token.turn == self.state.turns
            && self.state.phase() == Phase::Comparing;
        if !current {
            log::debug!("Ignoring stale mismatch reset {:?}", token);
            return Vec::new();
        }

        let chosen = [self.state.choice_one, self.state.choice_two];
        for card in self
            .state
            .cards
            .iter_mut()
            .filter(|c| chosen.contains(&Some(c.id)))
        {
            card.is_flipped = false;
        }
        self.state.end_turn();
        vec![Effect::Save(self.state.snapshot())]
    }
}
