//! Game state and the persisted snapshot
//!
//! `GameState` holds everything the board needs; `Snapshot` is the subset that
//! survives a reload (no selection, no input lock).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::card::{Card, CardId, pair_count};

/// Turn phase, derived from the selection and counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No card chosen this turn
    Idle,
    /// First card face-up
    OneChosen,
    /// Second card face-up, input locked until the pair resolves
    Comparing,
    /// Every pair found
    Won,
}

/// Persisted subset of the game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub cards: Vec<Card>,
    pub turns: u32,
    pub matches: u32,
}

impl Snapshot {
    /// Check the snapshot describes a resumable, not-yet-won game
    pub fn validate(&self) -> Result<(), String> {
        if self.cards.is_empty() {
            return Err("deck is empty".into());
        }
        if self.cards.len() % 2 != 0 {
            return Err(format!("deck has odd size {}", self.cards.len()));
        }

        let mut ids: Vec<CardId> = self.cards.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != self.cards.len() {
            return Err("duplicate card ids".into());
        }
        let max_id = self.cards.len() as CardId;
        if let Some(id) = ids.iter().find(|&&id| id == 0 || id > max_id) {
            return Err(format!("card id {} outside 1..={}", id, max_id));
        }

        let mut pairs: HashMap<&str, Vec<&Card>> = HashMap::new();
        for card in &self.cards {
            pairs.entry(card.face_key.as_str()).or_default().push(card);
        }
        let mut matched_pairs = 0;
        for (key, cards) in &pairs {
            if cards.len() != 2 {
                return Err(format!("face '{}' appears {} times", key, cards.len()));
            }
            if cards[0].is_matched != cards[1].is_matched {
                return Err(format!("face '{}' is half matched", key));
            }
            if cards[0].is_matched {
                matched_pairs += 1;
            }
        }

        if self.matches != matched_pairs {
            return Err(format!(
                "matches {} disagrees with {} matched pairs",
                self.matches, matched_pairs
            ));
        }
        if self.matches as usize >= pairs.len() {
            return Err("snapshot is already won".into());
        }
        if self.turns < self.matches {
            return Err(format!("turns {} below matches {}", self.turns, self.matches));
        }
        Ok(())
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub cards: Vec<Card>,
    /// Completed two-card attempts
    pub turns: u32,
    /// Pairs found
    pub matches: u32,
    pub choice_one: Option<CardId>,
    pub choice_two: Option<CardId>,
    /// Input lock, held while a pair is being compared
    pub locked: bool,
    /// Bumped on every new game so stale timers can be recognized
    pub generation: u64,
}

impl GameState {
    /// Fresh game over an already-built deck
    pub fn new(cards: Vec<Card>, generation: u64) -> Self {
        Self {
            cards,
            turns: 0,
            matches: 0,
            choice_one: None,
            choice_two: None,
            locked: false,
            generation,
        }
    }

    /// Resume from a snapshot; mid-turn flips are put back face-down
    pub fn from_snapshot(snapshot: Snapshot, generation: u64) -> Self {
        let mut cards = snapshot.cards;
        for card in cards.iter_mut().filter(|c| !c.is_matched) {
            card.is_flipped = false;
        }
        Self {
            cards,
            turns: snapshot.turns,
            matches: snapshot.matches,
            choice_one: None,
            choice_two: None,
            locked: false,
            generation,
        }
    }

    /// Persisted view of this state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cards: self.cards.clone(),
            turns: self.turns,
            matches: self.matches,
        }
    }

    /// N, the number of distinct faces on the board
    pub fn pair_count(&self) -> usize {
        pair_count(&self.cards)
    }

    /// True once every pair is found (never for an empty deck)
    pub fn is_won(&self) -> bool {
        let pairs = self.pair_count();
        pairs > 0 && self.matches as usize == pairs
    }

    pub fn phase(&self) -> Phase {
        if self.is_won() {
            Phase::Won
        } else if self.choice_two.is_some() {
            Phase::Comparing
        } else if self.choice_one.is_some() {
            Phase::OneChosen
        } else {
            Phase::Idle
        }
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    /// End the current turn: drop the selection, unlock input, count the turn
    pub fn end_turn(&mut self) {
        self.choice_one = None;
        self.choice_two = None;
        self.locked = false;
        self.turns = self.turns.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::card::CardFace;

    fn deck(keys: &[&str]) -> Vec<Card> {
        keys.iter()
            .zip(1..)
            .map(|(key, id)| Card::new(id, &CardFace::new(*key, format!("/images/{key}.jpg"))))
            .collect()
    }

    fn snapshot(keys: &[&str]) -> Snapshot {
        Snapshot {
            cards: deck(keys),
            turns: 0,
            matches: 0,
        }
    }

    #[test]
    fn test_empty_deck_is_not_won() {
        let state = GameState::new(Vec::new(), 0);
        assert_eq!(state.pair_count(), 0);
        assert!(!state.is_won());
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_phase_follows_selection() {
        let mut state = GameState::new(deck(&["A", "B", "A", "B"]), 0);
        assert_eq!(state.phase(), Phase::Idle);
        state.choice_one = Some(1);
        assert_eq!(state.phase(), Phase::OneChosen);
        state.choice_two = Some(2);
        assert_eq!(state.phase(), Phase::Comparing);
        state.matches = 2;
        assert_eq!(state.phase(), Phase::Won);
    }

    #[test]
    fn test_validate_accepts_fresh_deck() {
        assert_eq!(snapshot(&["A", "B", "A", "B"]).validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_shapes() {
        assert!(snapshot(&[]).validate().is_err());
        assert!(snapshot(&["A", "B", "A"]).validate().is_err());
        assert!(snapshot(&["A", "A", "A", "A"]).validate().is_err());

        let mut dup_ids = snapshot(&["A", "B", "A", "B"]);
        dup_ids.cards[1].id = 1;
        assert!(dup_ids.validate().is_err());

        let mut out_of_range = snapshot(&["A", "B", "A", "B"]);
        out_of_range.cards[3].id = 5;
        assert!(out_of_range.validate().is_err());

        let mut zero_id = snapshot(&["A", "B", "A", "B"]);
        zero_id.cards[0].id = 0;
        assert!(zero_id.validate().is_err());

        let mut half = snapshot(&["A", "B", "A", "B"]);
        half.cards[0].is_matched = true;
        half.matches = 1;
        half.turns = 1;
        assert!(half.validate().is_err());

        let mut miscounted = snapshot(&["A", "B", "A", "B"]);
        miscounted.matches = 1;
        miscounted.turns = 1;
        assert!(miscounted.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_won_snapshot() {
        let mut won = snapshot(&["A", "A"]);
        for card in &mut won.cards {
            card.is_matched = true;
            card.is_flipped = true;
        }
        won.matches = 1;
        won.turns = 1;
        assert!(won.validate().is_err());
    }

    #[test]
    fn test_end_turn_saturates_turn_counter() {
        let mut state = GameState::new(deck(&["A", "B", "A", "B"]), 0);
        state.turns = u32::MAX;
        state.choice_one = Some(1);
        state.choice_two = Some(2);
        state.locked = true;
        state.end_turn();
        assert_eq!(state.turns, u32::MAX);
        assert_eq!(state.choice_one, None);
        assert_eq!(state.choice_two, None);
        assert!(!state.locked);
    }

    #[test]
    fn test_from_snapshot_drops_mid_turn_flips() {
        let mut snap = snapshot(&["A", "B", "A", "B"]);
        snap.cards[0].is_flipped = true;
        snap.cards[0].is_matched = true;
        snap.cards[2].is_flipped = true;
        snap.cards[2].is_matched = true;
        snap.cards[1].is_flipped = true;
        snap.matches = 1;
        snap.turns = 3;

        let state = GameState::from_snapshot(snap, 7);
        assert!(state.cards[0].is_flipped);
        assert!(!state.cards[1].is_flipped);
        assert_eq!(state.turns, 3);
        assert_eq!(state.matches, 1);
        assert_eq!(state.choice_one, None);
        assert!(!state.locked);
        assert_eq!(state.generation, 7);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snap = snapshot(&["A", "A"]);
        let value = serde_json::to_value(&snap).unwrap();
        assert!(value["cards"].is_array());
        assert_eq!(value["turns"], 0);
        assert_eq!(value["matches"], 0);
        assert_eq!(value["cards"][0]["faceKey"], "A");
    }
}
