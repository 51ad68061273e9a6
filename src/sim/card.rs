//! Cards and deck construction

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Card instance ID (unique within a deck, 1..=2N)
pub type CardId = u32;

/// One entry of the asset list: a face shared by exactly two cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardFace {
    pub face_key: String,
    pub image_ref: String,
}

impl CardFace {
    pub fn new(face_key: impl Into<String>, image_ref: impl Into<String>) -> Self {
        Self {
            face_key: face_key.into(),
            image_ref: image_ref.into(),
        }
    }
}

/// A card on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    /// Identifies the pair
    pub face_key: String,
    pub image_ref: String,
    /// Face-up as part of the current selection (or left up after a match)
    pub is_flipped: bool,
    /// Pair found; stays face-up for the rest of the game
    pub is_matched: bool,
}

impl Card {
    pub fn new(id: CardId, face: &CardFace) -> Self {
        Self {
            id,
            face_key: face.face_key.clone(),
            image_ref: face.image_ref.clone(),
            is_flipped: false,
            is_matched: false,
        }
    }

    /// Shown face-up by the board
    pub fn is_face_up(&self) -> bool {
        self.is_flipped || self.is_matched
    }
}

/// Build a shuffled deck of 2N face-down cards.
///
/// Every face is duplicated, the 2N cards are permuted with a Fisher-Yates
/// shuffle, then numbered 1..=2N in their final board order.
pub fn build_deck<R: Rng + ?Sized>(faces: &[CardFace], rng: &mut R) -> Vec<Card> {
    let mut order: Vec<&CardFace> = faces.iter().chain(faces.iter()).collect();
    order.shuffle(rng);

    order
        .into_iter()
        .zip(1..)
        .map(|(face, id)| Card::new(id, face))
        .collect()
}

/// Number of distinct face keys in a deck
pub fn pair_count(cards: &[Card]) -> usize {
    let mut keys: Vec<&str> = cards.iter().map(|c| c.face_key.as_str()).collect();
    keys.sort_unstable();
    keys.dedup();
    keys.len()
}
