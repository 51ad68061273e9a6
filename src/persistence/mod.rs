//! Save/load of the in-progress game
//!
//! Features:
//! - JSON snapshot under a single fixed key
//! - Shape validation on load
//! - Corrupt entries are deleted so they never fail twice
//! - Failures are logged and swallowed; the worst case is a fresh game

pub mod error;
pub mod storage;

pub use error::{PersistError, Result};
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStore;
pub use storage::{KeyValueStore, MemoryStore};

use crate::sim::Snapshot;

/// Snapshot persistence over a key-value store
pub struct SnapshotStore<S: KeyValueStore> {
    storage: S,
    key: String,
}

impl<S: KeyValueStore> SnapshotStore<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Persist a snapshot. Empty decks are skipped; failures are logged only.
    pub fn save(&mut self, snapshot: &Snapshot) {
        if snapshot.cards.is_empty() {
            return;
        }
        match self.try_save(snapshot) {
            Ok(()) => log::debug!(
                "Game saved (turn {}, {} matches)",
                snapshot.turns,
                snapshot.matches
            ),
            Err(e) => log::warn!("Failed to save game: {}", e),
        }
    }

    fn try_save(&mut self, snapshot: &Snapshot) -> Result<()> {
        let json = serde_json::to_string(snapshot)?;
        self.storage.set(&self.key, &json)
    }

    /// Read the saved game, if there is a usable one
    pub fn load(&mut self) -> Option<Snapshot> {
        let json = match self.storage.get(&self.key) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Failed to read saved game: {}", e);
                return None;
            }
        };

        match Self::parse(&json) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                log::warn!("Discarding corrupt saved game: {}", e);
                self.clear();
                None
            }
        }
    }

    fn parse(json: &str) -> Result<Snapshot> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        snapshot.validate().map_err(PersistError::Invalid)?;
        Ok(snapshot)
    }

    /// Delete the saved game (no-op if there is none)
    pub fn clear(&mut self) {
        match self.storage.remove(&self.key) {
            Ok(()) => log::debug!("Saved game cleared"),
            Err(e) => log::warn!("Failed to clear saved game: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Card, CardFace};

    const KEY: &str = "test_save";

    fn snapshot() -> Snapshot {
        let keys = ["A", "B", "A", "B"];
        let mut cards: Vec<Card> = keys
            .iter()
            .zip(1..)
            .map(|(k, id)| Card::new(id, &CardFace::new(*k, format!("/images/{k}.jpg"))))
            .collect();
        cards[0].is_matched = true;
        cards[0].is_flipped = true;
        cards[2].is_matched = true;
        cards[2].is_flipped = true;
        Snapshot {
            cards,
            turns: 4,
            matches: 1,
        }
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let mut store = SnapshotStore::new(MemoryStore::new(), KEY);
        let snap = snapshot();
        store.save(&snap);
        assert_eq!(store.load(), Some(snap));
    }

    #[test]
    fn test_load_missing_is_none() {
        let mut store = SnapshotStore::new(MemoryStore::new(), KEY);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_malformed_json_is_removed() {
        let mut kv = MemoryStore::new();
        kv.set(KEY, "{not json").unwrap();
        let mut store = SnapshotStore::new(kv, KEY);
        assert_eq!(store.load(), None);
        assert!(!store.storage().contains(KEY));
    }

    #[test]
    fn test_shape_mismatch_is_removed() {
        let mut kv = MemoryStore::new();
        kv.set(KEY, r#"{"cards":[],"turns":"three","matches":0}"#)
            .unwrap();
        let mut store = SnapshotStore::new(kv, KEY);
        assert_eq!(store.load(), None);
        assert!(!store.storage().contains(KEY));
    }

    #[test]
    fn test_invalid_deck_is_removed() {
        let mut snap = snapshot();
        snap.cards.pop();
        let mut kv = MemoryStore::new();
        kv.set(KEY, &serde_json::to_string(&snap).unwrap()).unwrap();
        let mut store = SnapshotStore::new(kv, KEY);
        assert_eq!(store.load(), None);
        assert!(!store.storage().contains(KEY));
    }

    #[test]
    fn test_empty_deck_is_not_saved() {
        let mut store = SnapshotStore::new(MemoryStore::new(), KEY);
        store.save(&Snapshot {
            cards: Vec::new(),
            turns: 0,
            matches: 0,
        });
        assert!(store.storage().is_empty());
    }

    #[test]
    fn test_quota_failure_is_swallowed() {
        let mut store = SnapshotStore::new(MemoryStore::with_quota(16), KEY);
        store.save(&snapshot());
        assert!(store.storage().is_empty());
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut store = SnapshotStore::new(MemoryStore::new(), KEY);
        store.save(&snapshot());
        store.clear();
        store.clear();
        assert_eq!(store.load(), None);
    }
}
