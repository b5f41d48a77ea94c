//! Ephemeral same-device snapshot persistence.
//!
//! The device holds at most one in-progress bracket, stored under a single
//! well-known key of an injectable key-value boundary. The boundary is a
//! trait so the engine runs headless in tests; the hosting surface supplies
//! whatever backs it (browser storage, a file, etc).
//!
//! Loading is defensive: a payload that fails to parse or validate is
//! discarded and reported as absent, never surfaced as an error. A lost
//! snapshot only costs resume, it can never corrupt a playthrough.

use log::{debug, warn};

use super::errors::PersistenceResult;
use crate::bracket::models::{GameId, Snapshot};

/// Well-known key for the single local snapshot slot
pub const SNAPSHOT_KEY: &str = "favorite_cup.snapshot";

/// Minimal key-value boundary the local slot is stored behind
pub trait KeyValueStore: Send {
    /// Read a value
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, overwriting any existing one
    ///
    /// # Errors
    ///
    /// * `PersistenceError::Backend` - the backend rejected the write
    fn set(&mut self, key: &str, value: &str) -> PersistenceResult<()>;

    /// Remove a value; no-op if absent
    fn remove(&mut self, key: &str);
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> PersistenceResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) {
        (**self).remove(key);
    }
}

/// In-memory key-value store for tests and headless use
#[derive(Debug, Default)]
pub struct MemoryKeyValue {
    entries: std::collections::HashMap<String, String>,
}

impl MemoryKeyValue {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValue {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> PersistenceResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Single-slot local snapshot store
#[derive(Debug)]
pub struct LocalSnapshotStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> LocalSnapshotStore<S> {
    /// Wrap a key-value backend
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Persist a snapshot, overwriting the slot.
    ///
    /// # Errors
    ///
    /// * `PersistenceError::Serialization` - snapshot could not be encoded
    /// * `PersistenceError::Backend` - the backend rejected the write
    pub fn save(&mut self, snapshot: &Snapshot) -> PersistenceResult<()> {
        let payload = serde_json::to_string(snapshot)?;
        self.store.set(SNAPSHOT_KEY, &payload)
    }

    /// Load the stored snapshot if it belongs to `game_id`.
    ///
    /// Returns `None` when the slot is empty, holds another game's bracket,
    /// or holds a payload that fails to parse or validate. Corrupt payloads
    /// are discarded on the spot.
    pub fn load(&mut self, game_id: GameId) -> Option<Snapshot> {
        let payload = self.store.get(SNAPSHOT_KEY)?;

        let snapshot: Snapshot = match serde_json::from_str(&payload) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("discarding corrupt local snapshot: {err}");
                self.store.remove(SNAPSHOT_KEY);
                return None;
            }
        };

        if let Err(err) = snapshot.validate() {
            warn!("discarding invalid local snapshot: {err}");
            self.store.remove(SNAPSHOT_KEY);
            return None;
        }

        if snapshot.game_id != game_id {
            debug!(
                "local snapshot is for game {}, not {game_id}",
                snapshot.game_id
            );
            return None;
        }

        Some(snapshot)
    }

    /// Remove the stored snapshot unconditionally
    pub fn clear(&mut self) {
        self.store.remove(SNAPSHOT_KEY);
    }
}
