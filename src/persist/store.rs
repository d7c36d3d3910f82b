//! Game storage with optimistic concurrency.
//!
//! A writer submits a record carrying the version it loaded. A write
//! whose version matches the stored one is accepted and the stored
//! version bumps by one; a write behind the stored version is rejected
//! as [`SaveOutcome::Stale`] so the caller can reload and retry. A
//! version *ahead* of the stored one cannot arise from any legal
//! client and is an error. A game id never seen before is stored at
//! version zero for the handshake, so only a version-zero first save
//! is accepted.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::core::EngineError;
use crate::persist::record::GameRecord;

/// Result of a save attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Accepted; `version` is the new stored version.
    Saved { version: u64 },
    /// Rejected: the stored game moved on. Reload at `current` and retry.
    Stale { current: u64 },
}

/// Versioned storage for game records.
pub trait GameStore {
    /// Load the record for a game id, if one exists.
    fn load(&self, id: &str) -> Result<Option<GameRecord>, EngineError>;

    /// Save a record, enforcing the optimistic-version handshake.
    fn save(&mut self, record: GameRecord) -> Result<SaveOutcome, EngineError>;
}

/// In-process store backed by a hash map.
#[derive(Default)]
pub struct MemoryStore {
    games: FxHashMap<String, GameRecord>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored games.
    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl GameStore for MemoryStore {
    fn load(&self, id: &str) -> Result<Option<GameRecord>, EngineError> {
        Ok(self.games.get(id).cloned())
    }

    fn save(&mut self, mut record: GameRecord) -> Result<SaveOutcome, EngineError> {
        let incoming = record.version;
        // An unseen id takes part in the same handshake at version zero.
        let current = self.games.get(&record.id).map_or(0, |r| r.version);
        if incoming < current {
            debug!(id = %record.id, incoming, current, "stale save rejected");
            return Ok(SaveOutcome::Stale { current });
        }
        if incoming > current {
            return Err(EngineError::VersionAhead { incoming, current });
        }
        record.version = incoming + 1;
        let version = record.version;
        debug!(id = %record.id, version, "record saved");
        self.games.insert(record.id.clone(), record);
        Ok(SaveOutcome::Saved { version })
    }
}
