//! Card instances - one physical copy of a catalog entry.
//!
//! An instance carries only its catalog key, a process-unique index, and
//! the retired flag. Everything else about the card (cost, effects, trial
//! parameters) lives in the catalog and is looked up by name. This keeps
//! the wire format small and guarantees that persisted games can never
//! smuggle in fabricated effect data.

use serde::{Deserialize, Serialize};

/// Process-unique identifier for one physical card copy.
///
/// Assigned once at game initialization and never reused. The five pillar
/// reference cards always take indices 0-4; playable cards start at 5.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UniqueIndex(pub u32);

impl UniqueIndex {
    /// Create a new unique index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the raw index value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for UniqueIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One physical card in a game.
///
/// Lives in exactly one pile at any moment (a player pile, the market,
/// a trial stack, the pillar reference set, or the retired set).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardInstance {
    /// Catalog key for this card's definition.
    pub name: String,

    /// Process-unique index, assigned once per game.
    pub unique_index: UniqueIndex,

    /// A retired card is permanently out of circulation.
    pub retired: bool,
}

impl CardInstance {
    /// Create a fresh, unretired instance.
    #[must_use]
    pub fn new(name: impl Into<String>, unique_index: UniqueIndex) -> Self {
        Self {
            name: name.into(),
            unique_index,
            retired: false,
        }
    }
}

impl std::fmt::Display for CardInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.unique_index)
    }
}
