//! Serialization and versioned storage.

pub mod record;
pub mod store;

pub use record::{from_bytes, to_bytes, CardRef, GameRecord, PlayerRecord, TrialStackRecord};
pub use store::{GameStore, MemoryStore, SaveOutcome};
