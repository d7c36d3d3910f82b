//! Engine error taxonomy.
//!
//! Three families of failure:
//! - Catalog/setup inconsistencies and exhausted trial stacks are fatal:
//!   the operation aborts before any mutation.
//! - Rejected requests (unknown card, unaffordable cost, mismatched choice)
//!   leave the game untouched so the caller can correct and retry.
//! - Expected empties (drawing from nothing, demoting a floor pillar,
//!   losing customers at zero) are *not* errors; they are narrated no-ops
//!   handled inline by the resolvers.

use thiserror::Error;

/// Errors produced by the rules engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("catalog entry {name:?} references undefined pillar index {index}")]
    UndefinedPillar { name: String, index: usize },

    #[error("trial card {name:?} has unknown phase label {label:?}")]
    UnknownPhaseLabel { name: String, label: String },

    #[error("pillar reference cards must cover indices 0-4 exactly once")]
    IncompletePillarSet,

    #[error("invalid cost symbol {symbol:?} in {cost:?}")]
    InvalidCostSymbol { cost: String, symbol: char },

    #[error("card {name:?} is not in the catalog")]
    UnknownCard { name: String },

    #[error("card with unique index {index} not found in {pile}")]
    CardNotFound { index: u32, pile: &'static str },

    #[error("card {name:?} cannot be played from hand")]
    NotPlayable { name: String },

    #[error("cannot afford {name:?}: costs {cost}")]
    CannotAfford { name: String, cost: String },

    #[error("trial phase must be 1-3, got {phase}")]
    InvalidPhase { phase: usize },

    #[error("trial stack for phase {phase} has no cards left")]
    TrialStackEmpty { phase: usize },

    #[error("supplied choice does not match the pending request")]
    InvalidChoice,

    #[error("incoming version {incoming} is ahead of stored version {current}")]
    VersionAhead { incoming: u64, current: u64 },
}
