//! # pillars-engine
//!
//! A rules engine for a turn-based deck-building card game about growing
//! a company across five architectural pillars.
//!
//! ## Design Principles
//!
//! 1. **Catalog-Driven**: Card behavior lives in data (`CardDefinition`)
//!    wherever the schema can express it; only a handful of cards carry
//!    registered custom code.
//!
//! 2. **Deterministic Given a Seed**: All randomness flows through one
//!    seeded RNG, so a seed reproduces a whole game for replay and tests.
//!
//! 3. **Choices as Values**: An effect that needs a decision returns a
//!    `PendingChoice` instead of calling back. The pending value is
//!    consumed on resume, so an effect chain completes exactly once by
//!    construction.
//!
//! ## Modules
//!
//! - `core`: Errors, RNG, card instances, players, game state
//! - `catalog`: Static card definitions, validation, the base set
//! - `setup`: Game assembly from a validated catalog
//! - `effects`: Standard (data-driven) and custom card effects
//! - `trials`: Dice-based end-of-turn challenge resolution
//! - `engine`: Turn operations: play, acquire, end turn, resume
//! - `notify`: Narration sink for game events
//! - `persist`: Wire format and versioned storage

pub mod catalog;
pub mod core;
pub mod effects;
pub mod engine;
pub mod notify;
pub mod persist;
pub mod setup;
pub mod trials;

// Re-export the types a driver touches.
pub use crate::core::{
    CardInstance, EngineError, GameRng, GameState, GameStatus, Player, TrialStack, UniqueIndex,
    PHASE_COUNT, PILLAR_COUNT,
};

pub use crate::catalog::{base_catalog, CardCatalog, CardDefinition, CardKind, PILLAR_NAMES};

pub use crate::effects::{
    CardEffect, Choice, ChoiceKind, ChoiceMode, CustomEffectRegistry, EffectContext,
    EffectOutcome, PendingChoice,
};

pub use crate::engine::{default_phase_rule, GameEngine, PhaseRule, ResumeError};
pub use crate::notify::{Notifier, NullNotifier, RecordingNotifier};
pub use crate::persist::{GameRecord, GameStore, MemoryStore, SaveOutcome};
pub use crate::setup::GameBuilder;
pub use crate::trials::{Trial, TrialReport};
