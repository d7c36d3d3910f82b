//! Core entities: errors, RNG, card instances, players, game state.

pub mod card;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

/// Number of pillars in the game.
pub const PILLAR_COUNT: usize = 5;

/// Number of trial phases (and trial stacks).
pub const PHASE_COUNT: usize = 3;

pub use card::{CardInstance, UniqueIndex};
pub use error::EngineError;
pub use player::Player;
pub use rng::GameRng;
pub use state::{GameState, GameStatus, TrialStack, DEFAULT_HAND_SIZE, DEFAULT_MARKET_SIZE};
