//! Game state - the aggregate root for a game in progress.
//!
//! Holds the ordered players, the market economy (face-down supply plus the
//! visible window), the three phase-keyed trial stacks, the five pillar
//! reference cards, the turn pointer, and the monotonic version counter
//! used for optimistic-concurrency writes.
//!
//! `current_player` is an index into `players`, never a second owned copy;
//! serialization reconstructs it as a lookup.

use serde::{Deserialize, Serialize};

use super::card::{CardInstance, UniqueIndex};
use super::error::EngineError;
use super::player::Player;
use super::rng::GameRng;
use super::PHASE_COUNT;

/// Default size of the visible market window.
pub const DEFAULT_MARKET_SIZE: usize = 7;

/// Default hand size drawn at the start of each turn.
pub const DEFAULT_HAND_SIZE: usize = 5;

/// Lifecycle status of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Created,
    InProgress,
    Complete,
}

/// One phase's trial deck.
#[derive(Clone, Debug)]
pub struct TrialStack {
    /// Phase number (1-3).
    pub phase: u8,

    /// Completed trial cards, face down.
    pub used: Vec<CardInstance>,

    /// Remaining trial cards; next to draw is index 0.
    pub not_used: Vec<CardInstance>,

    /// Whether the top card is currently revealed (e.g. by Forecast).
    pub top_showing: bool,
}

impl TrialStack {
    /// Create an empty stack for a phase.
    #[must_use]
    pub fn new(phase: u8) -> Self {
        Self {
            phase,
            used: Vec::new(),
            not_used: Vec::new(),
            top_showing: false,
        }
    }
}

/// Complete state of one game.
#[derive(Clone, Debug)]
pub struct GameState {
    /// External game identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Whether the game is publicly listed.
    pub is_public: bool,

    /// Lifecycle status.
    pub status: GameStatus,

    /// Players in turn order.
    pub players: Vec<Player>,

    /// Index of the player whose turn it is.
    pub current_player: usize,

    /// Upper bound for pillar ranks.
    pub pillar_max: u8,

    /// Size of the visible market window. Not part of the wire format;
    /// rehydration restores the default.
    pub market_size: usize,

    /// Hand size drawn each turn. Not part of the wire format.
    pub hand_size: usize,

    /// Face-down market supply. Top is the end of the vec.
    pub market_stack: Vec<CardInstance>,

    /// Face-up market window.
    pub current_market: Vec<CardInstance>,

    /// Cards permanently removed from circulation.
    pub retired_cards: Vec<CardInstance>,

    /// One trial stack per phase.
    pub trial_stacks: [TrialStack; PHASE_COUNT],

    /// The five pillar reference cards (indices 0-4).
    pub pillars: Vec<CardInstance>,

    /// Monotonic version token for optimistic-concurrency writes.
    pub version: u64,

    /// Engine randomness. Not serialized; rehydration supplies a fresh RNG.
    pub rng: GameRng,
}

impl GameState {
    /// The player whose turn it is.
    #[must_use]
    pub fn active_player(&self) -> &Player {
        &self.players[self.current_player]
    }

    /// Mutable access to the player whose turn it is.
    pub fn active_player_mut(&mut self) -> &mut Player {
        &mut self.players[self.current_player]
    }

    /// Draw one card for a player (reshuffling their discard if needed).
    ///
    /// Returns `false` when both deck and discard are empty.
    pub fn draw_one(&mut self, player: usize) -> bool {
        let Self { players, rng, .. } = self;
        players[player].draw_one(rng)
    }

    /// Retire a card from a player's hand.
    ///
    /// The card is flagged retired and moved to `retired_cards`. Returns
    /// the card's name for narration.
    pub fn retire_from_hand(
        &mut self,
        player: usize,
        index: UniqueIndex,
    ) -> Result<String, EngineError> {
        let hand = &mut self.players[player].hand;
        let pos = hand
            .iter()
            .position(|c| c.unique_index == index)
            .ok_or(EngineError::CardNotFound {
                index: index.raw(),
                pile: "hand",
            })?;
        let mut card = hand.remove(pos);
        card.retired = true;
        let name = card.name.clone();
        self.retired_cards.push(card);
        Ok(name)
    }

    /// Sorted unique indices of every card in circulation.
    ///
    /// Covers all player piles, the market stack and window, the retired
    /// set, and both lists of every trial stack. Pillar reference cards are
    /// static and excluded. The result is invariant across all legal play.
    #[must_use]
    pub fn census(&self) -> Vec<UniqueIndex> {
        let mut indices: Vec<UniqueIndex> = self
            .players
            .iter()
            .flat_map(|p| p.all_cards())
            .chain(self.market_stack.iter())
            .chain(self.current_market.iter())
            .chain(self.retired_cards.iter())
            .chain(
                self.trial_stacks
                    .iter()
                    .flat_map(|s| s.used.iter().chain(s.not_used.iter())),
            )
            .map(|c| c.unique_index)
            .collect();
        indices.sort();
        indices
    }
}
