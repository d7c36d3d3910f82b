//! Game creation.
//!
//! [`GameBuilder`] assembles a ready-to-play [`GameState`] from a
//! validated catalog: pillar reference cards, one starter deck per
//! player, a shuffled market supply, and one shuffled trial stack per
//! phase. Unique indices are assigned in a single pass at build time;
//! the five pillar cards always take indices 0 through 4 so playable
//! cards start at 5.

use tracing::debug;

use crate::catalog::{phase_for_label, CardCatalog, CardDefinition};
use crate::core::{
    CardInstance, EngineError, GameRng, GameState, GameStatus, Player, TrialStack, UniqueIndex,
    DEFAULT_HAND_SIZE, DEFAULT_MARKET_SIZE, PHASE_COUNT, PILLAR_COUNT,
};

/// Builder for a new game.
pub struct GameBuilder {
    id: String,
    name: String,
    is_public: bool,
    players: Vec<(String, String, bool)>,
    seed: Option<u64>,
    pillar_max: u8,
    market_size: usize,
    hand_size: usize,
}

impl GameBuilder {
    /// Start a builder with default sizes and no players.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_public: false,
            players: Vec::new(),
            seed: None,
            pillar_max: 4,
            market_size: DEFAULT_MARKET_SIZE,
            hand_size: DEFAULT_HAND_SIZE,
        }
    }

    /// Add a player in turn order.
    #[must_use]
    pub fn player(mut self, id: impl Into<String>, name: impl Into<String>, is_human: bool) -> Self {
        self.players.push((id.into(), name.into(), is_human));
        self
    }

    /// List the game publicly.
    #[must_use]
    pub fn public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    /// Fix the RNG seed. Unseeded builds draw one from the OS.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Override the pillar rank cap.
    #[must_use]
    pub fn pillar_max(mut self, pillar_max: u8) -> Self {
        self.pillar_max = pillar_max;
        self
    }

    /// Override the visible market window size.
    #[must_use]
    pub fn market_size(mut self, market_size: usize) -> Self {
        self.market_size = market_size;
        self
    }

    /// Override the per-turn hand size.
    #[must_use]
    pub fn hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }

    /// Validate the catalog and assemble the opening state.
    ///
    /// Panics when no players were added; that is a driver bug, not a
    /// recoverable condition.
    pub fn build(self, catalog: &CardCatalog) -> Result<GameState, EngineError> {
        assert!(!self.players.is_empty(), "a game needs at least one player");
        catalog.validate()?;

        let mut rng = match self.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };

        // Pillar reference cards claim indices 0-4 in printed order.
        let mut pillar_defs: Vec<&CardDefinition> = catalog.pillar_cards().collect();
        pillar_defs.sort_by_key(|def| def.pillar_index);
        let pillars: Vec<CardInstance> = pillar_defs
            .iter()
            .enumerate()
            .map(|(i, def)| CardInstance::new(def.name.clone(), UniqueIndex::new(i as u32)))
            .collect();
        let mut next_index = PILLAR_COUNT as u32;
        let mut mint = |name: &str| {
            let card = CardInstance::new(name.to_owned(), UniqueIndex::new(next_index));
            next_index += 1;
            card
        };

        // Catalog iteration order is arbitrary; sort by name so a seed
        // reproduces the same game.
        let mut starter_defs: Vec<&CardDefinition> = catalog.starters().collect();
        starter_defs.sort_by(|a, b| a.name.cmp(&b.name));

        let mut players = Vec::with_capacity(self.players.len());
        for (turn, (id, name, is_human)) in self.players.into_iter().enumerate() {
            let mut player = Player::new(id, name, is_human, turn);
            for def in &starter_defs {
                player.deck.push(mint(&def.name));
            }
            rng.shuffle(&mut player.deck);
            for _ in 0..self.hand_size {
                player.draw_one(&mut rng);
            }
            players.push(player);
        }

        let mut market_defs: Vec<&CardDefinition> = catalog.market_cards().collect();
        market_defs.sort_by(|a, b| a.name.cmp(&b.name));
        let mut market_stack = Vec::new();
        for def in market_defs {
            for _ in 0..def.copies {
                market_stack.push(mint(&def.name));
            }
        }
        rng.shuffle(&mut market_stack);
        let mut current_market = Vec::with_capacity(self.market_size);
        for _ in 0..self.market_size {
            match market_stack.pop() {
                Some(card) => current_market.push(card),
                None => break,
            }
        }

        let mut trial_defs: Vec<&CardDefinition> = catalog.trial_cards().collect();
        trial_defs.sort_by(|a, b| a.name.cmp(&b.name));
        let mut trial_stacks: [TrialStack; PHASE_COUNT] =
            std::array::from_fn(|i| TrialStack::new(i as u8 + 1));
        for def in trial_defs {
            let label = def.subtype.as_deref().unwrap_or_default();
            let phase = phase_for_label(label).ok_or_else(|| EngineError::UnknownPhaseLabel {
                name: def.name.clone(),
                label: label.to_owned(),
            })?;
            for _ in 0..def.copies {
                trial_stacks[phase - 1].not_used.push(mint(&def.name));
            }
        }
        for stack in &mut trial_stacks {
            rng.shuffle(&mut stack.not_used);
        }

        debug!(
            id = %self.id,
            players = players.len(),
            market = market_stack.len() + current_market.len(),
            trials = trial_stacks.iter().map(|s| s.not_used.len()).sum::<usize>(),
            "game assembled"
        );

        Ok(GameState {
            id: self.id,
            name: self.name,
            is_public: self.is_public,
            status: GameStatus::InProgress,
            players,
            current_player: 0,
            pillar_max: self.pillar_max,
            market_size: self.market_size,
            hand_size: self.hand_size,
            market_stack,
            current_market,
            retired_cards: Vec::new(),
            trial_stacks,
            pillars,
            version: 0,
            rng,
        })
    }
}
