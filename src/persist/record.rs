//! The serialized shape of a game.
//!
//! A [`GameRecord`] is the wire and storage format: card instances
//! flatten to name-plus-index references, the visible market and trial
//! stacks keep their order, and `current_player` travels as an index
//! into the player list. Deliberately absent: the RNG (rehydration
//! supplies a fresh one), the configured market and hand sizes
//! (defaults are restored), and the pillar reference cards (regenerated
//! from the catalog, which always assigns them indices 0-4).
//!
//! Rehydration is an overlay, not a copy: every card reference is
//! looked up in the catalog so definition data is never trusted from
//! storage, and an unknown name is a fatal [`EngineError::UnknownCard`].

use serde::{Deserialize, Serialize};

use crate::catalog::CardCatalog;
use crate::core::{
    CardInstance, EngineError, GameRng, GameState, GameStatus, Player, TrialStack, UniqueIndex,
    DEFAULT_HAND_SIZE, DEFAULT_MARKET_SIZE, PHASE_COUNT, PILLAR_COUNT,
};

/// A card instance flattened for storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRef {
    pub name: String,
    pub unique_index: u32,
    #[serde(default)]
    pub retired: bool,
}

impl CardRef {
    fn of(card: &CardInstance) -> Self {
        Self {
            name: card.name.clone(),
            unique_index: card.unique_index.raw(),
            retired: card.retired,
        }
    }

    fn hydrate(&self, catalog: &CardCatalog) -> Result<CardInstance, EngineError> {
        catalog.get_required(&self.name)?;
        let mut card = CardInstance::new(self.name.clone(), UniqueIndex::new(self.unique_index));
        card.retired = self.retired;
        Ok(card)
    }
}

fn refs_of(cards: &[CardInstance]) -> Vec<CardRef> {
    cards.iter().map(CardRef::of).collect()
}

fn hydrate_all(
    refs: &[CardRef],
    catalog: &CardCatalog,
) -> Result<Vec<CardInstance>, EngineError> {
    refs.iter().map(|r| r.hydrate(catalog)).collect()
}

/// One player, flattened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
    pub is_human: bool,
    pub index: usize,
    pub deck: Vec<CardRef>,
    pub hand: Vec<CardRef>,
    pub discard: Vec<CardRef>,
    pub in_play: Vec<CardRef>,
    pub credits: u32,
    pub talents: u32,
    pub creativity: u32,
    pub customers: u32,
    pub pillar_ranks: Vec<u8>,
}

impl PlayerRecord {
    fn of(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            is_human: player.is_human,
            index: player.index,
            deck: refs_of(&player.deck),
            hand: refs_of(&player.hand),
            discard: refs_of(&player.discard),
            in_play: refs_of(&player.in_play),
            credits: player.credits,
            talents: player.talents,
            creativity: player.creativity,
            customers: player.customers,
            pillar_ranks: player.pillar_ranks.to_vec(),
        }
    }

    fn hydrate(&self, catalog: &CardCatalog) -> Result<Player, EngineError> {
        let mut player = Player::new(
            self.id.clone(),
            self.name.clone(),
            self.is_human,
            self.index,
        );
        player.deck = hydrate_all(&self.deck, catalog)?;
        player.hand = hydrate_all(&self.hand, catalog)?;
        player.discard = hydrate_all(&self.discard, catalog)?;
        player.in_play = hydrate_all(&self.in_play, catalog)?;
        player.credits = self.credits;
        player.talents = self.talents;
        player.creativity = self.creativity;
        player.customers = self.customers;
        player.pillar_ranks = self.pillar_ranks.iter().copied().collect();
        Ok(player)
    }
}

/// One trial stack, flattened in order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialStackRecord {
    pub phase: u8,
    pub used: Vec<CardRef>,
    pub not_used: Vec<CardRef>,
    #[serde(default)]
    pub top_showing: bool,
}

impl TrialStackRecord {
    fn of(stack: &TrialStack) -> Self {
        Self {
            phase: stack.phase,
            used: refs_of(&stack.used),
            not_used: refs_of(&stack.not_used),
            top_showing: stack.top_showing,
        }
    }

    fn hydrate(&self, catalog: &CardCatalog) -> Result<TrialStack, EngineError> {
        let mut stack = TrialStack::new(self.phase);
        stack.used = hydrate_all(&self.used, catalog)?;
        stack.not_used = hydrate_all(&self.not_used, catalog)?;
        stack.top_showing = self.top_showing;
        Ok(stack)
    }
}

/// A complete game, flattened for storage or the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: String,
    pub name: String,
    pub is_public: bool,
    pub status: GameStatus,
    pub players: Vec<PlayerRecord>,
    pub pillar_max: u8,
    pub market_stack: Vec<CardRef>,
    pub retired_cards: Vec<CardRef>,
    pub trial_stacks: Vec<TrialStackRecord>,
    pub current_player: usize,
    pub current_market: Vec<CardRef>,
    pub version: u64,
}

impl GameState {
    /// Flatten this game into its storage shape.
    #[must_use]
    pub fn to_record(&self) -> GameRecord {
        GameRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            is_public: self.is_public,
            status: self.status,
            players: self.players.iter().map(PlayerRecord::of).collect(),
            pillar_max: self.pillar_max,
            market_stack: refs_of(&self.market_stack),
            retired_cards: refs_of(&self.retired_cards),
            trial_stacks: self.trial_stacks.iter().map(TrialStackRecord::of).collect(),
            current_player: self.current_player,
            current_market: refs_of(&self.current_market),
            version: self.version,
        }
    }

    /// Rebuild a live game from its storage shape.
    ///
    /// Every card name is resolved against `catalog`; drift between the
    /// stored game and the running catalog is fatal. The RNG is supplied
    /// by the caller and the market and hand sizes reset to defaults.
    pub fn from_record(
        record: &GameRecord,
        catalog: &CardCatalog,
        rng: GameRng,
    ) -> Result<Self, EngineError> {
        let players = record
            .players
            .iter()
            .map(|p| p.hydrate(catalog))
            .collect::<Result<Vec<_>, _>>()?;

        let mut stacks = record
            .trial_stacks
            .iter()
            .map(|s| s.hydrate(catalog))
            .collect::<Result<Vec<_>, _>>()?;
        if stacks.len() != PHASE_COUNT {
            stacks.resize_with(PHASE_COUNT, || TrialStack::new(0));
            for (i, stack) in stacks.iter_mut().enumerate() {
                if stack.phase == 0 {
                    stack.phase = i as u8 + 1;
                }
            }
        }
        let trial_stacks: [TrialStack; PHASE_COUNT] = match stacks.try_into() {
            Ok(arr) => arr,
            Err(_) => unreachable!("stack count fixed above"),
        };

        // Pillar reference cards are static; regenerate from the catalog.
        let mut pillar_defs: Vec<_> = catalog.pillar_cards().collect();
        pillar_defs.sort_by_key(|def| def.pillar_index);
        let pillars: Vec<CardInstance> = pillar_defs
            .iter()
            .take(PILLAR_COUNT)
            .enumerate()
            .map(|(i, def)| CardInstance::new(def.name.clone(), UniqueIndex::new(i as u32)))
            .collect();

        Ok(Self {
            id: record.id.clone(),
            name: record.name.clone(),
            is_public: record.is_public,
            status: record.status,
            players,
            current_player: record.current_player,
            pillar_max: record.pillar_max,
            market_size: DEFAULT_MARKET_SIZE,
            hand_size: DEFAULT_HAND_SIZE,
            market_stack: hydrate_all(&record.market_stack, catalog)?,
            current_market: hydrate_all(&record.current_market, catalog)?,
            retired_cards: hydrate_all(&record.retired_cards, catalog)?,
            trial_stacks,
            pillars,
            version: record.version,
            rng,
        })
    }
}

/// Encode a record with bincode.
pub fn to_bytes(record: &GameRecord) -> Result<Vec<u8>, bincode::Error> {
    bincode::serialize(record)
}

/// Decode a record from bincode bytes.
pub fn from_bytes(bytes: &[u8]) -> Result<GameRecord, bincode::Error> {
    bincode::deserialize(bytes)
}
