//! Players - resources, card piles, and pillar progress.
//!
//! ## Piles
//!
//! Each player owns four piles: deck (face-down, top = end of vec), hand,
//! discard, and in-play. A card instance lives in exactly one pile; the
//! game-wide multiset of unique indices is conserved through every draw,
//! shuffle, acquisition, and retirement.
//!
//! ## Promote/demote
//!
//! Pillar ranks are bounded in `[0, pillar_max]`. Promoting a maxed pillar
//! or demoting a floor pillar does nothing and reports `false`, because
//! downstream narration differs for the no-op case.

use smallvec::{smallvec, SmallVec};

use super::card::CardInstance;
use super::rng::GameRng;
use super::PILLAR_COUNT;

/// A participant in a game.
#[derive(Clone, Debug)]
pub struct Player {
    /// External identifier (account id or AI tag).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Human or AI participant.
    pub is_human: bool,

    /// Turn position (index into `GameState::players`).
    pub index: usize,

    /// Face-down draw pile. Top of deck is the end of the vec.
    pub deck: Vec<CardInstance>,

    /// Cards currently in hand.
    pub hand: Vec<CardInstance>,

    /// Face-up discard pile.
    pub discard: Vec<CardInstance>,

    /// Cards played this turn.
    pub in_play: Vec<CardInstance>,

    /// Spendable currency for acquisitions.
    pub credits: u32,

    /// Spendable staffing for acquisitions.
    pub talents: u32,

    /// Added to every trial roll.
    pub creativity: u32,

    /// Score. Floored at zero; trial losses can never push it negative.
    pub customers: u32,

    /// Rank per pillar, each in `[0, pillar_max]`.
    pub pillar_ranks: SmallVec<[u8; PILLAR_COUNT]>,
}

impl Player {
    /// Create a player with empty piles and zeroed resources.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, is_human: bool, index: usize) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_human,
            index,
            deck: Vec::new(),
            hand: Vec::new(),
            discard: Vec::new(),
            in_play: Vec::new(),
            credits: 0,
            talents: 0,
            creativity: 0,
            customers: 0,
            pillar_ranks: smallvec![0; PILLAR_COUNT],
        }
    }

    /// Current rank on a pillar.
    #[must_use]
    pub fn rank(&self, pillar: usize) -> u8 {
        self.pillar_ranks[pillar]
    }

    /// Promote (or demote) a pillar by one rank.
    ///
    /// Returns `true` if the rank actually changed. A promote at
    /// `pillar_max` and a demote at zero are no-ops reporting `false`.
    pub fn promote(&mut self, pillar: usize, demote: bool, pillar_max: u8) -> bool {
        let rank = &mut self.pillar_ranks[pillar];
        if demote {
            if *rank == 0 {
                return false;
            }
            *rank -= 1;
        } else {
            if *rank >= pillar_max {
                return false;
            }
            *rank += 1;
        }
        true
    }

    /// First pillar (ascending index) below `pillar_max`, if any.
    ///
    /// "Promote any" deterministically acts on this pillar in automated
    /// contexts; trial-outcome tests depend on the exact scan order.
    #[must_use]
    pub fn first_promotable(&self, pillar_max: u8) -> Option<usize> {
        self.pillar_ranks.iter().position(|&r| r < pillar_max)
    }

    /// First pillar (ascending index) holding the current minimum rank.
    ///
    /// "Demote any" prefers a pillar already at the lowest rank; if that
    /// rank is zero the demote becomes a narrated no-op.
    #[must_use]
    pub fn lowest_pillar(&self) -> usize {
        let min = self.pillar_ranks.iter().copied().min().unwrap_or(0);
        self.pillar_ranks
            .iter()
            .position(|&r| r == min)
            .unwrap_or(0)
    }

    /// Draw one card from deck to hand.
    ///
    /// If the deck is empty and the discard is not, the discard is shuffled
    /// into the deck first. Both empty is a legitimate exhausted state:
    /// no-op, returns `false`.
    pub fn draw_one(&mut self, rng: &mut GameRng) -> bool {
        if self.deck.is_empty() {
            if self.discard.is_empty() {
                return false;
            }
            self.deck.append(&mut self.discard);
            rng.shuffle(&mut self.deck);
        }
        match self.deck.pop() {
            Some(card) => {
                self.hand.push(card);
                true
            }
            None => false,
        }
    }

    /// Iterate every card in this player's four piles.
    pub fn all_cards(&self) -> impl Iterator<Item = &CardInstance> {
        self.deck
            .iter()
            .chain(self.hand.iter())
            .chain(self.discard.iter())
            .chain(self.in_play.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::UniqueIndex;

    fn card(i: u32) -> CardInstance {
        CardInstance::new(format!("Card {i}"), UniqueIndex::new(i))
    }

    #[test]
    fn test_promote_and_bounds() {
        let mut player = Player::new("p1", "Ada", true, 0);

        assert!(player.promote(2, false, 3));
        assert_eq!(player.rank(2), 1);

        player.pillar_ranks[2] = 3;
        assert!(!player.promote(2, false, 3)); // maxed: no-op
        assert_eq!(player.rank(2), 3);
    }

    #[test]
    fn test_demote_floor() {
        let mut player = Player::new("p1", "Ada", true, 0);

        assert!(!player.promote(0, true, 4)); // already at zero
        assert_eq!(player.rank(0), 0);

        player.pillar_ranks[0] = 2;
        assert!(player.promote(0, true, 4));
        assert_eq!(player.rank(0), 1);
    }

    #[test]
    fn test_first_promotable_scans_ascending() {
        let mut player = Player::new("p1", "Ada", true, 0);
        player.pillar_ranks = smallvec![4, 4, 1, 0, 4];

        assert_eq!(player.first_promotable(4), Some(2));

        player.pillar_ranks = smallvec![4, 4, 4, 4, 4];
        assert_eq!(player.first_promotable(4), None);
    }

    #[test]
    fn test_lowest_pillar_prefers_first_minimum() {
        let mut player = Player::new("p1", "Ada", true, 0);
        player.pillar_ranks = smallvec![2, 1, 3, 1, 2];

        assert_eq!(player.lowest_pillar(), 1);
    }

    #[test]
    fn test_draw_from_deck() {
        let mut player = Player::new("p1", "Ada", true, 0);
        let mut rng = GameRng::new(42);
        player.deck = vec![card(1), card(2), card(3)];

        assert!(player.draw_one(&mut rng));
        assert_eq!(player.hand.len(), 1);
        assert_eq!(player.hand[0].unique_index.raw(), 3); // top = end of vec
        assert_eq!(player.deck.len(), 2);
    }

    #[test]
    fn test_draw_reshuffles_discard() {
        let mut player = Player::new("p1", "Ada", true, 0);
        let mut rng = GameRng::new(42);
        player.discard = vec![card(1), card(2), card(3), card(4)];

        assert!(player.draw_one(&mut rng));

        assert!(player.discard.is_empty());
        assert_eq!(player.deck.len(), 3); // 4 reshuffled, 1 drawn
        assert_eq!(player.hand.len(), 1);
    }

    #[test]
    fn test_draw_exhausted_is_noop() {
        let mut player = Player::new("p1", "Ada", true, 0);
        let mut rng = GameRng::new(42);

        assert!(!player.draw_one(&mut rng));
        assert!(player.hand.is_empty());
    }

    #[test]
    fn test_all_cards_covers_every_pile() {
        let mut player = Player::new("p1", "Ada", true, 0);
        player.deck = vec![card(1)];
        player.hand = vec![card(2)];
        player.discard = vec![card(3)];
        player.in_play = vec![card(4)];

        let mut indices: Vec<u32> = player.all_cards().map(|c| c.unique_index.raw()).collect();
        indices.sort();
        assert_eq!(indices, vec![1, 2, 3, 4]);
    }
}
