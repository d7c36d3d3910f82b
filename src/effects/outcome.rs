//! Effect completion contract.
//!
//! Every effect application ends in an [`EffectOutcome`]: either the effect
//! (and all its delegated sub-effects) ran to completion, or it is pending
//! an external decision. A [`PendingChoice`] is deliberately neither `Clone`
//! nor serializable and is consumed by value when resumed, so "the
//! completion fires exactly once" is a type-level invariant rather than a
//! calling convention.
//!
//! A pending choice carries a FIFO of follow-up steps. Chained delegation
//! (a trial failure triggering a demotion, which delegates to a choose-any,
//! which still has the card's custom effect queued behind it) threads
//! through this queue and completes exactly once at the end.

use std::collections::VecDeque;

use crate::catalog::ConditionalAction;
use crate::core::{CardInstance, UniqueIndex};

/// How delegated decisions are made.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChoiceMode {
    /// Policy choices made synchronously (first eligible pillar, first
    /// card in hand). Never produces a pending outcome.
    Automated,
    /// Decisions deferred to the presentation layer via pending outcomes.
    Interactive,
}

/// Result of applying an effect.
#[derive(Debug)]
pub enum EffectOutcome {
    /// The effect and all sub-effects finished.
    Completed,
    /// An external decision is required before the effect can finish.
    Pending(PendingChoice),
}

impl EffectOutcome {
    /// True when no decision is outstanding.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, EffectOutcome::Completed)
    }
}

/// The kind of decision a pending effect is waiting on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChoiceKind {
    /// Pick a pillar to promote.
    PromotePillar,
    /// Pick a pillar to demote.
    DemotePillar,
    /// Pick a card from hand to retire.
    RetireFromHand,
    /// Keep the revealed top trial card of a phase, or bury it.
    KeepOrBuryTrial { phase: usize },
}

/// A decision supplied by the presentation layer when resuming.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice {
    /// A pillar index (0-4).
    Pillar(usize),
    /// A card in the deciding player's hand.
    HandCard(UniqueIndex),
    /// Keep (`true`) or bury (`false`) the revealed trial card.
    Keep(bool),
}

/// A deferred step queued behind a pending choice.
#[derive(Debug)]
pub(crate) enum FollowUp {
    /// A further decision of the given kind.
    Choice(ChoiceKind),
    /// A conditional action queued behind an interactive unconditional one.
    /// The rank gate is re-checked when the queue reaches it, so a pending
    /// promotion can still satisfy (or break) the condition.
    Conditional(ConditionalAction),
    /// The acting card's custom effect, run after standard effects.
    Custom,
    /// End-of-turn cleanup deferred behind an interactive trial outcome.
    TurnCleanup,
}

/// An effect suspended on an external decision.
///
/// Consumed by value on resume; there is no way to resume twice.
#[derive(Debug)]
pub struct PendingChoice {
    pub(crate) player: usize,
    pub(crate) card: CardInstance,
    pub(crate) is_winner: Option<bool>,
    pub(crate) kind: ChoiceKind,
    pub(crate) follow_ups: VecDeque<FollowUp>,
}

impl PendingChoice {
    pub(crate) fn new(player: usize, card: CardInstance, kind: ChoiceKind) -> Self {
        Self {
            player,
            card,
            is_winner: None,
            kind,
            follow_ups: VecDeque::new(),
        }
    }

    pub(crate) fn with_winner(mut self, is_winner: Option<bool>) -> Self {
        self.is_winner = is_winner;
        self
    }

    pub(crate) fn push_follow_up(&mut self, step: FollowUp) {
        self.follow_ups.push_back(step);
    }

    /// Index of the player who must decide.
    #[must_use]
    pub fn player(&self) -> usize {
        self.player
    }

    /// Name of the acting card.
    #[must_use]
    pub fn card_name(&self) -> &str {
        &self.card.name
    }

    /// The decision being waited on.
    #[must_use]
    pub fn kind(&self) -> ChoiceKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_is_completed() {
        assert!(EffectOutcome::Completed.is_completed());

        let card = CardInstance::new("Pivot", UniqueIndex::new(1));
        let pending = PendingChoice::new(0, card, ChoiceKind::DemotePillar);
        assert!(!EffectOutcome::Pending(pending).is_completed());
    }

    #[test]
    fn test_pending_follow_up_order() {
        let card = CardInstance::new("Pivot", UniqueIndex::new(1));
        let mut pending = PendingChoice::new(0, card, ChoiceKind::DemotePillar);
        pending.push_follow_up(FollowUp::Choice(ChoiceKind::PromotePillar));
        pending.push_follow_up(FollowUp::Custom);

        assert_eq!(pending.kind(), ChoiceKind::DemotePillar);
        assert_eq!(pending.player(), 0);
        assert_eq!(pending.card_name(), "Pivot");
        assert!(matches!(
            pending.follow_ups.pop_front(),
            Some(FollowUp::Choice(ChoiceKind::PromotePillar))
        ));
        assert!(matches!(pending.follow_ups.pop_front(), Some(FollowUp::Custom)));
    }
}
