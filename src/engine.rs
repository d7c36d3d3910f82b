//! Turn-level game operations.
//!
//! [`GameEngine`] binds a catalog, a custom effect registry, and a phase
//! rule, and exposes the four operations a driver calls: play a card,
//! acquire from the market, end the turn (which runs a trial and then
//! cleans up), and resume a suspended effect with a choice.
//!
//! ## Atomicity
//!
//! Every operation checks its preconditions before touching state, so a
//! returned error leaves the game exactly as it was.
//!
//! ## Pending choices
//!
//! An interactive registry makes effects return
//! [`EffectOutcome::Pending`]. The pending value is consumed by
//! [`GameEngine::resume`]; deferred steps (a second choice, a gated
//! conditional, the card's custom effect, end-of-turn cleanup) are
//! queued on it and replayed in order once the choice lands.

use thiserror::Error;
use tracing::debug;

use crate::catalog::{CardCatalog, CardKind};
use crate::core::{EngineError, GameState, Player, UniqueIndex};
use crate::effects::custom::{choice_matches, keep_or_bury, CustomEffectRegistry};
use crate::effects::outcome::{Choice, ChoiceKind, EffectOutcome, FollowUp, PendingChoice};
use crate::effects::standard::{
    self, apply_conditional, promote_pillar, EffectContext,
};
use crate::notify::Notifier;
use crate::trials::{self, TrialReport};

/// Maps a player's pillar progress to the trial phase they face.
pub type PhaseRule = fn(&Player) -> usize;

/// Default phase rule: total pillar rank buckets into phases 1-3.
#[must_use]
pub fn default_phase_rule(player: &Player) -> usize {
    let total: u32 = player.pillar_ranks.iter().map(|&r| u32::from(r)).sum();
    match total {
        0..=5 => 1,
        6..=11 => 2,
        _ => 3,
    }
}

/// Why a resume attempt failed.
///
/// A bad choice is rejected before any state changes and the pending
/// value is handed back, so the driver can ask the player again.
#[derive(Debug, Error)]
pub enum ResumeError {
    /// The supplied choice failed validation. The chain is still live;
    /// retry with the returned pending value.
    #[error("choice rejected: {error}")]
    Rejected {
        pending: PendingChoice,
        #[source]
        error: EngineError,
    },
    /// A queued follow-up step failed while the chain was draining.
    #[error(transparent)]
    Chain(#[from] EngineError),
}

/// The rules engine for one catalog and registry pairing.
pub struct GameEngine {
    catalog: CardCatalog,
    registry: CustomEffectRegistry,
    phase_rule: PhaseRule,
}

impl GameEngine {
    /// Engine with the default phase rule.
    #[must_use]
    pub fn new(catalog: CardCatalog, registry: CustomEffectRegistry) -> Self {
        Self::with_phase_rule(catalog, registry, default_phase_rule)
    }

    /// Engine with a custom phase rule.
    #[must_use]
    pub fn with_phase_rule(
        catalog: CardCatalog,
        registry: CustomEffectRegistry,
        phase_rule: PhaseRule,
    ) -> Self {
        Self {
            catalog,
            registry,
            phase_rule,
        }
    }

    /// The catalog this engine plays with.
    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    fn ctx<'a>(
        &'a self,
        state: &'a mut GameState,
        notifier: &'a mut dyn Notifier,
        player: usize,
    ) -> EffectContext<'a> {
        let trial_phase = (self.phase_rule)(&state.players[player]);
        EffectContext {
            catalog: &self.catalog,
            state,
            notifier,
            player,
            mode: self.registry.mode(),
            trial_phase,
        }
    }

    /// Play a card from the active player's hand.
    ///
    /// The card moves to the in-play pile, then its standard effects run
    /// and finally its custom effect. Only resource cards are playable.
    pub fn play_card(
        &self,
        state: &mut GameState,
        notifier: &mut dyn Notifier,
        index: UniqueIndex,
    ) -> Result<EffectOutcome, EngineError> {
        let player = state.current_player;
        let pos = state.players[player]
            .hand
            .iter()
            .position(|c| c.unique_index == index)
            .ok_or(EngineError::CardNotFound {
                index: index.raw(),
                pile: "hand",
            })?;
        let def = self.catalog.get_required(&state.players[player].hand[pos].name)?;
        if def.kind != CardKind::Resource {
            return Err(EngineError::NotPlayable {
                name: def.name.clone(),
            });
        }

        let card = state.players[player].hand.remove(pos);
        state.players[player].in_play.push(card.clone());
        debug!(card = %card.name, player, "playing card");
        notifier.notify(&format!(
            "{} plays {}",
            state.players[player].name, card.name
        ));

        let mut ctx = self.ctx(state, notifier, player);
        let mut outcome = standard::apply_standard(&mut ctx, &card)?;
        if self.registry.contains(&card.name) {
            match &mut outcome {
                EffectOutcome::Completed => {
                    if let Some(effect) = self.registry.get(&card.name) {
                        outcome = effect.apply(&mut ctx, &card, None)?;
                    }
                }
                EffectOutcome::Pending(pending) => {
                    pending.push_follow_up(FollowUp::Custom);
                }
            }
        }
        Ok(outcome)
    }

    /// Acquire a card from the visible market window.
    ///
    /// Pays the printed cost, moves the card to the active player's
    /// discard, and refills the emptied slot from the market stack.
    pub fn acquire_card(
        &self,
        state: &mut GameState,
        notifier: &mut dyn Notifier,
        index: UniqueIndex,
    ) -> Result<(), EngineError> {
        let player = state.current_player;
        let pos = state
            .current_market
            .iter()
            .position(|c| c.unique_index == index)
            .ok_or(EngineError::CardNotFound {
                index: index.raw(),
                pile: "market",
            })?;
        let def = self.catalog.get_required(&state.current_market[pos].name)?;
        let cost = def.cost;
        {
            let buyer = &state.players[player];
            if buyer.credits < cost.credits || buyer.talents < cost.talents {
                return Err(EngineError::CannotAfford {
                    name: def.name.clone(),
                    cost: cost.to_string(),
                });
            }
        }

        let card = state.current_market.remove(pos);
        debug!(card = %card.name, player, %cost, "acquiring card");
        let buyer = &mut state.players[player];
        buyer.credits -= cost.credits;
        buyer.talents -= cost.talents;
        notifier.notify(&format!("{} acquires {}", buyer.name, card.name));
        buyer.discard.push(card);

        // Refill the same slot so stable positions survive acquisition.
        if let Some(refill) = state.market_stack.pop() {
            state.current_market.insert(pos, refill);
        }
        Ok(())
    }

    /// End the active player's turn.
    ///
    /// Runs the trial for the player's current phase, then (once the
    /// trial's effects have settled) discards hand and in-play cards,
    /// zeroes turn resources, redraws, and passes the turn.
    pub fn end_turn(
        &self,
        state: &mut GameState,
        notifier: &mut dyn Notifier,
    ) -> Result<TrialReport, EngineError> {
        let player = state.current_player;
        let phase = (self.phase_rule)(&state.players[player]);
        let mut ctx = self.ctx(state, notifier, player);
        let mut report = trials::run_trial(&mut ctx, &self.registry, phase)?;
        match &mut report.outcome {
            EffectOutcome::Completed => cleanup_turn(&mut ctx),
            EffectOutcome::Pending(pending) => {
                pending.push_follow_up(FollowUp::TurnCleanup);
            }
        }
        Ok(report)
    }

    /// Resume a suspended effect with the player's choice.
    ///
    /// The choice is validated in full before the pending value is
    /// consumed: a wrong shape, an out-of-range pillar, or a card not in
    /// the deciding player's hand comes back as
    /// [`ResumeError::Rejected`], carrying the untouched pending value
    /// so the driver can retry. Once validation passes the chain drains;
    /// an effect chain can never be resumed twice.
    pub fn resume(
        &self,
        state: &mut GameState,
        notifier: &mut dyn Notifier,
        pending: PendingChoice,
        choice: Choice,
    ) -> Result<EffectOutcome, ResumeError> {
        if let Err(error) = validate_choice(state, &pending, choice) {
            return Err(ResumeError::Rejected { pending, error });
        }
        let player = pending.player;
        let mut ctx = self.ctx(state, notifier, player);
        debug!(card = %pending.card.name, player, "resuming with choice");

        match (pending.kind, choice) {
            (ChoiceKind::PromotePillar, Choice::Pillar(pillar)) => {
                promote_pillar(&mut ctx, pillar, false);
            }
            (ChoiceKind::DemotePillar, Choice::Pillar(pillar)) => {
                promote_pillar(&mut ctx, pillar, true);
            }
            (ChoiceKind::RetireFromHand, Choice::HandCard(index)) => {
                let who = ctx.player_name();
                let name = ctx.state.retire_from_hand(player, index)?;
                ctx.notifier.notify(&format!("{who} retires {name}"));
            }
            (ChoiceKind::KeepOrBuryTrial { phase }, Choice::Keep(keep)) => {
                keep_or_bury(&mut ctx, phase, keep);
            }
            _ => unreachable!("shape checked by validate_choice"),
        }

        Ok(self.continue_chain(&mut ctx, pending)?)
    }

    /// Drain a pending value's follow-up queue in order.
    ///
    /// Stops (returning a new pending value carrying the remainder) when
    /// a step raises another choice.
    fn continue_chain(
        &self,
        ctx: &mut EffectContext<'_>,
        mut pending: PendingChoice,
    ) -> Result<EffectOutcome, EngineError> {
        while let Some(step) = pending.follow_ups.pop_front() {
            match step {
                FollowUp::Choice(kind) => {
                    pending.kind = kind;
                    return Ok(EffectOutcome::Pending(pending));
                }
                FollowUp::Conditional(conditional) => {
                    let outcome = apply_conditional(ctx, &pending.card, conditional)?;
                    if let Some(next) = merge_pending(outcome, &mut pending) {
                        return Ok(EffectOutcome::Pending(next));
                    }
                }
                FollowUp::Custom => {
                    if let Some(effect) = self.registry.get(&pending.card.name) {
                        let outcome = effect.apply(ctx, &pending.card, pending.is_winner)?;
                        if let Some(next) = merge_pending(outcome, &mut pending) {
                            return Ok(EffectOutcome::Pending(next));
                        }
                    }
                }
                FollowUp::TurnCleanup => cleanup_turn(ctx),
            }
        }
        Ok(EffectOutcome::Completed)
    }
}

/// Check a choice against the pending decision without touching state.
fn validate_choice(
    state: &GameState,
    pending: &PendingChoice,
    choice: Choice,
) -> Result<(), EngineError> {
    if !choice_matches(pending.kind, &choice) {
        return Err(EngineError::InvalidChoice);
    }
    match choice {
        Choice::Pillar(pillar) if pillar >= crate::core::PILLAR_COUNT => {
            Err(EngineError::InvalidChoice)
        }
        Choice::HandCard(index) => {
            let held = state.players[pending.player]
                .hand
                .iter()
                .any(|c| c.unique_index == index);
            if held {
                Ok(())
            } else {
                Err(EngineError::CardNotFound {
                    index: index.raw(),
                    pile: "hand",
                })
            }
        }
        _ => Ok(()),
    }
}

/// If a step suspended, graft the old queue onto the new pending value.
fn merge_pending(
    outcome: EffectOutcome,
    pending: &mut PendingChoice,
) -> Option<PendingChoice> {
    match outcome {
        EffectOutcome::Completed => None,
        EffectOutcome::Pending(mut next) => {
            next.is_winner = pending.is_winner;
            next.follow_ups.append(&mut pending.follow_ups);
            Some(next)
        }
    }
}

/// Discard hand and in-play, zero turn resources, redraw, pass the turn.
fn cleanup_turn(ctx: &mut EffectContext<'_>) {
    let idx = ctx.state.current_player;
    let hand_size = ctx.state.hand_size;
    {
        let player = &mut ctx.state.players[idx];
        let mut spent: Vec<_> = player.in_play.drain(..).collect();
        player.discard.append(&mut spent);
        let mut held: Vec<_> = player.hand.drain(..).collect();
        player.discard.append(&mut held);
        player.credits = 0;
        player.talents = 0;
        player.creativity = 0;
    }
    for _ in 0..hand_size {
        ctx.state.draw_one(idx);
    }
    let who = ctx.state.players[idx].name.clone();
    ctx.notifier.notify(&format!("{who} ends the turn"));
    ctx.state.current_player = (idx + 1) % ctx.state.players.len();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::base_catalog;
    use crate::core::CardInstance;
    use crate::notify::RecordingNotifier;
    use crate::setup::GameBuilder;

    fn engine() -> GameEngine {
        GameEngine::new(base_catalog(), CustomEffectRegistry::automated())
    }

    fn new_game(seed: u64) -> GameState {
        GameBuilder::new("g1", "Test Game")
            .player("p1", "Ada", true)
            .player("p2", "Grace", false)
            .seed(seed)
            .build(&base_catalog())
            .unwrap()
    }

    fn hand_card(state: &GameState, name: &str) -> Option<UniqueIndex> {
        state.players[state.current_player]
            .hand
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.unique_index)
    }

    #[test]
    fn test_default_phase_rule_buckets() {
        let mut player = Player::new("p1", "Ada", true, 0);
        assert_eq!(default_phase_rule(&player), 1);
        player.pillar_ranks = smallvec::smallvec![2, 2, 2, 0, 0];
        assert_eq!(default_phase_rule(&player), 2);
        player.pillar_ranks = smallvec::smallvec![4, 4, 4, 0, 0];
        assert_eq!(default_phase_rule(&player), 3);
    }

    #[test]
    fn test_play_card_moves_to_in_play_and_pays_out() {
        let engine = engine();
        let mut state = new_game(1);
        let mut notifier = RecordingNotifier::new();
        // Every opening hand holds only starters; find any credit starter.
        let index = hand_card(&state, "Seed Funding")
            .or_else(|| hand_card(&state, "Side Project"))
            .or_else(|| hand_card(&state, "Garage Office"))
            .expect("opening hand holds a credit starter");

        let outcome = engine.play_card(&mut state, &mut notifier, index).unwrap();

        assert!(outcome.is_completed());
        assert_eq!(state.players[0].credits, 1);
        assert_eq!(state.players[0].in_play.len(), 1);
        assert_eq!(state.players[0].hand.len(), 4);
    }

    #[test]
    fn test_play_card_unknown_index_fails_clean() {
        let engine = engine();
        let mut state = new_game(1);
        let mut notifier = RecordingNotifier::new();

        let err = engine
            .play_card(&mut state, &mut notifier, UniqueIndex::new(9999))
            .unwrap_err();

        assert!(matches!(err, EngineError::CardNotFound { pile: "hand", .. }));
        assert_eq!(state.players[0].hand.len(), 5);
        assert!(state.players[0].in_play.is_empty());
    }

    #[test]
    fn test_acquire_pays_and_refills_slot() {
        let engine = engine();
        let mut state = new_game(1);
        let mut notifier = RecordingNotifier::new();
        // Pair Programming costs one credit and one talent.
        let pos = state
            .current_market
            .iter()
            .position(|c| c.name == "Pair Programming");
        let Some(pos) = pos else {
            // Not in this window; rig it into slot 0 from the stack.
            let i = state
                .market_stack
                .iter()
                .position(|c| c.name == "Pair Programming")
                .expect("base market has Pair Programming copies");
            let card = state.market_stack.remove(i);
            state.market_stack.push(state.current_market.remove(0));
            state.current_market.insert(0, card);
            return test_acquire_at(engine, state, notifier, 0);
        };
        test_acquire_at(engine, state, notifier, pos)
    }

    fn test_acquire_at(
        engine: GameEngine,
        mut state: GameState,
        mut notifier: RecordingNotifier,
        pos: usize,
    ) {
        let index = state.current_market[pos].unique_index;
        state.players[0].credits = 1;
        state.players[0].talents = 1;
        let stack_before = state.market_stack.len();

        engine.acquire_card(&mut state, &mut notifier, index).unwrap();

        assert_eq!(state.players[0].credits, 0);
        assert_eq!(state.players[0].talents, 0);
        assert_eq!(
            state.players[0].discard.last().map(|c| c.unique_index),
            Some(index)
        );
        // Slot refilled in place from the stack.
        assert_eq!(state.current_market.len(), state.market_size);
        assert_ne!(state.current_market[pos].unique_index, index);
        assert_eq!(state.market_stack.len(), stack_before - 1);
    }

    #[test]
    fn test_acquire_unaffordable_changes_nothing() {
        let engine = engine();
        let mut state = new_game(2);
        let mut notifier = RecordingNotifier::new();
        let index = state.current_market[0].unique_index;
        let market_before = state.current_market.clone();

        let err = engine
            .acquire_card(&mut state, &mut notifier, index)
            .unwrap_err();

        assert!(matches!(err, EngineError::CannotAfford { .. }));
        assert_eq!(state.current_market, market_before);
        assert!(state.players[0].discard.is_empty());
    }

    #[test]
    fn test_end_turn_cleans_up_and_passes() {
        let engine = engine();
        let mut state = new_game(3);
        let mut notifier = RecordingNotifier::new();
        state.players[0].credits = 2;
        state.players[0].creativity = 1;

        let report = engine.end_turn(&mut state, &mut notifier).unwrap();

        assert_eq!(report.phase, 1);
        assert!(report.outcome.is_completed());
        assert_eq!(state.current_player, 1);
        let player = &state.players[0];
        assert_eq!(player.credits, 0);
        assert_eq!(player.creativity, 0);
        assert!(player.in_play.is_empty());
        assert_eq!(player.hand.len(), state.hand_size);
    }

    #[test]
    fn test_interactive_promote_resume_applies_once() {
        let engine = GameEngine::new(base_catalog(), CustomEffectRegistry::interactive());
        let mut state = new_game(4);
        let mut notifier = RecordingNotifier::new();
        // Put a Refactoring Sprint (promote any) in hand.
        let card = CardInstance::new("Refactoring Sprint", UniqueIndex::new(500));
        state.players[0].hand.push(card);

        let outcome = engine
            .play_card(&mut state, &mut notifier, UniqueIndex::new(500))
            .unwrap();
        let pending = match outcome {
            EffectOutcome::Pending(pending) => pending,
            EffectOutcome::Completed => panic!("expected a pending promote"),
        };
        assert_eq!(pending.kind(), ChoiceKind::PromotePillar);
        assert_eq!(state.players[0].rank(3), 0);

        let outcome = engine
            .resume(&mut state, &mut notifier, pending, Choice::Pillar(3))
            .unwrap();

        assert!(outcome.is_completed());
        assert_eq!(state.players[0].rank(3), 1);
    }

    #[test]
    fn test_resume_rejects_wrong_choice_shape() {
        let engine = GameEngine::new(base_catalog(), CustomEffectRegistry::interactive());
        let mut state = new_game(4);
        let mut notifier = RecordingNotifier::new();
        let card = CardInstance::new("Refactoring Sprint", UniqueIndex::new(500));
        state.players[0].hand.push(card);

        let outcome = engine
            .play_card(&mut state, &mut notifier, UniqueIndex::new(500))
            .unwrap();
        let pending = match outcome {
            EffectOutcome::Pending(pending) => pending,
            EffectOutcome::Completed => panic!("expected a pending promote"),
        };

        let err = engine
            .resume(&mut state, &mut notifier, pending, Choice::Keep(true))
            .unwrap_err();
        let ResumeError::Rejected { pending, error } = err else {
            panic!("expected a rejected choice");
        };
        assert!(matches!(error, EngineError::InvalidChoice));
        assert!(state.players[0].pillar_ranks.iter().all(|&r| r == 0));

        // The chain is still live; a valid retry completes it.
        let outcome = engine
            .resume(&mut state, &mut notifier, pending, Choice::Pillar(2))
            .unwrap();
        assert!(outcome.is_completed());
        assert_eq!(state.players[0].rank(2), 1);
    }

    #[test]
    fn test_resume_rejects_out_of_range_pillar() {
        let engine = GameEngine::new(base_catalog(), CustomEffectRegistry::interactive());
        let mut state = new_game(4);
        let mut notifier = RecordingNotifier::new();
        let card = CardInstance::new("Refactoring Sprint", UniqueIndex::new(500));
        state.players[0].hand.push(card);

        let outcome = engine
            .play_card(&mut state, &mut notifier, UniqueIndex::new(500))
            .unwrap();
        let pending = match outcome {
            EffectOutcome::Pending(pending) => pending,
            EffectOutcome::Completed => panic!("expected a pending promote"),
        };

        let err = engine
            .resume(&mut state, &mut notifier, pending, Choice::Pillar(99))
            .unwrap_err();
        let ResumeError::Rejected { pending, error } = err else {
            panic!("expected a rejected choice");
        };
        assert!(matches!(error, EngineError::InvalidChoice));
        assert!(state.players[0].pillar_ranks.iter().all(|&r| r == 0));

        let outcome = engine
            .resume(&mut state, &mut notifier, pending, Choice::Pillar(0))
            .unwrap();
        assert!(outcome.is_completed());
        assert_eq!(state.players[0].rank(0), 1);
    }

    #[test]
    fn test_resume_rejects_card_not_in_hand() {
        let engine = GameEngine::new(base_catalog(), CustomEffectRegistry::interactive());
        let mut state = new_game(4);
        let mut notifier = RecordingNotifier::new();
        // Decommission retires a card from hand.
        let card = CardInstance::new("Decommission", UniqueIndex::new(500));
        state.players[0].hand.push(card);

        let outcome = engine
            .play_card(&mut state, &mut notifier, UniqueIndex::new(500))
            .unwrap();
        let pending = match outcome {
            EffectOutcome::Pending(pending) => pending,
            EffectOutcome::Completed => panic!("expected a pending retire"),
        };
        assert_eq!(pending.kind(), ChoiceKind::RetireFromHand);
        let hand_before = state.players[0].hand.len();

        let err = engine
            .resume(
                &mut state,
                &mut notifier,
                pending,
                Choice::HandCard(UniqueIndex::new(9999)),
            )
            .unwrap_err();
        let ResumeError::Rejected { pending, error } = err else {
            panic!("expected a rejected choice");
        };
        assert!(matches!(error, EngineError::CardNotFound { pile: "hand", .. }));
        assert_eq!(state.players[0].hand.len(), hand_before);

        let index = state.players[0].hand[0].unique_index;
        let outcome = engine
            .resume(&mut state, &mut notifier, pending, Choice::HandCard(index))
            .unwrap();
        assert!(outcome.is_completed());
        assert_eq!(state.players[0].hand.len(), hand_before - 1);
        assert_eq!(state.retired_cards.len(), 1);
    }

    #[test]
    fn test_pivot_interactive_chains_demote_then_promote() {
        let engine = GameEngine::new(base_catalog(), CustomEffectRegistry::interactive());
        let mut state = new_game(5);
        let mut notifier = RecordingNotifier::new();
        state.players[0].pillar_ranks[0] = 2;
        let card = CardInstance::new("Pivot", UniqueIndex::new(501));
        state.players[0].hand.push(card);

        let outcome = engine
            .play_card(&mut state, &mut notifier, UniqueIndex::new(501))
            .unwrap();
        let pending = match outcome {
            EffectOutcome::Pending(pending) => pending,
            EffectOutcome::Completed => panic!("expected a pending demote"),
        };
        assert_eq!(pending.kind(), ChoiceKind::DemotePillar);

        let outcome = engine
            .resume(&mut state, &mut notifier, pending, Choice::Pillar(0))
            .unwrap();
        let pending = match outcome {
            EffectOutcome::Pending(pending) => pending,
            EffectOutcome::Completed => panic!("expected a chained promote"),
        };
        assert_eq!(pending.kind(), ChoiceKind::PromotePillar);
        assert_eq!(state.players[0].rank(0), 1);

        let outcome = engine
            .resume(&mut state, &mut notifier, pending, Choice::Pillar(4))
            .unwrap();
        assert!(outcome.is_completed());
        assert_eq!(state.players[0].rank(4), 1);
    }

    #[test]
    fn test_pending_trial_defers_cleanup_until_resume() {
        let engine = GameEngine::new(base_catalog(), CustomEffectRegistry::interactive());
        let mut state = new_game(6);
        let mut notifier = RecordingNotifier::new();
        // Force First Customer Demo, whose fail directive is demote-any
        // and raises an interactive choice.
        let stack = &mut state.trial_stacks[0];
        let pos = stack
            .not_used
            .iter()
            .position(|c| c.name == "First Customer Demo")
            .expect("phase one stack holds First Customer Demo");
        let card = stack.not_used.remove(pos);
        stack.not_used.insert(0, card);
        // Rank so the demote is a real decision.
        state.players[0].pillar_ranks[1] = 2;

        let report = engine.end_turn(&mut state, &mut notifier).unwrap();
        match report.outcome {
            EffectOutcome::Pending(pending) => {
                assert!(!report.won);
                assert_eq!(pending.kind(), ChoiceKind::DemotePillar);
                // Turn has not passed yet.
                assert_eq!(state.current_player, 0);

                // A bad choice must not strand the queued cleanup.
                let err = engine
                    .resume(&mut state, &mut notifier, pending, Choice::Pillar(99))
                    .unwrap_err();
                let ResumeError::Rejected { pending, .. } = err else {
                    panic!("expected a rejected choice");
                };
                assert_eq!(state.current_player, 0);

                let outcome = engine
                    .resume(&mut state, &mut notifier, pending, Choice::Pillar(1))
                    .unwrap();
                assert!(outcome.is_completed());
                assert_eq!(state.players[0].rank(1), 1);
                assert_eq!(state.current_player, 1);
            }
            EffectOutcome::Completed => {
                // Won the trial: cleanup ran inline and the turn passed.
                assert!(report.won);
                assert_eq!(state.current_player, 1);
            }
        }
    }
}
