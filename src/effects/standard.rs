//! Data-driven card effect resolution.
//!
//! Every card resolves its catalog-declared parts in a fixed order:
//! resource provides first, then the unconditional action, then the
//! conditional action. The conditional gate is evaluated only after the
//! unconditional action has settled, so a promotion granted by the same
//! card can satisfy it. When an interactive choice suspends the chain,
//! the remaining steps are queued on the [`PendingChoice`] and replayed
//! in order on resume.

use tracing::trace;

use crate::catalog::{
    Amount, CardAction, CardCatalog, ConditionalAction, PromoteTarget, Resource,
};
use crate::core::{CardInstance, EngineError, GameState};
use crate::effects::outcome::{
    ChoiceKind, ChoiceMode, EffectOutcome, FollowUp, PendingChoice,
};
use crate::notify::Notifier;

/// Everything an effect needs to read and mutate while resolving.
///
/// Borrows are split per field so an effect can, for example, read a
/// player while rolling the shared die.
pub struct EffectContext<'a> {
    pub catalog: &'a CardCatalog,
    pub state: &'a mut GameState,
    pub notifier: &'a mut dyn Notifier,
    /// Index of the acting player.
    pub player: usize,
    /// How open choices are settled.
    pub mode: ChoiceMode,
    /// Trial phase the acting player currently faces (1-based).
    pub trial_phase: usize,
}

impl EffectContext<'_> {
    pub(crate) fn player_name(&self) -> String {
        self.state.players[self.player].name.clone()
    }

    pub(crate) fn pillar_name(&self, pillar: usize) -> String {
        self.state
            .pillars
            .get(pillar)
            .map(|card| card.name.clone())
            .unwrap_or_else(|| format!("pillar {pillar}"))
    }
}

/// Applies a card's provides, action and conditional action in order.
///
/// Returns [`EffectOutcome::Pending`] when an interactive choice
/// suspended the chain; any steps not yet run ride along as follow-ups.
pub fn apply_standard(
    ctx: &mut EffectContext<'_>,
    card: &CardInstance,
) -> Result<EffectOutcome, EngineError> {
    let def = ctx.catalog.get_required(&card.name)?.clone();
    trace!(card = %card.name, player = ctx.player, "resolving standard effects");

    for provide in &def.provides {
        apply_provide(ctx, card, provide.resource, provide.amount);
    }

    let mut outcome = EffectOutcome::Completed;
    if let Some(action) = def.action {
        outcome = apply_action(ctx, card, action)?;
    }

    if let Some(conditional) = def.conditional {
        match &mut outcome {
            EffectOutcome::Completed => {
                outcome = apply_conditional(ctx, card, conditional)?;
            }
            EffectOutcome::Pending(pending) => {
                pending.push_follow_up(FollowUp::Conditional(conditional));
            }
        }
    }

    Ok(outcome)
}

fn apply_provide(
    ctx: &mut EffectContext<'_>,
    card: &CardInstance,
    resource: Resource,
    amount: Amount,
) {
    let amount = match amount {
        Amount::Fixed(n) => n,
        Amount::ByPillarRank(pillar) => {
            u32::from(ctx.state.players[ctx.player].rank(pillar))
        }
    };
    if amount == 0 {
        return;
    }
    let who = ctx.player_name();
    match resource {
        Resource::Credits => ctx.state.players[ctx.player].credits += amount,
        Resource::Talents => ctx.state.players[ctx.player].talents += amount,
        Resource::Creativity => ctx.state.players[ctx.player].creativity += amount,
        Resource::Customers => {
            change_customers(ctx, i64::from(amount));
            return;
        }
    }
    ctx.notifier.notify(&format!(
        "{who} gains {amount} {} from {}",
        resource.noun(),
        card.name
    ));
}

/// Re-checks the rank gate and runs the gated action if it holds.
pub(crate) fn apply_conditional(
    ctx: &mut EffectContext<'_>,
    card: &CardInstance,
    conditional: ConditionalAction,
) -> Result<EffectOutcome, EngineError> {
    if ctx.state.players[ctx.player].rank(conditional.pillar) >= conditional.min_rank {
        apply_action(ctx, card, conditional.action)
    } else {
        Ok(EffectOutcome::Completed)
    }
}

/// Runs a single data-driven action.
pub(crate) fn apply_action(
    ctx: &mut EffectContext<'_>,
    card: &CardInstance,
    action: CardAction,
) -> Result<EffectOutcome, EngineError> {
    match action {
        CardAction::Draw(count) => {
            let who = ctx.player_name();
            let mut drawn = 0;
            for _ in 0..count {
                if ctx.state.draw_one(ctx.player) {
                    drawn += 1;
                }
            }
            if drawn > 0 {
                ctx.notifier
                    .notify(&format!("{who} draws {drawn} card(s) from {}", card.name));
            }
            Ok(EffectOutcome::Completed)
        }
        CardAction::Promote(target) => apply_promote_target(ctx, card, target, false),
        CardAction::Retire => retire_from_hand(ctx, card),
    }
}

/// Resolves a promote (or demote) target to a concrete pillar change.
pub(crate) fn apply_promote_target(
    ctx: &mut EffectContext<'_>,
    card: &CardInstance,
    target: PromoteTarget,
    demote: bool,
) -> Result<EffectOutcome, EngineError> {
    match target {
        PromoteTarget::Pillar(pillar) => {
            promote_pillar(ctx, pillar, demote);
            Ok(EffectOutcome::Completed)
        }
        PromoteTarget::Any => match ctx.mode {
            ChoiceMode::Automated => {
                let pick = if demote {
                    Some(ctx.state.players[ctx.player].lowest_pillar())
                } else {
                    ctx.state.players[ctx.player].first_promotable(ctx.state.pillar_max)
                };
                match pick {
                    Some(pillar) => promote_pillar(ctx, pillar, demote),
                    None => {
                        let who = ctx.player_name();
                        ctx.notifier
                            .notify(&format!("{who} has every pillar at maximum rank"));
                    }
                }
                Ok(EffectOutcome::Completed)
            }
            ChoiceMode::Interactive => {
                let kind = if demote {
                    ChoiceKind::DemotePillar
                } else {
                    ChoiceKind::PromotePillar
                };
                Ok(EffectOutcome::Pending(PendingChoice::new(
                    ctx.player,
                    card.clone(),
                    kind,
                )))
            }
        },
        PromoteTarget::Roll => {
            let die = ctx.state.rng.roll_die();
            let who = ctx.player_name();
            ctx.notifier
                .notify(&format!("{who} rolls a {die} on the pillar die"));
            if die == 6 {
                apply_promote_target(ctx, card, PromoteTarget::Any, demote)
            } else {
                promote_pillar(ctx, usize::from(die - 1), demote);
                Ok(EffectOutcome::Completed)
            }
        }
    }
}

/// Shifts one pillar rank up or down, narrating no-ops at the bounds.
pub(crate) fn promote_pillar(ctx: &mut EffectContext<'_>, pillar: usize, demote: bool) {
    let who = ctx.player_name();
    let pillar_name = ctx.pillar_name(pillar);
    let max = ctx.state.pillar_max;
    let changed = ctx.state.players[ctx.player].promote(pillar, demote, max);
    let message = match (demote, changed) {
        (false, true) => {
            let rank = ctx.state.players[ctx.player].rank(pillar);
            format!("{who} promotes {pillar_name} to rank {rank}")
        }
        (false, false) => format!("{who} already has {pillar_name} at maximum rank"),
        (true, true) => {
            let rank = ctx.state.players[ctx.player].rank(pillar);
            format!("{who} demotes {pillar_name} to rank {rank}")
        }
        (true, false) => format!("{who} already has {pillar_name} at rank 0"),
    };
    ctx.notifier.notify(&message);
}

fn retire_from_hand(
    ctx: &mut EffectContext<'_>,
    card: &CardInstance,
) -> Result<EffectOutcome, EngineError> {
    match ctx.mode {
        ChoiceMode::Automated => {
            let first = ctx.state.players[ctx.player]
                .hand
                .first()
                .map(|c| c.unique_index);
            let who = ctx.player_name();
            match first {
                Some(index) => {
                    let name = ctx.state.retire_from_hand(ctx.player, index)?;
                    ctx.notifier.notify(&format!("{who} retires {name}"));
                }
                None => {
                    ctx.notifier
                        .notify(&format!("{who} has no card in hand to retire"));
                }
            }
            Ok(EffectOutcome::Completed)
        }
        ChoiceMode::Interactive => Ok(EffectOutcome::Pending(PendingChoice::new(
            ctx.player,
            card.clone(),
            ChoiceKind::RetireFromHand,
        ))),
    }
}

/// Adjusts the acting player's customer count, flooring at zero.
pub(crate) fn change_customers(ctx: &mut EffectContext<'_>, delta: i64) {
    if delta == 0 {
        return;
    }
    let who = ctx.player_name();
    let player = &mut ctx.state.players[ctx.player];
    if delta > 0 {
        player.customers += delta as u32;
        let total = player.customers;
        ctx.notifier
            .notify(&format!("{who} gains {delta} customer(s), now {total}"));
    } else if player.customers == 0 {
        ctx.notifier
            .notify(&format!("{who} has no customers left to lose"));
    } else {
        let loss = (-delta as u32).min(player.customers);
        player.customers -= loss;
        let total = player.customers;
        ctx.notifier
            .notify(&format!("{who} loses {loss} customer(s), now {total}"));
    }
}
