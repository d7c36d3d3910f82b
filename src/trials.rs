//! Dice-based trial resolution.
//!
//! ## Flow
//!
//! A trial runs against the top card of the phase's stack in three
//! steps, encoded as a typestate so a begun trial cannot be resolved
//! without a roll and cannot be rolled twice:
//!
//! 1. [`Trial::begin`] validates the phase and reads the top card.
//! 2. [`AwaitingRoll::roll`] throws 2d6 and adds the player's creativity
//!    (plus a pillar rank when the trial grants one).
//! 3. [`Rolled::resolve`] moves the card to the used pile, applies the
//!    win or loss outcome, then the card's custom effect.
//!
//! The consumed card moves to the used pile before any outcome applies,
//! so effects that inspect the stack see it in its post-trial shape.
//! When a stack's draw pile empties, the used pile reshuffles back in.

use tracing::debug;

use crate::catalog::{CardCatalog, TrialSpec};
use crate::core::{CardInstance, EngineError, GameState, Player, PHASE_COUNT};
use crate::effects::custom::CustomEffectRegistry;
use crate::effects::outcome::{EffectOutcome, FollowUp};
use crate::effects::standard::{apply_promote_target, change_customers, EffectContext};

/// Entry point for the trial typestate.
pub struct Trial;

impl Trial {
    /// Start a trial against the top card of the given phase's stack.
    ///
    /// `phase` is 1-based. Fails when the phase is out of range or the
    /// stack has no card left to draw.
    pub fn begin(
        catalog: &CardCatalog,
        state: &GameState,
        phase: usize,
    ) -> Result<AwaitingRoll, EngineError> {
        if phase == 0 || phase > PHASE_COUNT {
            return Err(EngineError::InvalidPhase { phase });
        }
        let stack = &state.trial_stacks[phase - 1];
        let card = stack
            .not_used
            .first()
            .cloned()
            .ok_or(EngineError::TrialStackEmpty { phase })?;
        let spec = catalog
            .get_required(&card.name)?
            .trial
            .ok_or_else(|| EngineError::NotPlayable {
                name: card.name.clone(),
            })?;
        Ok(AwaitingRoll { phase, card, spec })
    }
}

/// A begun trial waiting on its dice roll.
#[must_use]
pub struct AwaitingRoll {
    phase: usize,
    card: CardInstance,
    spec: TrialSpec,
}

impl AwaitingRoll {
    /// The card being faced.
    #[must_use]
    pub fn card(&self) -> &CardInstance {
        &self.card
    }

    /// Roll 2d6 and total up against the threshold.
    pub fn roll(self, player: &Player, rng: &mut crate::core::GameRng) -> Rolled {
        let dice = rng.roll_dice();
        self.score(player, dice)
    }

    /// Resolve with a fixed dice pair instead of rolling.
    ///
    /// Exists so scripted drivers and tests can exercise exact outcomes
    /// without hunting for a seed.
    pub fn roll_with(self, player: &Player, dice: (u8, u8)) -> Rolled {
        self.score(player, dice)
    }

    fn score(self, player: &Player, dice: (u8, u8)) -> Rolled {
        let mut total = i64::from(dice.0) + i64::from(dice.1) + i64::from(player.creativity);
        if let Some(pillar) = self.spec.add_rank_pillar {
            total += i64::from(player.rank(pillar));
        }
        let won = total >= self.spec.threshold;
        Rolled {
            phase: self.phase,
            card: self.card,
            spec: self.spec,
            dice,
            total,
            won,
        }
    }
}

/// A rolled trial ready to apply its outcome.
#[must_use]
pub struct Rolled {
    phase: usize,
    card: CardInstance,
    spec: TrialSpec,
    dice: (u8, u8),
    total: i64,
    won: bool,
}

impl Rolled {
    /// Apply the win or loss outcome and the card's custom effect.
    pub fn resolve(
        self,
        ctx: &mut EffectContext<'_>,
        registry: &CustomEffectRegistry,
    ) -> Result<TrialReport, EngineError> {
        let Self {
            phase,
            card,
            spec,
            dice,
            total,
            won,
        } = self;
        debug!(card = %card.name, phase, total, threshold = spec.threshold, won, "resolving trial");

        // Consume the card before outcomes run.
        let reshuffled = {
            let GameState {
                trial_stacks, rng, ..
            } = &mut *ctx.state;
            let stack = &mut trial_stacks[phase - 1];
            if !stack.not_used.is_empty() {
                let consumed = stack.not_used.remove(0);
                stack.used.push(consumed);
            }
            stack.top_showing = false;
            if stack.not_used.is_empty() && !stack.used.is_empty() {
                stack.not_used.append(&mut stack.used);
                rng.shuffle(&mut stack.not_used);
                true
            } else {
                false
            }
        };

        let who = ctx.player_name();
        ctx.notifier.notify(&format!(
            "{who} faces {}: rolls {}+{} for a total of {total} against threshold {}",
            card.name, dice.0, dice.1, spec.threshold
        ));
        let outcome_spec = if won {
            ctx.notifier.notify(&format!("{who} overcomes {}", card.name));
            spec.success
        } else {
            ctx.notifier.notify(&format!("{who} fails {}", card.name));
            spec.fail
        };

        change_customers(ctx, outcome_spec.customers);
        let mut outcome = EffectOutcome::Completed;
        if let Some(directive) = outcome_spec.directive {
            outcome = apply_promote_target(ctx, &card, directive, !won)?;
        }

        if registry.contains(&card.name) {
            match &mut outcome {
                EffectOutcome::Completed => {
                    if let Some(effect) = registry.get(&card.name) {
                        outcome = effect.apply(ctx, &card, Some(won))?;
                    }
                }
                EffectOutcome::Pending(pending) => {
                    pending.is_winner = Some(won);
                    pending.push_follow_up(FollowUp::Custom);
                }
            }
        }
        if let EffectOutcome::Pending(pending) = &mut outcome {
            pending.is_winner = Some(won);
        }

        Ok(TrialReport {
            card: card.name,
            phase,
            dice,
            total,
            threshold: spec.threshold,
            won,
            reshuffled,
            outcome,
        })
    }
}

/// What happened when a trial resolved.
#[derive(Debug)]
pub struct TrialReport {
    /// Name of the trial card faced.
    pub card: String,
    /// Phase the trial belonged to (1-based).
    pub phase: usize,
    /// The raw dice pair.
    pub dice: (u8, u8),
    /// Dice plus creativity plus any granted pillar rank.
    pub total: i64,
    /// Threshold the total was measured against.
    pub threshold: i64,
    /// Whether the player overcame the trial.
    pub won: bool,
    /// Whether resolving this trial reshuffled the stack's used pile.
    pub reshuffled: bool,
    /// Completed, or suspended on a choice from the trial's effects.
    pub outcome: EffectOutcome,
}

/// Begin, roll, and resolve a trial in one step.
pub fn run_trial(
    ctx: &mut EffectContext<'_>,
    registry: &CustomEffectRegistry,
    phase: usize,
) -> Result<TrialReport, EngineError> {
    let awaiting = Trial::begin(ctx.catalog, ctx.state, phase)?;
    let rolled = {
        let GameState { players, rng, .. } = &mut *ctx.state;
        awaiting.roll(&players[ctx.player], rng)
    };
    rolled.resolve(ctx, registry)
}
