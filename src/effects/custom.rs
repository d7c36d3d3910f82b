//! Registered card behavior beyond the data-driven parts.
//!
//! A handful of cards do things the catalog schema cannot express: peek
//! at a trial stack, chain a demote into a promote, branch on a trial's
//! outcome. Those hang off a name-keyed registry. Custom behavior runs
//! after the card's standard effects have fully settled; when the
//! standard chain suspends on a choice, the custom step is queued as a
//! follow-up instead.
//!
//! Two registry variants exist with the identical effect contract: the
//! automated one settles every open choice with a fixed policy (for
//! self-play and simulation), the interactive one surfaces choices as
//! [`EffectOutcome::Pending`].

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::core::{CardInstance, EngineError};
use crate::effects::outcome::{
    Choice, ChoiceKind, ChoiceMode, EffectOutcome, FollowUp, PendingChoice,
};
use crate::effects::standard::{promote_pillar, EffectContext};

/// Names bound to custom behavior in the base registries.
const MARKET_DISRUPTION: &str = "Market Disruption";
const FORECAST: &str = "Forecast";
const PIVOT: &str = "Pivot";

/// Automated Forecast buries a revealed trial tougher than this.
const FORECAST_BURY_THRESHOLD: i64 = 7;

/// One card's registered behavior.
///
/// `is_winner` is `Some` only when the card resolved as a trial; played
/// resource cards see `None`.
pub trait CardEffect: Send + Sync {
    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        card: &CardInstance,
        is_winner: Option<bool>,
    ) -> Result<EffectOutcome, EngineError>;
}

/// Name-keyed table of custom card behavior.
pub struct CustomEffectRegistry {
    table: FxHashMap<String, Box<dyn CardEffect>>,
    mode: ChoiceMode,
}

impl CustomEffectRegistry {
    /// Registry that settles every choice with a fixed automated policy.
    #[must_use]
    pub fn automated() -> Self {
        Self::with_mode(ChoiceMode::Automated)
    }

    /// Registry that surfaces choices as pending outcomes.
    #[must_use]
    pub fn interactive() -> Self {
        Self::with_mode(ChoiceMode::Interactive)
    }

    fn with_mode(mode: ChoiceMode) -> Self {
        let mut registry = Self {
            table: FxHashMap::default(),
            mode,
        };
        registry.register(MARKET_DISRUPTION, Box::new(MarketDisruption));
        registry.register(FORECAST, Box::new(Forecast));
        registry.register(PIVOT, Box::new(Pivot));
        registry
    }

    /// Bind behavior to a card name.
    ///
    /// Panics on a duplicate name; overlapping registrations are a
    /// programmer error.
    pub fn register(&mut self, name: impl Into<String>, effect: Box<dyn CardEffect>) {
        let name = name.into();
        debug!(card = %name, "registering custom effect");
        if self.table.insert(name.clone(), effect).is_some() {
            panic!("duplicate custom effect registration: {name}");
        }
    }

    /// Behavior for a card name, if any is registered.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn CardEffect> {
        self.table.get(name).map(Box::as_ref)
    }

    /// Whether a name has registered behavior.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// How this registry settles open choices.
    #[must_use]
    pub fn mode(&self) -> ChoiceMode {
        self.mode
    }
}

/// Trial card: the winner capitalizes on the chaos and draws two; the
/// loser's standard fail outcome already covers the damage.
struct MarketDisruption;

impl CardEffect for MarketDisruption {
    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        card: &CardInstance,
        is_winner: Option<bool>,
    ) -> Result<EffectOutcome, EngineError> {
        if is_winner == Some(true) {
            let who = ctx.state.players[ctx.player].name.clone();
            let mut drawn = 0;
            for _ in 0..2 {
                if ctx.state.draw_one(ctx.player) {
                    drawn += 1;
                }
            }
            if drawn > 0 {
                ctx.notifier
                    .notify(&format!("{who} draws {drawn} card(s) from {}", card.name));
            }
        }
        Ok(EffectOutcome::Completed)
    }
}

/// Peek at the top card of the player's current trial stack, then decide
/// whether to keep it on top or bury it at the bottom.
struct Forecast;

impl CardEffect for Forecast {
    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        card: &CardInstance,
        _is_winner: Option<bool>,
    ) -> Result<EffectOutcome, EngineError> {
        let phase = ctx.trial_phase;
        let stack = &mut ctx.state.trial_stacks[phase - 1];
        let Some(top) = stack.not_used.first() else {
            ctx.notifier
                .notify(&format!("the phase {phase} trial stack has nothing to reveal"));
            return Ok(EffectOutcome::Completed);
        };
        let top_name = top.name.clone();
        stack.top_showing = true;

        let threshold = ctx
            .catalog
            .get_required(&top_name)?
            .trial
            .map(|spec| spec.threshold)
            .unwrap_or(0);
        let who = ctx.state.players[ctx.player].name.clone();
        ctx.notifier.notify(&format!(
            "{who} reveals the next phase {phase} trial: {top_name} (threshold {threshold})"
        ));

        match ctx.mode {
            ChoiceMode::Automated => {
                keep_or_bury(ctx, phase, threshold <= FORECAST_BURY_THRESHOLD);
                Ok(EffectOutcome::Completed)
            }
            ChoiceMode::Interactive => Ok(EffectOutcome::Pending(PendingChoice::new(
                ctx.player,
                card.clone(),
                ChoiceKind::KeepOrBuryTrial { phase },
            ))),
        }
    }
}

/// Applies a Forecast keep/bury decision to a trial stack.
pub(crate) fn keep_or_bury(ctx: &mut EffectContext<'_>, phase: usize, keep: bool) {
    let who = ctx.state.players[ctx.player].name.clone();
    let stack = &mut ctx.state.trial_stacks[phase - 1];
    stack.top_showing = false;
    if keep {
        ctx.notifier
            .notify(&format!("{who} keeps the revealed trial on top"));
    } else if !stack.not_used.is_empty() {
        let top = stack.not_used.remove(0);
        let name = top.name.clone();
        stack.not_used.push(top);
        ctx.notifier
            .notify(&format!("{who} buries {name} at the bottom of the stack"));
    }
}

/// Demote one pillar, then promote one pillar. Automated play shifts
/// rank out of the weakest pillar into the first unmaxed one.
struct Pivot;

impl CardEffect for Pivot {
    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        card: &CardInstance,
        _is_winner: Option<bool>,
    ) -> Result<EffectOutcome, EngineError> {
        match ctx.mode {
            ChoiceMode::Automated => {
                let lowest = ctx.state.players[ctx.player].lowest_pillar();
                promote_pillar(ctx, lowest, true);
                match ctx.state.players[ctx.player].first_promotable(ctx.state.pillar_max) {
                    Some(pillar) => promote_pillar(ctx, pillar, false),
                    None => {
                        let who = ctx.state.players[ctx.player].name.clone();
                        ctx.notifier
                            .notify(&format!("{who} has every pillar at maximum rank"));
                    }
                }
                Ok(EffectOutcome::Completed)
            }
            ChoiceMode::Interactive => {
                let mut pending =
                    PendingChoice::new(ctx.player, card.clone(), ChoiceKind::DemotePillar);
                pending.push_follow_up(FollowUp::Choice(ChoiceKind::PromotePillar));
                Ok(EffectOutcome::Pending(pending))
            }
        }
    }
}

/// Whether a submitted choice is the right shape for a pending kind.
#[must_use]
pub fn choice_matches(kind: ChoiceKind, choice: &Choice) -> bool {
    matches!(
        (kind, choice),
        (ChoiceKind::PromotePillar, Choice::Pillar(_))
            | (ChoiceKind::DemotePillar, Choice::Pillar(_))
            | (ChoiceKind::RetireFromHand, Choice::HandCard(_))
            | (ChoiceKind::KeepOrBuryTrial { .. }, Choice::Keep(_))
    )
}
