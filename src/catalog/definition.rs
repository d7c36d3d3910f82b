//! Card definitions - static, versioned card data.
//!
//! A `CardDefinition` is pure data: name, cost, resource grants, the
//! data-driven action, and trial parameters. Behavior that cannot be
//! expressed here (interactive choices, multi-step sequences) lives in the
//! custom effect registry, keyed by the same name.
//!
//! Costs use the printed compact encoding: one `'$'` per credit and one
//! `'T'` per talent, so `"$$T"` is two credits and a talent.

use serde::{Deserialize, Serialize};

use crate::core::EngineError;

/// Broad card category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    /// Acquirable/playable cards forming the deck economy.
    Resource,
    /// Challenge cards resolved by dice roll.
    Trial,
    /// The five static pillar reference cards.
    Pillar,
    /// Rules reference and other inert cards.
    Reference,
}

/// Acquisition cost in credits and talents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    pub credits: u32,
    pub talents: u32,
}

impl Cost {
    /// Parse the compact symbol encoding (`'$'` = credit, `'T'` = talent).
    pub fn parse(symbols: &str) -> Result<Self, EngineError> {
        let mut cost = Cost::default();
        for symbol in symbols.chars() {
            match symbol {
                '$' => cost.credits += 1,
                'T' => cost.talents += 1,
                other => {
                    return Err(EngineError::InvalidCostSymbol {
                        cost: symbols.to_string(),
                        symbol: other,
                    })
                }
            }
        }
        Ok(cost)
    }

    /// True when the cost is zero (starter cards).
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.credits == 0 && self.talents == 0
    }
}

impl std::fmt::Display for Cost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for _ in 0..self.credits {
            write!(f, "$")?;
        }
        for _ in 0..self.talents {
            write!(f, "T")?;
        }
        if self.is_free() {
            write!(f, "free")?;
        }
        Ok(())
    }
}

/// A grantable resource counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Credits,
    Talents,
    Creativity,
    Customers,
}

impl Resource {
    /// Display noun for narration.
    #[must_use]
    pub fn noun(self) -> &'static str {
        match self {
            Resource::Credits => "credits",
            Resource::Talents => "talents",
            Resource::Creativity => "creativity",
            Resource::Customers => "customers",
        }
    }
}

/// How much of a resource a card grants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Amount {
    /// A fixed amount.
    Fixed(u32),
    /// The player's current rank on the given pillar, looked up live.
    ByPillarRank(usize),
}

/// One resource grant on a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provide {
    pub resource: Resource,
    pub amount: Amount,
}

/// Target of a promote or demote directive.
///
/// Mirrors the printed pillar indices: 0-4 name a specific pillar, 5 means
/// "any pillar of the player's choice", 6 means "roll a d6" (1-5 picks that
/// pillar, 6 upgrades to a free choice).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromoteTarget {
    Pillar(usize),
    Any,
    Roll,
}

/// Data-driven, non-interactive card action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardAction {
    /// Draw N cards, one at a time; exhausted decks absorb the shortfall.
    Draw(u32),
    /// Promote a pillar per the target directive.
    Promote(PromoteTarget),
    /// Retire a card from hand (delegates the choice of which).
    Retire,
}

/// An action gated on a pillar-rank threshold.
///
/// Evaluated after the card's unconditional action, never before.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalAction {
    pub pillar: usize,
    pub min_rank: u8,
    pub action: CardAction,
}

/// Outcome descriptor for one branch of a trial.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialOutcome {
    /// Customer delta. Losses are floored at the player's current count.
    pub customers: i64,
    /// Promote (on success) or demote (on failure) directive.
    pub directive: Option<PromoteTarget>,
}

/// Trial parameters, present only on `CardKind::Trial` cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialSpec {
    /// Roll total required to win.
    pub threshold: i64,
    /// `add`-flagged trials also add the player's rank on this pillar.
    pub add_rank_pillar: Option<usize>,
    /// Applied when the roll meets the threshold.
    pub success: TrialOutcome,
    /// Applied when it does not.
    pub fail: TrialOutcome,
}

/// Static definition of one distinct card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique catalog key.
    pub name: String,

    /// Broad category.
    pub kind: CardKind,

    /// Subtype label. For trial cards this is the phase label
    /// ("Launch", "Growth", or "Scale").
    pub subtype: Option<String>,

    /// Acquisition cost. Free for starters, trials, and pillars.
    pub cost: Cost,

    /// Resource grants applied when played (or, for trials, never).
    pub provides: Vec<Provide>,

    /// Unconditional action.
    pub action: Option<CardAction>,

    /// Action gated on a pillar-rank threshold.
    pub conditional: Option<ConditionalAction>,

    /// Trial parameters, `Trial` cards only.
    pub trial: Option<TrialSpec>,

    /// Pillar index (0-4), `Pillar` cards only.
    pub pillar_index: Option<usize>,

    /// Printed numeral for pillar cards ("I" - "V").
    pub pillar_numeral: Option<String>,

    /// Physical copies in the game deck.
    pub copies: u32,

    /// Starter cards: one copy dealt to every player's opening deck.
    pub starter: bool,
}

impl CardDefinition {
    /// Create a resource card definition.
    #[must_use]
    pub fn resource(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: CardKind::Resource,
            subtype: None,
            cost: Cost::default(),
            provides: Vec::new(),
            action: None,
            conditional: None,
            trial: None,
            pillar_index: None,
            pillar_numeral: None,
            copies: 1,
            starter: false,
        }
    }

    /// Create a trial card definition for a phase label.
    #[must_use]
    pub fn trial(name: impl Into<String>, phase_label: impl Into<String>, spec: TrialSpec) -> Self {
        let mut def = Self::resource(name);
        def.kind = CardKind::Trial;
        def.subtype = Some(phase_label.into());
        def.trial = Some(spec);
        def
    }

    /// Create a pillar reference card.
    #[must_use]
    pub fn pillar(name: impl Into<String>, index: usize, numeral: impl Into<String>) -> Self {
        let mut def = Self::resource(name);
        def.kind = CardKind::Pillar;
        def.pillar_index = Some(index);
        def.pillar_numeral = Some(numeral.into());
        def
    }

    /// Set the cost from the compact symbol encoding (builder).
    ///
    /// Panics on an invalid symbol: cost strings are compiled-in catalog
    /// literals, so a bad one is a programmer error.
    #[must_use]
    pub fn with_cost(mut self, symbols: &str) -> Self {
        self.cost = Cost::parse(symbols)
            .unwrap_or_else(|e| panic!("bad cost literal for {}: {e}", self.name));
        self
    }

    /// Add a fixed resource grant (builder).
    #[must_use]
    pub fn with_provides(mut self, resource: Resource, amount: u32) -> Self {
        self.provides.push(Provide {
            resource,
            amount: Amount::Fixed(amount),
        });
        self
    }

    /// Add a by-pillar-rank resource grant (builder).
    #[must_use]
    pub fn with_provides_by_rank(mut self, resource: Resource, pillar: usize) -> Self {
        self.provides.push(Provide {
            resource,
            amount: Amount::ByPillarRank(pillar),
        });
        self
    }

    /// Set the unconditional action (builder).
    #[must_use]
    pub fn with_action(mut self, action: CardAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Set the conditional action (builder).
    #[must_use]
    pub fn with_conditional(mut self, pillar: usize, min_rank: u8, action: CardAction) -> Self {
        self.conditional = Some(ConditionalAction {
            pillar,
            min_rank,
            action,
        });
        self
    }

    /// Set the copy count (builder).
    #[must_use]
    pub fn with_copies(mut self, copies: u32) -> Self {
        self.copies = copies;
        self
    }

    /// Mark as a starter card (builder).
    #[must_use]
    pub fn as_starter(mut self) -> Self {
        self.starter = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_parse() {
        let cost = Cost::parse("$$T").unwrap();
        assert_eq!(cost.credits, 2);
        assert_eq!(cost.talents, 1);
        assert_eq!(format!("{}", cost), "$$T");
    }

    #[test]
    fn test_cost_parse_empty() {
        let cost = Cost::parse("").unwrap();
        assert!(cost.is_free());
        assert_eq!(format!("{}", cost), "free");
    }

    #[test]
    fn test_cost_parse_invalid_symbol() {
        let err = Cost::parse("$X");
        assert!(matches!(
            err,
            Err(EngineError::InvalidCostSymbol { symbol: 'X', .. })
        ));
    }

    #[test]
    fn test_resource_builder() {
        let def = CardDefinition::resource("Hack Day")
            .with_cost("$$")
            .with_provides(Resource::Creativity, 2)
            .with_copies(3);

        assert_eq!(def.kind, CardKind::Resource);
        assert_eq!(def.cost.credits, 2);
        assert_eq!(def.provides.len(), 1);
        assert_eq!(def.copies, 3);
        assert!(!def.starter);
    }

    #[test]
    fn test_trial_builder() {
        let spec = TrialSpec {
            threshold: 7,
            add_rank_pillar: None,
            success: TrialOutcome {
                customers: 2,
                directive: None,
            },
            fail: TrialOutcome {
                customers: -1,
                directive: Some(PromoteTarget::Any),
            },
        };
        let def = CardDefinition::trial("Production Outage", "Launch", spec);

        assert_eq!(def.kind, CardKind::Trial);
        assert_eq!(def.subtype.as_deref(), Some("Launch"));
        assert_eq!(def.trial.unwrap().threshold, 7);
    }

    #[test]
    fn test_pillar_builder() {
        let def = CardDefinition::pillar("Security", 0, "I");
        assert_eq!(def.kind, CardKind::Pillar);
        assert_eq!(def.pillar_index, Some(0));
        assert_eq!(def.pillar_numeral.as_deref(), Some("I"));
    }

    #[test]
    #[should_panic(expected = "bad cost literal")]
    fn test_bad_cost_literal_panics() {
        let _ = CardDefinition::resource("Broken").with_cost("$£");
    }

    #[test]
    fn test_definition_serde_round_trip() {
        let def = CardDefinition::resource("Pair Programming")
            .with_cost("$T")
            .with_provides(Resource::Creativity, 1)
            .with_action(CardAction::Draw(1));

        let json = serde_json::to_string(&def).unwrap();
        let back: CardDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(def, back);
    }
}
