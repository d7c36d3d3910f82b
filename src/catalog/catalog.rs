//! Card catalog - name-keyed definition lookup.
//!
//! The catalog is an explicitly constructed, immutable dependency injected
//! into the engine, never ambient global state; tests can run against
//! distinct catalog versions in isolation.

use rustc_hash::FxHashMap;

use crate::core::{EngineError, PILLAR_COUNT};

use super::definition::{CardDefinition, CardKind, PromoteTarget};

/// Phase labels for trial subtypes, in phase order (1-3).
pub const PHASE_LABELS: [&str; 3] = ["Launch", "Growth", "Scale"];

/// Map a trial subtype label to its phase number (1-3).
#[must_use]
pub fn phase_for_label(label: &str) -> Option<usize> {
    PHASE_LABELS.iter().position(|&l| l == label).map(|i| i + 1)
}

/// Registry of card definitions for one catalog version.
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: FxHashMap<String, CardDefinition>,
}

impl CardCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition.
    ///
    /// Panics if a card with the same name already exists; duplicate
    /// registration is a programmer error in catalog construction.
    pub fn register(&mut self, card: CardDefinition) {
        if self.cards.contains_key(&card.name) {
            panic!("card {:?} already registered", card.name);
        }
        self.cards.insert(card.name.clone(), card);
    }

    /// Look up a definition by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CardDefinition> {
        self.cards.get(name)
    }

    /// Look up a definition, failing with `UnknownCard` when absent.
    pub fn get_required(&self, name: &str) -> Result<&CardDefinition, EngineError> {
        self.cards.get(name).ok_or_else(|| EngineError::UnknownCard {
            name: name.to_string(),
        })
    }

    /// Check if a name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.cards.contains_key(name)
    }

    /// Number of distinct definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }

    /// Starter resource definitions (one copy per player at setup).
    pub fn starters(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards
            .values()
            .filter(|c| c.kind == CardKind::Resource && c.starter)
    }

    /// Non-starter resource definitions (the market supply).
    pub fn market_cards(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards
            .values()
            .filter(|c| c.kind == CardKind::Resource && !c.starter)
    }

    /// Trial definitions.
    pub fn trial_cards(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values().filter(|c| c.kind == CardKind::Trial)
    }

    /// Pillar reference definitions.
    pub fn pillar_cards(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values().filter(|c| c.kind == CardKind::Pillar)
    }

    /// Fail-fast consistency checks run before game initialization.
    ///
    /// Verifies that every referenced pillar index is defined, that trial
    /// phase labels map to a stack, and that the pillar reference set
    /// covers indices 0-4 exactly once.
    pub fn validate(&self) -> Result<(), EngineError> {
        let mut pillar_seen = [false; PILLAR_COUNT];
        for def in self.pillar_cards() {
            let index = def.pillar_index.ok_or(EngineError::IncompletePillarSet)?;
            if index >= PILLAR_COUNT || pillar_seen[index] {
                return Err(EngineError::IncompletePillarSet);
            }
            pillar_seen[index] = true;
        }
        if pillar_seen.iter().any(|&seen| !seen) {
            return Err(EngineError::IncompletePillarSet);
        }

        for def in self.cards.values() {
            for pillar in self.referenced_pillars(def) {
                if pillar >= PILLAR_COUNT {
                    return Err(EngineError::UndefinedPillar {
                        name: def.name.clone(),
                        index: pillar,
                    });
                }
            }
            if def.kind == CardKind::Trial {
                let label = def.subtype.as_deref().unwrap_or("");
                if phase_for_label(label).is_none() {
                    return Err(EngineError::UnknownPhaseLabel {
                        name: def.name.clone(),
                        label: label.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Every specific pillar index a definition refers to.
    fn referenced_pillars(&self, def: &CardDefinition) -> Vec<usize> {
        let mut pillars = Vec::new();
        for provide in &def.provides {
            if let super::definition::Amount::ByPillarRank(p) = provide.amount {
                pillars.push(p);
            }
        }
        fn push_action(pillars: &mut Vec<usize>, action: &super::definition::CardAction) {
            if let super::definition::CardAction::Promote(PromoteTarget::Pillar(p)) = action {
                pillars.push(*p);
            }
        }
        if let Some(action) = &def.action {
            push_action(&mut pillars, action);
        }
        if let Some(cond) = &def.conditional {
            pillars.push(cond.pillar);
            push_action(&mut pillars, &cond.action);
        }
        if let Some(trial) = &def.trial {
            if let Some(p) = trial.add_rank_pillar {
                pillars.push(p);
            }
            for outcome in [&trial.success, &trial.fail] {
                if let Some(PromoteTarget::Pillar(p)) = outcome.directive {
                    pillars.push(p);
                }
            }
        }
        pillars
    }
}
