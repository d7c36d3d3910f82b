//! The base card set.
//!
//! Pure data: five pillars, six starter cards, the market supply, and
//! twelve trial cards across the three phases. Cards with behavior beyond
//! catalog data (Decommission, Forecast, Pivot, Market Disruption) are
//! registered here and overridden in the custom effect registry.

use super::catalog::CardCatalog;
use super::definition::{
    CardAction, CardDefinition, PromoteTarget, Resource, TrialOutcome, TrialSpec,
};

/// Pillar names, in printed index order.
pub const PILLAR_NAMES: [&str; 5] = [
    "Security",
    "Reliability",
    "Performance",
    "Cost Optimization",
    "Operational Excellence",
];

fn trial_spec(
    threshold: i64,
    add_rank_pillar: Option<usize>,
    success: TrialOutcome,
    fail: TrialOutcome,
) -> TrialSpec {
    TrialSpec {
        threshold,
        add_rank_pillar,
        success,
        fail,
    }
}

fn outcome(customers: i64, directive: Option<PromoteTarget>) -> TrialOutcome {
    TrialOutcome {
        customers,
        directive,
    }
}

/// Build the standard catalog.
#[must_use]
pub fn base_catalog() -> CardCatalog {
    let mut catalog = CardCatalog::new();

    // Pillar reference cards.
    let numerals = ["I", "II", "III", "IV", "V"];
    for (index, name) in PILLAR_NAMES.iter().enumerate() {
        catalog.register(CardDefinition::pillar(*name, index, numerals[index]));
    }

    // Starters: one copy of each per player's opening deck.
    catalog.register(
        CardDefinition::resource("Seed Funding")
            .with_provides(Resource::Credits, 1)
            .as_starter(),
    );
    catalog.register(
        CardDefinition::resource("Side Project")
            .with_provides(Resource::Credits, 1)
            .as_starter(),
    );
    catalog.register(
        CardDefinition::resource("Garage Office")
            .with_provides(Resource::Credits, 1)
            .as_starter(),
    );
    catalog.register(
        CardDefinition::resource("Founding Engineer")
            .with_provides(Resource::Talents, 1)
            .as_starter(),
    );
    catalog.register(
        CardDefinition::resource("Early Believer")
            .with_provides(Resource::Talents, 1)
            .as_starter(),
    );
    catalog.register(
        CardDefinition::resource("Hackathon Trophy")
            .with_provides(Resource::Creativity, 1)
            .as_starter(),
    );

    // Market supply.
    catalog.register(
        CardDefinition::resource("Dev Tooling")
            .with_cost("$")
            .with_provides(Resource::Credits, 2)
            .with_copies(4),
    );
    catalog.register(
        CardDefinition::resource("Documentation Day")
            .with_cost("$")
            .with_action(CardAction::Draw(2))
            .with_copies(3),
    );
    catalog.register(
        CardDefinition::resource("Pair Programming")
            .with_cost("$T")
            .with_provides(Resource::Creativity, 1)
            .with_action(CardAction::Draw(1))
            .with_copies(3),
    );
    catalog.register(
        CardDefinition::resource("Hack Day")
            .with_cost("$$")
            .with_provides(Resource::Creativity, 2)
            .with_copies(3),
    );
    catalog.register(
        CardDefinition::resource("Refactoring Sprint")
            .with_cost("$$")
            .with_action(CardAction::Promote(PromoteTarget::Any))
            .with_copies(3),
    );
    catalog.register(
        CardDefinition::resource("Chaos Testing")
            .with_cost("$T")
            .with_action(CardAction::Promote(PromoteTarget::Roll))
            .with_copies(3),
    );
    catalog.register(
        CardDefinition::resource("Marketing Blitz")
            .with_cost("$$")
            .with_provides(Resource::Customers, 1)
            .with_copies(2),
    );
    catalog.register(
        CardDefinition::resource("Senior Architect")
            .with_cost("$$T")
            .with_provides(Resource::Talents, 2)
            .with_conditional(0, 2, CardAction::Draw(1))
            .with_copies(2),
    );
    catalog.register(
        CardDefinition::resource("Hiring Spree")
            .with_cost("$$$")
            .with_provides(Resource::Talents, 3)
            .with_copies(2),
    );
    catalog.register(
        CardDefinition::resource("Venture Round")
            .with_cost("$$T")
            .with_provides_by_rank(Resource::Credits, 3)
            .with_copies(2),
    );
    catalog.register(
        CardDefinition::resource("Recruiter")
            .with_cost("$$")
            .with_provides_by_rank(Resource::Talents, 4)
            .with_copies(2),
    );
    // Custom-effect cards. Retire/peek/swap behavior lives in the registry.
    catalog.register(
        CardDefinition::resource("Decommission")
            .with_cost("$")
            .with_action(CardAction::Retire)
            .with_copies(2),
    );
    catalog.register(
        CardDefinition::resource("Forecast")
            .with_cost("$T")
            .with_provides(Resource::Creativity, 1)
            .with_copies(2),
    );
    catalog.register(
        CardDefinition::resource("Pivot")
            .with_cost("$$")
            .with_copies(2),
    );

    // Launch trials (phase 1).
    catalog.register(
        CardDefinition::trial(
            "First Customer Demo",
            "Launch",
            trial_spec(
                5,
                None,
                outcome(2, None),
                outcome(-1, Some(PromoteTarget::Any)),
            ),
        )
        .with_copies(2),
    );
    catalog.register(
        CardDefinition::trial(
            "Production Outage",
            "Launch",
            trial_spec(
                6,
                None,
                outcome(1, Some(PromoteTarget::Pillar(1))),
                outcome(-1, Some(PromoteTarget::Roll)),
            ),
        )
        .with_copies(2),
    );
    catalog.register(
        CardDefinition::trial(
            "Security Audit",
            "Launch",
            trial_spec(
                6,
                None,
                outcome(1, Some(PromoteTarget::Pillar(0))),
                outcome(0, Some(PromoteTarget::Pillar(0))),
            ),
        )
        .with_copies(2),
    );
    catalog.register(
        CardDefinition::trial(
            "Scaling Hiccup",
            "Launch",
            trial_spec(
                7,
                Some(2),
                outcome(2, Some(PromoteTarget::Any)),
                outcome(-1, None),
            ),
        )
        .with_copies(2),
    );

    // Growth trials (phase 2).
    catalog.register(
        CardDefinition::trial(
            "Viral Growth",
            "Growth",
            trial_spec(
                8,
                None,
                outcome(3, Some(PromoteTarget::Any)),
                outcome(-1, Some(PromoteTarget::Any)),
            ),
        )
        .with_copies(2),
    );
    catalog.register(
        CardDefinition::trial(
            "Data Breach",
            "Growth",
            trial_spec(
                9,
                None,
                outcome(1, Some(PromoteTarget::Pillar(0))),
                outcome(-2, Some(PromoteTarget::Roll)),
            ),
        )
        .with_copies(2),
    );
    catalog.register(
        CardDefinition::trial(
            "Market Disruption",
            "Growth",
            trial_spec(9, None, outcome(2, None), outcome(-1, None)),
        )
        .with_copies(2),
    );
    catalog.register(
        CardDefinition::trial(
            "Regional Outage",
            "Growth",
            trial_spec(
                10,
                Some(1),
                outcome(2, Some(PromoteTarget::Pillar(1))),
                outcome(-2, Some(PromoteTarget::Pillar(1))),
            ),
        )
        .with_copies(2),
    );

    // Scale trials (phase 3).
    catalog.register(
        CardDefinition::trial(
            "Global Expansion",
            "Scale",
            trial_spec(
                11,
                None,
                outcome(2, Some(PromoteTarget::Roll)),
                outcome(-1, Some(PromoteTarget::Roll)),
            ),
        )
        .with_copies(2),
    );
    catalog.register(
        CardDefinition::trial(
            "IPO Roadshow",
            "Scale",
            trial_spec(
                12,
                None,
                outcome(3, Some(PromoteTarget::Any)),
                outcome(-2, Some(PromoteTarget::Any)),
            ),
        )
        .with_copies(2),
    );
    catalog.register(
        CardDefinition::trial(
            "Regulatory Review",
            "Scale",
            trial_spec(
                12,
                Some(0),
                outcome(2, Some(PromoteTarget::Pillar(0))),
                outcome(-2, Some(PromoteTarget::Pillar(0))),
            ),
        )
        .with_copies(2),
    );
    catalog.register(
        CardDefinition::trial(
            "Platform Rewrite",
            "Scale",
            trial_spec(
                13,
                None,
                outcome(3, Some(PromoteTarget::Any)),
                outcome(-3, Some(PromoteTarget::Any)),
            ),
        )
        .with_copies(2),
    );

    catalog
}
