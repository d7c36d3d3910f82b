//! Card catalog: static definitions and the base card set.

pub mod base_set;
#[allow(clippy::module_inception)]
pub mod catalog;
pub mod definition;

pub use base_set::{base_catalog, PILLAR_NAMES};
pub use catalog::{phase_for_label, CardCatalog, PHASE_LABELS};
pub use definition::{
    Amount, CardAction, CardDefinition, CardKind, ConditionalAction, Cost, PromoteTarget, Provide,
    Resource, TrialOutcome, TrialSpec,
};
