//! Card effect resolution: data-driven effects, custom behavior, and
//! the pending-choice machinery that suspends and resumes them.

pub mod custom;
pub mod outcome;
pub mod standard;

pub use custom::{choice_matches, CardEffect, CustomEffectRegistry};
pub use outcome::{Choice, ChoiceKind, ChoiceMode, EffectOutcome, PendingChoice};
pub use standard::EffectContext;
