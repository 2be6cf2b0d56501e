//! Class abilities and their resolution

pub mod definition;
pub mod resolver;

pub use definition::{AbilityDef, AbilityEffect, CoverAction, PositionShift};
pub use resolver::{resolve_ability, validate_ability, AbilityOutcome};
