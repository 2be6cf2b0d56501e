use thiserror::Error;

use crate::combat::cover::CoverTier;
use crate::core::types::{AbilityId, GadgetId, Side};
use crate::tactics::position::Position;

/// A rejected combat action. Every variant is recoverable: the state is left
/// untouched and the actor keeps its action points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CombatError {
    #[error("Unknown ability: {0}")]
    UnknownAbility(AbilityId),

    #[error("Ability {ability} on cooldown for {remaining} more turn(s)")]
    AbilityOnCooldown { ability: AbilityId, remaining: u32 },

    #[error("Unknown gadget: {0}")]
    UnknownGadget(GadgetId),

    #[error("Gadget {gadget} on cooldown for {remaining} more turn(s)")]
    GadgetOnCooldown { gadget: GadgetId, remaining: u32 },

    #[error("Gadget {gadget} cannot be deployed at {position:?}")]
    PositionNotAllowed { gadget: GadgetId, position: Position },

    #[error("Not enough action points: need {required}, have {available}")]
    InsufficientActionPoints { required: u32, available: u32 },

    #[error("Invalid target: {0}")]
    InvalidTarget(Side),

    #[error("{0} is disabled and cannot use tech")]
    ActorDisabled(Side),

    #[error("{0:?} cover is not available on this terrain")]
    CoverUnavailable(CoverTier),

    #[error("Cannot move from {from:?} to {to:?}")]
    UnreachablePosition { from: Position, to: Position },
}

/// Failure while loading registries or configuration from disk
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },
}

pub type Result<T> = std::result::Result<T, CombatError>;
