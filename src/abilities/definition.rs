//! Ability definitions as loaded from `abilities.toml`
//!
//! An ability is a cooldown plus a list of tagged effects. Effects always
//! resolve in [`AbilityEffect::order`] regardless of how they are listed.

use serde::{Deserialize, Serialize};

use crate::combat::cover::CoverTier;
use crate::combat::status::StatusKind;
use crate::core::types::{AbilityId, CharacterClass, DamageType};

/// Forced repositioning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionShift {
    /// Target lands somewhere random
    Scramble,
    /// Target dragged back to center
    ForceCenter,
    /// Actor presses in to the aggressive position
    CloseDistance,
    /// Actor takes its best available position, ignoring cost
    ImprovePosition,
}

/// Cover manipulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoverAction {
    /// Wear down the target's cover
    Damage { amount: i32 },
    /// Raise cover for the actor
    Create {
        tier: CoverTier,
        #[serde(default)]
        health: Option<i32>,
    },
    /// Flat defense on the actor's standing cover
    Boost { amount: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AbilityEffect {
    Damage {
        multiplier: f32,
        #[serde(default)]
        ignore_defense: bool,
        #[serde(default)]
        damage_type: DamageType,
    },
    MultiHit {
        hits: u32,
        damage_per_hit: i32,
    },
    Heal {
        amount: i32,
        /// Also strip negative statuses
        #[serde(default)]
        cleanse: bool,
    },
    Status {
        status: StatusKind,
        #[serde(default)]
        duration: Option<u32>,
        #[serde(default)]
        magnitude: i32,
        #[serde(default)]
        on_self: bool,
    },
    DefenseBoost {
        amount: i32,
        duration: u32,
    },
    RevealWeakness,
    Drone {
        damage_per_turn: i32,
        duration: u32,
    },
    SelfDamage {
        amount: i32,
    },
    EscapeBoost {
        amount: i32,
    },
    Position {
        shift: PositionShift,
    },
    Cover {
        action: CoverAction,
    },
    /// Effect kinds this build does not know; resolves as a no-op
    #[serde(other)]
    Unrecognized,
}

impl AbilityEffect {
    /// Resolution rank; lower resolves first
    pub fn order(&self) -> u8 {
        match self {
            AbilityEffect::Damage { .. } => 0,
            AbilityEffect::MultiHit { .. } => 1,
            AbilityEffect::Heal { .. } => 2,
            AbilityEffect::Status { .. } => 3,
            AbilityEffect::DefenseBoost { .. } => 4,
            AbilityEffect::RevealWeakness => 5,
            AbilityEffect::Drone { .. } => 6,
            AbilityEffect::SelfDamage { .. } => 7,
            AbilityEffect::EscapeBoost { .. } => 8,
            AbilityEffect::Position { .. } => 9,
            AbilityEffect::Cover { .. } => 10,
            AbilityEffect::Unrecognized => 11,
        }
    }

    /// Does this effect act on the opposing combatant?
    pub fn needs_target(&self) -> bool {
        match self {
            AbilityEffect::Damage { .. }
            | AbilityEffect::MultiHit { .. }
            | AbilityEffect::RevealWeakness => true,
            AbilityEffect::Status { on_self, .. } => !on_self,
            AbilityEffect::Position { shift } => {
                matches!(shift, PositionShift::Scramble | PositionShift::ForceCenter)
            }
            AbilityEffect::Cover { action } => matches!(action, CoverAction::Damage { .. }),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityDef {
    pub id: AbilityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cooldown: u32,
    /// Classes that learn this ability; empty for enemy-only abilities
    #[serde(default)]
    pub classes: Vec<CharacterClass>,
    pub effects: Vec<AbilityEffect>,
}

impl AbilityDef {
    /// Effects in resolution order
    pub fn ordered_effects(&self) -> Vec<AbilityEffect> {
        let mut effects = self.effects.clone();
        effects.sort_by_key(|e| e.order());
        effects
    }

    pub fn is_offensive(&self) -> bool {
        self.effects.iter().any(|e| e.needs_target())
    }
}
