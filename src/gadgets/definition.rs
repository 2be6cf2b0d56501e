//! Gadget definitions as loaded from `gadgets.toml`

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::combat::status::StatusKind;
use crate::core::types::{CharacterClass, GadgetId};
use crate::tactics::position::Position;

/// When a deployed gadget fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GadgetTrigger {
    /// Once, the moment it is deployed
    OnDeploy,
    /// Start of the owner's phase
    TurnStart,
    /// End of the owner's phase
    TurnEnd,
    /// An enemy steps onto the gadget's position
    OnPositionChange,
    /// Any trigger check, still at most once per turn
    Continuous,
}

/// Numeric or structured strength of a status payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EffectValue {
    Flat(i32),
    Marked { hit_bonus: i32, crit_bonus: i32 },
}

impl EffectValue {
    /// Combine a base value with a class bonus field by field
    pub fn merged(base: Option<EffectValue>, bonus: Option<EffectValue>) -> Option<EffectValue> {
        match (base, bonus) {
            (base, None) => base,
            (None, bonus) => bonus,
            (Some(EffectValue::Flat(a)), Some(EffectValue::Flat(b))) => Some(EffectValue::Flat(a + b)),
            (
                Some(EffectValue::Marked {
                    hit_bonus,
                    crit_bonus,
                }),
                Some(EffectValue::Marked {
                    hit_bonus: extra_hit,
                    crit_bonus: extra_crit,
                }),
            ) => Some(EffectValue::Marked {
                hit_bonus: hit_bonus + extra_hit,
                crit_bonus: crit_bonus + extra_crit,
            }),
            (base, Some(bonus)) => {
                warn!(?base, ?bonus, "mismatched effect value bonus ignored");
                base
            }
        }
    }

    /// (primary, secondary) magnitudes for a status effect
    pub fn magnitudes(&self) -> (i32, i32) {
        match *self {
            EffectValue::Flat(value) => (value, 0),
            EffectValue::Marked {
                hit_bonus,
                crit_bonus,
            } => (hit_bonus, crit_bonus),
        }
    }
}

/// What a gadget does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GadgetEffect {
    /// Damage to the owner's opponent, through defense and cover
    Damage { amount: i32 },
    /// Healing to the owner
    Healing { amount: i32 },
    /// Harmful statuses land on the opponent, protective ones on the owner
    Status {
        status: StatusKind,
        #[serde(default)]
        value: Option<EffectValue>,
    },
}

/// Per-class bonus, merged into a gadget at deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassBonus {
    pub class: CharacterClass,
    #[serde(default)]
    pub damage: i32,
    #[serde(default)]
    pub healing: i32,
    #[serde(default)]
    pub duration: i32,
    #[serde(default)]
    pub effect_value: Option<EffectValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GadgetDef {
    pub id: GadgetId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub trigger: GadgetTrigger,
    /// Times the gadget can fire before it is used up
    pub duration: u32,
    /// Turns before the same owner may deploy it again
    pub cooldown: u32,
    /// Positions it may be deployed at; empty means anywhere
    #[serde(default)]
    pub positions: Vec<Position>,
    pub effect: GadgetEffect,
    #[serde(default)]
    pub class_bonus: Vec<ClassBonus>,
}

impl GadgetDef {
    pub fn allows(&self, position: Position) -> bool {
        self.positions.is_empty() || self.positions.contains(&position)
    }

    pub fn bonus_for(&self, class: Option<CharacterClass>) -> Option<&ClassBonus> {
        let class = class?;
        self.class_bonus.iter().find(|b| b.class == class)
    }

    /// Effect and duration after the deployer's class bonus
    pub fn effective(&self, class: Option<CharacterClass>) -> (GadgetEffect, u32) {
        let Some(bonus) = self.bonus_for(class) else {
            return (self.effect, self.duration);
        };

        let effect = match self.effect {
            GadgetEffect::Damage { amount } => GadgetEffect::Damage {
                amount: amount + bonus.damage,
            },
            GadgetEffect::Healing { amount } => GadgetEffect::Healing {
                amount: amount + bonus.healing,
            },
            GadgetEffect::Status { status, value } => GadgetEffect::Status {
                status,
                value: EffectValue::merged(value, bonus.effect_value),
            },
        };
        let duration = (self.duration as i32 + bonus.duration).max(1) as u32;
        (effect, duration)
    }
}
