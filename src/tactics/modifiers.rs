//! Combined position and terrain modifiers
//!
//! These are the pure queries the controller and the damage calculator call
//! for legality, costs and bonuses. Nothing here touches combat state.

use serde::{Deserialize, Serialize};

use super::position::Position;
use super::terrain::{Terrain, TerrainSpecial};
use crate::core::types::CharacterClass;

/// Defense percent granted per terrain cover point
pub const COVER_POINT_DEFENSE: i32 = 5;
/// Attack bonus a NetRunner draws from tech-rich terrain
pub const NETRUNNER_TERRAIN_ATTACK: i32 = 10;
/// Crit bonus a Fixer draws from shadows
pub const FIXER_STEALTH_CRIT: i32 = 15;

/// Everything a position and its terrain contribute to a fight
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModifierBundle {
    /// Percent added to outgoing damage
    pub attack_bonus: i32,
    /// Percent added to defense
    pub defense_bonus: i32,
    /// Percent added to critical chance
    pub crit_bonus: i32,
    pub specials: Vec<TerrainSpecial>,
}

impl ModifierBundle {
    pub fn has(&self, special: TerrainSpecial) -> bool {
        self.specials.contains(&special)
    }
}

/// A legal move and its action point cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOption {
    pub to: Position,
    pub cost: u32,
}

/// Cost to leave `from` for `to`, including the penalty of the terrain being left
pub fn movement_cost(from: Position, to: Position, terrain_at_current: Terrain) -> u32 {
    from.move_cost(to) + terrain_at_current.move_penalty()
}

/// Positions reachable within `action_points`, in stable position order
pub fn move_options(
    from: Position,
    action_points: u32,
    terrain_at_current: Terrain,
) -> Vec<MoveOption> {
    Position::all()
        .into_iter()
        .filter(|&to| to != from)
        .map(|to| MoveOption {
            to,
            cost: movement_cost(from, to, terrain_at_current),
        })
        .filter(|option| option.cost <= action_points)
        .collect()
}

/// Bonuses for standing at `position` on `terrain`, with class terrain synergies
pub fn position_modifiers(
    position: Position,
    class: Option<CharacterClass>,
    terrain: Terrain,
) -> ModifierBundle {
    let advantage = position.advantage();
    let mut bundle = ModifierBundle {
        attack_bonus: advantage.attack_bonus,
        defense_bonus: -advantage.defense_penalty + terrain.cover_bonus() * COVER_POINT_DEFENSE,
        crit_bonus: advantage.crit_bonus,
        specials: Vec::new(),
    };

    if let Some(special) = terrain.special() {
        bundle.specials.push(special);
        match (special, class) {
            (TerrainSpecial::NetrunnerBonus, Some(CharacterClass::NetRunner)) => {
                bundle.attack_bonus += NETRUNNER_TERRAIN_ATTACK;
            }
            (TerrainSpecial::StealthBonus, Some(CharacterClass::Fixer)) => {
                bundle.crit_bonus += FIXER_STEALTH_CRIT;
            }
            _ => {}
        }
    }

    bundle
}
