//! Abstract battlefield positions and the lookups built on them
//!
//! There is no grid. Each combatant stands in one of five named positions,
//! and every spatial rule (movement cost, advantage, flanking) is a table
//! over those positions.

use serde::{Deserialize, Serialize};

/// Where a combatant stands relative to the fight
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    #[default]
    Center,
    FlankLeft,
    FlankRight,
    Aggressive,
    Defensive,
}

/// Flat bonuses a position grants, in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionAdvantage {
    pub attack_bonus: i32,
    /// Positive values weaken defense, negative values strengthen it
    pub defense_penalty: i32,
    pub crit_bonus: i32,
}

impl Position {
    /// All positions in the stable order used for tie-breaks
    pub fn all() -> [Position; 5] {
        [
            Position::Center,
            Position::FlankLeft,
            Position::FlankRight,
            Position::Aggressive,
            Position::Defensive,
        ]
    }

    pub fn is_flank(&self) -> bool {
        matches!(self, Position::FlankLeft | Position::FlankRight)
    }

    /// Base action point cost to move to `to`, before terrain
    ///
    /// Crossing between the flanks means going around the fight, and swapping
    /// between aggressive and defensive means giving up or taking ground.
    pub fn move_cost(&self, to: Position) -> u32 {
        use Position::*;
        match (*self, to) {
            (a, b) if a == b => 0,
            (_, Center) => 1,
            (Center, Defensive) => 1,
            (Center, FlankLeft) | (Center, FlankRight) => 1,
            (Center, Aggressive) => 2,
            (FlankLeft, FlankRight) | (FlankRight, FlankLeft) => 3,
            (Aggressive, Defensive) | (Defensive, Aggressive) => 3,
            _ => 2,
        }
    }

    pub fn advantage(&self) -> PositionAdvantage {
        match self {
            Position::FlankLeft | Position::FlankRight => PositionAdvantage {
                attack_bonus: 15,
                defense_penalty: 0,
                crit_bonus: 5,
            },
            Position::Aggressive => PositionAdvantage {
                attack_bonus: 20,
                defense_penalty: 10,
                crit_bonus: 10,
            },
            Position::Defensive => PositionAdvantage {
                attack_bonus: -5,
                defense_penalty: -15,
                crit_bonus: 0,
            },
            Position::Center => PositionAdvantage::default(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Position::Center => "center",
            Position::FlankLeft => "left flank",
            Position::FlankRight => "right flank",
            Position::Aggressive => "aggressive",
            Position::Defensive => "defensive",
        }
    }
}

/// Attack bonus (percent) the attacker gains from the angle it strikes from
pub fn flanking_bonus(attacker: Position, defender: Position) -> i32 {
    use Position::*;
    match (attacker, defender) {
        (a, d) if a == d => 0,
        (Aggressive, Defensive) => 25,
        (FlankLeft, FlankRight) | (FlankRight, FlankLeft) => 20,
        (FlankLeft, Center) | (FlankRight, Center) | (Aggressive, Center) => 10,
        _ => 5,
    }
}
