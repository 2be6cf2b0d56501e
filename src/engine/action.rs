//! Actions a combatant can take during its action loop

use serde::{Deserialize, Serialize};

use crate::abilities::resolver::AbilityOutcome;
use crate::combat::cover::CoverTier;
use crate::combat::damage::StrikeReport;
use crate::combat::target_zone::TargetZone;
use crate::core::types::{AbilityId, GadgetId};
use crate::gadgets::system::{Deployment, GadgetFiring};
use crate::tactics::position::Position;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatAction {
    Move(Position),
    Attack,
    UseAbility(AbilityId),
    DeployGadget(GadgetId),
    TakeCover(CoverTier),
    /// Free; the player's aim persists until changed
    SetTargetZone(TargetZone),
    /// Ends the phase whether or not it succeeds
    Escape,
    EndTurn,
}

impl CombatAction {
    /// Flat action point cost; moves are priced by the movement table
    pub fn flat_cost(&self) -> u32 {
        match self {
            CombatAction::Attack
            | CombatAction::UseAbility(_)
            | CombatAction::DeployGadget(_)
            | CombatAction::TakeCover(_)
            | CombatAction::Escape => 1,
            CombatAction::Move(_) | CombatAction::SetTargetZone(_) | CombatAction::EndTurn => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EscapeReport {
    pub chance: i32,
    pub success: bool,
    pub health_lost: i32,
    pub item_lost: Option<String>,
}

/// What an accepted action did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionReport {
    Moved {
        from: Position,
        to: Position,
        cost: u32,
        firings: Vec<GadgetFiring>,
    },
    Attacked {
        strike: StrikeReport,
        bleeding: bool,
    },
    Ability {
        outcome: AbilityOutcome,
        firings: Vec<GadgetFiring>,
    },
    Gadget(Deployment),
    Cover {
        tier: CoverTier,
        found: bool,
    },
    TargetZone(TargetZone),
    Escape(EscapeReport),
    EndedTurn,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_costs() {
        assert_eq!(CombatAction::Attack.flat_cost(), 1);
        assert_eq!(CombatAction::SetTargetZone(TargetZone::Head).flat_cost(), 0);
        assert_eq!(CombatAction::EndTurn.flat_cost(), 0);
        assert_eq!(CombatAction::TakeCover(CoverTier::Light).flat_cost(), 1);
    }
}
