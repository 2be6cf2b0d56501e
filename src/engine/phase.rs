//! Turn phases and encounter outcomes

use serde::{Deserialize, Serialize};

/// How an encounter ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatOutcome {
    Victory,
    Defeat,
    Escaped,
    /// Turn ceiling reached with both sides standing
    TurnLimit,
}

/// Where the controller is within a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TurnPhase {
    #[default]
    PlayerTurn,
    ActionLoop,
    EnemyTurn,
    Resolution,
    Victory,
    Defeat,
    Escaped,
    TurnLimit,
}

impl TurnPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TurnPhase::Victory | TurnPhase::Defeat | TurnPhase::Escaped | TurnPhase::TurnLimit
        )
    }

    pub fn outcome(&self) -> Option<CombatOutcome> {
        match self {
            TurnPhase::Victory => Some(CombatOutcome::Victory),
            TurnPhase::Defeat => Some(CombatOutcome::Defeat),
            TurnPhase::Escaped => Some(CombatOutcome::Escaped),
            TurnPhase::TurnLimit => Some(CombatOutcome::TurnLimit),
            _ => None,
        }
    }
}

impl From<CombatOutcome> for TurnPhase {
    fn from(outcome: CombatOutcome) -> Self {
        match outcome {
            CombatOutcome::Victory => TurnPhase::Victory,
            CombatOutcome::Defeat => TurnPhase::Defeat,
            CombatOutcome::Escaped => TurnPhase::Escaped,
            CombatOutcome::TurnLimit => TurnPhase::TurnLimit,
        }
    }
}
