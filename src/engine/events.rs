//! Combat events pushed to the presentation layer
//!
//! The engine only appends; what to show and how is up to the sink.

use serde::{Deserialize, Serialize};

use super::phase::CombatOutcome;
use crate::combat::cover::CoverTier;
use crate::combat::status::StatusKind;
use crate::core::types::{AbilityId, GadgetId, Side, Turn};
use crate::tactics::position::Position;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatEvent {
    pub turn: Turn,
    pub event_type: CombatEventType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEventType {
    EncounterStarted,
    PhaseStarted { side: Side },
    TerrainDamage { side: Side, amount: i32 },
    StatusDamage { side: Side, status: StatusKind, amount: i32 },
    StatusExpired { side: Side, status: StatusKind },
    DroneStrike { owner: Side, damage: i32 },
    TurnSkipped { side: Side },
    Moved { side: Side, from: Position, to: Position, cost: u32 },
    Attacked { side: Side, landed: bool, critical: bool, damage: i32 },
    BleedingInflicted { side: Side },
    AbilityUsed { side: Side, ability: AbilityId },
    GadgetDeployed { side: Side, gadget: GadgetId },
    GadgetFired { owner: Side, gadget: GadgetId, recipient: Side },
    GadgetExpired { owner: Side, gadget: GadgetId },
    CoverTaken { side: Side, tier: CoverTier },
    CoverSearchFailed { side: Side, tier: CoverTier },
    CoverDestroyed { side: Side },
    TargetZoneChanged,
    EscapeAttempted { chance: i32, success: bool },
    ActionRejected { side: Side, reason: String },
    TurnEnded,
    EncounterEnded { outcome: CombatOutcome },
}

/// Append-only consumer of combat events
pub trait EventSink {
    fn record(&mut self, event: CombatEvent);
}

/// Collects every event in order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatLog {
    pub events: Vec<CombatEvent>,
}

impl CombatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event_type: CombatEventType, description: String, turn: Turn) {
        self.events.push(CombatEvent {
            turn,
            event_type,
            description,
        });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events whose type satisfies `pred`
    pub fn filter<'a>(
        &'a self,
        pred: impl Fn(&CombatEventType) -> bool + 'a,
    ) -> impl Iterator<Item = &'a CombatEvent> + 'a {
        self.events.iter().filter(move |e| pred(&e.event_type))
    }
}

impl EventSink for CombatLog {
    fn record(&mut self, event: CombatEvent) {
        self.events.push(event);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _event: CombatEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_push_and_filter() {
        let mut log = CombatLog::new();
        log.push(CombatEventType::EncounterStarted, "start".into(), 1);
        log.push(
            CombatEventType::TurnSkipped { side: Side::Opponent },
            "stunned".into(),
            1,
        );
        assert_eq!(log.len(), 2);
        let skipped: Vec<_> = log
            .filter(|t| matches!(t, CombatEventType::TurnSkipped { .. }))
            .collect();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].description, "stunned");
    }
}
