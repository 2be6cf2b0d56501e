//! Deployed gadget instances

use serde::{Deserialize, Serialize};

use super::definition::{GadgetDef, GadgetEffect, GadgetTrigger};
use crate::core::types::{CharacterClass, GadgetId, Side};
use crate::tactics::position::Position;

/// Trigger moments the controller reports to the gadget system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerEvent {
    TurnStart,
    TurnEnd,
    PositionChange,
}

impl TriggerEvent {
    fn matches(&self, trigger: GadgetTrigger) -> bool {
        matches!(
            (self, trigger),
            (_, GadgetTrigger::Continuous)
                | (TriggerEvent::TurnStart, GadgetTrigger::TurnStart)
                | (TriggerEvent::TurnEnd, GadgetTrigger::TurnEnd)
                | (TriggerEvent::PositionChange, GadgetTrigger::OnPositionChange)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GadgetInstance {
    pub gadget: GadgetId,
    pub name: String,
    pub owner: Side,
    pub position: Position,
    pub trigger: GadgetTrigger,
    /// Payload after the owner's class bonus
    pub effect: GadgetEffect,
    /// Duration of statuses this gadget applies
    pub effect_duration: u32,
    /// Firings left
    pub remaining: u32,
    pub active: bool,
    pub triggered_this_turn: bool,
}

impl GadgetInstance {
    pub fn deploy(
        def: &GadgetDef,
        owner: Side,
        class: Option<CharacterClass>,
        position: Position,
    ) -> Self {
        let (effect, duration) = def.effective(class);
        Self {
            gadget: def.id.clone(),
            name: def.name.clone(),
            owner,
            position,
            trigger: def.trigger,
            effect,
            effect_duration: duration,
            remaining: duration,
            active: true,
            triggered_this_turn: false,
        }
    }

    /// Would this gadget fire for `event`, given where its target now stands?
    pub fn can_trigger(&self, event: TriggerEvent, target_position: Position) -> bool {
        if !self.active || self.triggered_this_turn {
            return false;
        }
        if !event.matches(self.trigger) {
            return false;
        }
        if event == TriggerEvent::PositionChange && target_position != self.position {
            return false;
        }
        true
    }

    /// Record a firing. Returns true if the gadget is now spent.
    pub fn consume(&mut self) -> bool {
        self.triggered_this_turn = true;
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.active = false;
        }
        !self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mine() -> GadgetInstance {
        GadgetInstance {
            gadget: GadgetId::new("proximity_mine"),
            name: "Proximity Mine".into(),
            owner: Side::Player,
            position: Position::FlankLeft,
            trigger: GadgetTrigger::OnPositionChange,
            effect: GadgetEffect::Damage { amount: 12 },
            effect_duration: 3,
            remaining: 3,
            active: true,
            triggered_this_turn: false,
        }
    }

    #[test]
    fn test_position_change_needs_matching_position() {
        let mine = mine();
        assert!(mine.can_trigger(TriggerEvent::PositionChange, Position::FlankLeft));
        assert!(!mine.can_trigger(TriggerEvent::PositionChange, Position::Center));
        assert!(!mine.can_trigger(TriggerEvent::TurnStart, Position::FlankLeft));
    }

    #[test]
    fn test_fires_once_per_turn() {
        let mut mine = mine();
        assert!(!mine.consume());
        assert!(!mine.can_trigger(TriggerEvent::PositionChange, Position::FlankLeft));
        mine.triggered_this_turn = false;
        assert!(mine.can_trigger(TriggerEvent::PositionChange, Position::FlankLeft));
    }

    #[test]
    fn test_continuous_matches_everything() {
        let mut smoke = mine();
        smoke.trigger = GadgetTrigger::Continuous;
        assert!(smoke.can_trigger(TriggerEvent::TurnStart, Position::Center));
        assert!(smoke.can_trigger(TriggerEvent::TurnEnd, Position::Center));
        // Position changes still need the target on the gadget's position
        assert!(!smoke.can_trigger(TriggerEvent::PositionChange, Position::Center));
    }

    #[test]
    fn test_consume_spends_last_charge() {
        let mut mine = mine();
        mine.remaining = 1;
        assert!(mine.consume());
        assert!(!mine.active);
        assert!(!mine.can_trigger(TriggerEvent::PositionChange, Position::FlankLeft));
    }

    #[test]
    fn test_on_deploy_never_matches_later_events() {
        let mut emp = mine();
        emp.trigger = GadgetTrigger::OnDeploy;
        assert!(!emp.can_trigger(TriggerEvent::TurnStart, Position::Center));
        assert!(!emp.can_trigger(TriggerEvent::TurnEnd, Position::Center));
    }
}
