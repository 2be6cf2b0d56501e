//! Sources of player decisions
//!
//! The controller asks a [`DecisionSource`] for one action at a time. That
//! call is the only place an encounter waits on the outside world.

use std::collections::VecDeque;

use super::action::CombatAction;
use crate::combat::cover::CoverTier;
use crate::combat::state::CombatState;
use crate::core::error::CombatError;
use crate::core::types::Side;
use crate::registry::Registry;
use crate::tactics::modifiers::{move_options, MoveOption};
use crate::tactics::scoring::{class_preferences, optimal_position, ScoringContext};

/// Read-only view handed to a decision source
pub struct DecisionContext<'a> {
    pub state: &'a CombatState,
    pub registry: &'a Registry,
    pub side: Side,
    pub action_points: u32,
}

impl<'a> DecisionContext<'a> {
    /// Legal moves from where the deciding side stands
    pub fn move_options(&self) -> Vec<MoveOption> {
        let me = self.state.combatant(self.side);
        move_options(
            me.position,
            self.action_points,
            self.state.terrain.at(me.position),
        )
    }
}

pub trait DecisionSource {
    fn next_action(&mut self, ctx: &DecisionContext<'_>) -> CombatAction;

    /// Told when an action was refused; the default ignores it
    fn rejected(&mut self, _action: &CombatAction, _error: &CombatError) {}
}

/// Replays a fixed list of actions, then ends every turn
#[derive(Debug, Clone, Default)]
pub struct ScriptedDecisions {
    queue: VecDeque<CombatAction>,
    rejections: Vec<CombatError>,
}

impl ScriptedDecisions {
    pub fn new(actions: impl IntoIterator<Item = CombatAction>) -> Self {
        Self {
            queue: actions.into_iter().collect(),
            rejections: Vec::new(),
        }
    }

    pub fn push(&mut self, action: CombatAction) {
        self.queue.push_back(action);
    }

    /// Actions not yet handed out
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn rejections(&self) -> &[CombatError] {
        &self.rejections
    }
}

impl DecisionSource for ScriptedDecisions {
    fn next_action(&mut self, _ctx: &DecisionContext<'_>) -> CombatAction {
        self.queue.pop_front().unwrap_or(CombatAction::EndTurn)
    }

    fn rejected(&mut self, _action: &CombatAction, error: &CombatError) {
        self.rejections.push(error.clone());
    }
}

/// Simple automated player for headless runs
///
/// Heals when hurt, spends ready abilities, drifts toward its best
/// position, and otherwise shoots.
#[derive(Debug, Clone, Default)]
pub struct AutoPilot {
    tried_this_phase: Vec<CombatAction>,
    last_turn: u32,
    last_ap: u32,
}

impl AutoPilot {
    pub fn new() -> Self {
        Self::default()
    }

    fn pick(&self, ctx: &DecisionContext<'_>) -> CombatAction {
        let me = ctx.state.combatant(ctx.side);
        let foe = ctx.state.combatant(ctx.side.opposing());
        let hurt = me.health() * 100 < me.max_health() * 40;

        let ready: Vec<_> = if me.statuses.is_disabled() {
            Vec::new()
        } else {
            me.ready_abilities()
                .filter_map(|id| ctx.registry.ability(id))
                .collect()
        };

        if hurt {
            let heal = ready.iter().find(|def| {
                def.effects
                    .iter()
                    .any(|e| matches!(e, crate::abilities::AbilityEffect::Heal { .. }))
            });
            if let Some(def) = heal {
                return CombatAction::UseAbility(def.id.clone());
            }
            if !me.cover.is_up() {
                return CombatAction::TakeCover(CoverTier::Light);
            }
        }

        if let Some(def) = ready.iter().find(|def| def.is_offensive()) {
            return CombatAction::UseAbility(def.id.clone());
        }

        let preferences = me.class.map(class_preferences).unwrap_or(&[]);
        let best = optimal_position(&ScoringContext {
            current: me.position,
            enemy_position: foe.position,
            action_points: ctx.action_points.saturating_sub(1),
            terrain: &ctx.state.terrain,
            class: me.class,
            preferences,
        });
        if best != me.position {
            return CombatAction::Move(best);
        }

        CombatAction::Attack
    }
}

impl DecisionSource for AutoPilot {
    fn next_action(&mut self, ctx: &DecisionContext<'_>) -> CombatAction {
        if ctx.state.turn != self.last_turn || ctx.action_points > self.last_ap {
            self.tried_this_phase.clear();
        }
        self.last_turn = ctx.state.turn;
        self.last_ap = ctx.action_points;

        let choice = self.pick(ctx);
        if self.tried_this_phase.contains(&choice) && choice != CombatAction::Attack {
            return CombatAction::Attack;
        }
        choice
    }

    fn rejected(&mut self, action: &CombatAction, _error: &CombatError) {
        self.tried_this_phase.push(action.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::combatant::Combatant;
    use crate::core::types::{AbilityId, CharacterClass};
    use crate::tactics::position::Position;
    use crate::tactics::terrain::Environment;

    fn state() -> CombatState {
        CombatState::new(
            Combatant::new("V", Side::Player, 20).with_class(CharacterClass::Solo),
            Combatant::new("Ganger", Side::Opponent, 20),
            Environment::Standard,
        )
    }

    #[test]
    fn test_scripted_runs_out_to_end_turn() {
        let state = state();
        let registry = Registry::builtin().unwrap();
        let ctx = DecisionContext {
            state: &state,
            registry: &registry,
            side: Side::Player,
            action_points: 2,
        };
        let mut script = ScriptedDecisions::new([CombatAction::Attack]);
        assert_eq!(script.next_action(&ctx), CombatAction::Attack);
        assert_eq!(script.next_action(&ctx), CombatAction::EndTurn);
        assert_eq!(script.remaining(), 0);
    }

    #[test]
    fn test_context_move_options() {
        let mut state = state();
        state.player.position = Position::FlankLeft;
        let registry = Registry::builtin().unwrap();
        let ctx = DecisionContext {
            state: &state,
            registry: &registry,
            side: Side::Player,
            action_points: 1,
        };
        let options = ctx.move_options();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].to, Position::Center);
    }

    #[test]
    fn test_autopilot_uses_offensive_ability() {
        let mut state = state();
        state.player.abilities = vec![AbilityId::new("precision_shot")];
        let registry = Registry::builtin().unwrap();
        let ctx = DecisionContext {
            state: &state,
            registry: &registry,
            side: Side::Player,
            action_points: 2,
        };
        let mut pilot = AutoPilot::new();
        assert_eq!(
            pilot.next_action(&ctx),
            CombatAction::UseAbility(AbilityId::new("precision_shot"))
        );
    }

    #[test]
    fn test_autopilot_falls_back_after_rejection() {
        let mut state = state();
        state.player.abilities = vec![AbilityId::new("precision_shot")];
        let registry = Registry::builtin().unwrap();
        let ctx = DecisionContext {
            state: &state,
            registry: &registry,
            side: Side::Player,
            action_points: 2,
        };
        let mut pilot = AutoPilot::new();
        let first = pilot.next_action(&ctx);
        pilot.rejected(&first, &CombatError::ActorDisabled(Side::Player));
        assert_eq!(pilot.next_action(&ctx), CombatAction::Attack);
    }
}
