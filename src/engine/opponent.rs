//! Heuristic opponent
//!
//! Archetypes weight a three-way choice between attacking, repositioning
//! and taking cover, with a chance to open with a ready special ability.

use super::action::CombatAction;
use super::decision::DecisionContext;
use crate::combat::cover::CoverTier;
use crate::core::rng::CombatRng;
use crate::core::types::EnemyArchetype;
use crate::tactics::scoring::{archetype_preferences, optimal_position, ScoringContext};

/// Relative weights for (attack, move, cover)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionWeights {
    pub attack: i32,
    pub reposition: i32,
    pub cover: i32,
    /// Percent chance to use a ready ability instead
    pub special: i32,
}

impl ActionWeights {
    pub fn for_archetype(archetype: EnemyArchetype) -> Self {
        let (attack, reposition, cover, special) = match archetype {
            EnemyArchetype::Standard => (50, 25, 25, 15),
            EnemyArchetype::Berserker => (70, 25, 5, 25),
            EnemyArchetype::Tactician => (40, 35, 25, 20),
            EnemyArchetype::Tank => (50, 10, 40, 15),
            EnemyArchetype::Rogue => (45, 45, 10, 20),
        };
        Self {
            attack,
            reposition,
            cover,
            special,
        }
    }

    fn total(&self) -> i32 {
        self.attack + self.reposition + self.cover
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OpponentAi;

impl OpponentAi {
    pub fn choose(&self, ctx: &DecisionContext<'_>, rng: &mut dyn CombatRng) -> CombatAction {
        let me = ctx.state.combatant(ctx.side);
        let weights = ActionWeights::for_archetype(me.archetype);

        if !me.statuses.is_disabled() {
            let ready: Vec<_> = me
                .ready_abilities()
                .filter(|id| ctx.registry.ability(id).is_some())
                .collect();
            if !ready.is_empty() && rng.percent(weights.special) {
                return CombatAction::UseAbility(ready[rng.index(ready.len())].clone());
            }
        }

        let roll = rng.range_inclusive(1, weights.total().max(1));
        if roll <= weights.attack {
            return CombatAction::Attack;
        }
        if roll <= weights.attack + weights.reposition {
            let foe = ctx.state.combatant(ctx.side.opposing());
            let target = optimal_position(&ScoringContext {
                current: me.position,
                enemy_position: foe.position,
                action_points: ctx.action_points,
                terrain: &ctx.state.terrain,
                class: me.class,
                preferences: archetype_preferences(me.archetype),
            });
            if target != me.position {
                return CombatAction::Move(target);
            }
            return CombatAction::Attack;
        }

        if me.cover.is_up() {
            return CombatAction::Attack;
        }
        let terrain = ctx.state.terrain.at(me.position);
        let tier = [CoverTier::Full, CoverTier::Heavy, CoverTier::Medium]
            .into_iter()
            .find(|tier| tier.available_on(terrain))
            .unwrap_or(CoverTier::Light);
        CombatAction::TakeCover(tier)
    }
}
