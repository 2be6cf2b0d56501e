//! The single mutable context of an encounter
//!
//! Everything the controller, the ability resolver and the gadget system
//! change lives in [`CombatState`]. Nothing else holds combat data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::combatant::Combatant;
use super::target_zone::TargetZone;
use crate::core::types::{GadgetId, Side, Turn};
use crate::gadgets::instance::GadgetInstance;
use crate::tactics::position::Position;
use crate::tactics::terrain::{Environment, TerrainMap};

/// A deployed drone dealing damage at the start of its owner's phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drone {
    pub owner: Side,
    pub damage: i32,
    pub remaining: u32,
}

/// Redeploy cooldowns, per owner and gadget
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GadgetCooldowns {
    by_side: BTreeMap<Side, BTreeMap<GadgetId, u32>>,
}

impl GadgetCooldowns {
    pub fn get(&self, owner: Side, gadget: &GadgetId) -> u32 {
        self.by_side
            .get(&owner)
            .and_then(|m| m.get(gadget))
            .copied()
            .unwrap_or(0)
    }

    pub fn set(&mut self, owner: Side, gadget: GadgetId, turns: u32) {
        let entries = self.by_side.entry(owner).or_default();
        if turns == 0 {
            entries.remove(&gadget);
        } else {
            entries.insert(gadget, turns);
        }
    }

    /// Count down by one turn, dropping entries that reach zero
    pub fn tick(&mut self) {
        for entries in self.by_side.values_mut() {
            for remaining in entries.values_mut() {
                *remaining = remaining.saturating_sub(1);
            }
            entries.retain(|_, remaining| *remaining > 0);
        }
        self.by_side.retain(|_, entries| !entries.is_empty());
    }

    pub fn is_empty(&self) -> bool {
        self.by_side.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatState {
    pub turn: Turn,
    pub environment: Environment,
    pub terrain: TerrainMap,
    pub player: Combatant,
    pub opponent: Combatant,
    /// Active gadget instances in deployment order
    pub gadgets: Vec<GadgetInstance>,
    pub gadget_cooldowns: GadgetCooldowns,
    /// Where the player is aiming
    pub target_zone: TargetZone,
    pub drones: Vec<Drone>,
}

impl CombatState {
    /// Fresh encounter: turn 1, both sides at center
    pub fn new(mut player: Combatant, mut opponent: Combatant, environment: Environment) -> Self {
        player.side = Side::Player;
        opponent.side = Side::Opponent;
        player.position = Position::Center;
        opponent.position = Position::Center;
        Self {
            turn: 1,
            environment,
            terrain: environment.terrain_map(),
            player,
            opponent,
            gadgets: Vec::new(),
            gadget_cooldowns: GadgetCooldowns::default(),
            target_zone: TargetZone::default(),
            drones: Vec::new(),
        }
    }

    /// Replace the environment's terrain map (custom layouts, tests)
    pub fn with_terrain(mut self, terrain: TerrainMap) -> Self {
        self.terrain = terrain;
        self
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    pub fn combatant_mut(&mut self, side: Side) -> &mut Combatant {
        match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.opponent,
        }
    }

    /// Mutable access to (actor, other side) at once
    pub fn pair_mut(&mut self, actor: Side) -> (&mut Combatant, &mut Combatant) {
        match actor {
            Side::Player => (&mut self.player, &mut self.opponent),
            Side::Opponent => (&mut self.opponent, &mut self.player),
        }
    }

    /// Side that has been reduced to zero health, player checked first
    pub fn defeated_side(&self) -> Option<Side> {
        if self.player.is_defeated() {
            Some(Side::Player)
        } else if self.opponent.is_defeated() {
            Some(Side::Opponent)
        } else {
            None
        }
    }

    /// Zone the given side aims at; the opponent always goes center mass
    pub fn aim_of(&self, side: Side) -> TargetZone {
        match side {
            Side::Player => self.target_zone,
            Side::Opponent => TargetZone::Torso,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> CombatState {
        CombatState::new(
            Combatant::new("V", Side::Player, 20),
            Combatant::new("Ganger", Side::Player, 12),
            Environment::Warehouse,
        )
    }

    #[test]
    fn test_new_state_defaults() {
        let state = state();
        assert_eq!(state.turn, 1);
        assert_eq!(state.opponent.side, Side::Opponent);
        assert_eq!(state.player.position, Position::Center);
        assert_eq!(state.terrain, Environment::Warehouse.terrain_map());
        assert_eq!(state.target_zone, TargetZone::Torso);
    }

    #[test]
    fn test_pair_mut() {
        let mut state = state();
        let (actor, other) = state.pair_mut(Side::Opponent);
        assert_eq!(actor.name, "Ganger");
        assert_eq!(other.name, "V");
    }

    #[test]
    fn test_gadget_cooldowns_tick() {
        let mut cooldowns = GadgetCooldowns::default();
        let mine = GadgetId::new("proximity_mine");
        cooldowns.set(Side::Player, mine.clone(), 2);
        assert_eq!(cooldowns.get(Side::Player, &mine), 2);
        assert_eq!(cooldowns.get(Side::Opponent, &mine), 0);
        cooldowns.tick();
        cooldowns.tick();
        assert_eq!(cooldowns.get(Side::Player, &mine), 0);
        assert!(cooldowns.is_empty());
    }

    #[test]
    fn test_defeated_side() {
        let mut state = state();
        assert_eq!(state.defeated_side(), None);
        state.opponent.lose_health(100);
        assert_eq!(state.defeated_side(), Some(Side::Opponent));
    }
}
