//! Combat configuration with documented constants
//!
//! Every tunable number used by the turn controller and the damage
//! calculator lives here. Registries hold per-ability and per-gadget data;
//! this struct holds the rules that apply to everything.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::RegistryError;
use crate::core::types::Turn;

/// Rules for a single encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    // === TURN STRUCTURE ===
    /// Action points each side receives at the start of its phase
    ///
    /// Moves cost 1 to 3 plus terrain penalty, so 2 points allow one
    /// short move and an attack, or two attacks.
    pub action_points_per_turn: u32,

    /// Hard ceiling on full turns before the encounter ends as a stalemate
    ///
    /// `None` lets the encounter run until a side wins or escapes.
    pub max_turns: Option<Turn>,

    /// Consecutive actions that spend no action points (rejected or free)
    /// tolerated before a phase is ended
    pub max_rejected_actions: u32,

    // === DAMAGE ===
    /// Lower bound of the damage variance roll
    pub damage_variance_min: f32,

    /// Upper bound of the damage variance roll
    pub damage_variance_max: f32,

    /// Difficulty multiplier on the player's outgoing base damage
    pub player_damage_multiplier: f32,

    /// Difficulty multiplier on the opponent's outgoing base damage
    pub opponent_damage_multiplier: f32,

    /// Critical chance before position and status bonuses (percent)
    pub base_crit_chance: i32,

    /// Damage multiplier on a critical hit
    pub crit_multiplier: f32,

    /// Chance a player's basic attack opens a bleeding wound (percent)
    pub basic_bleed_chance: i32,

    // === ACCURACY ===
    /// Hit chance of each strike in a multi-hit ability (percent)
    pub multi_hit_base_chance: i32,

    /// Extra hit chance when the attacker stands on a flank
    pub flank_hit_bonus: i32,

    /// Extra hit chance from accuracy-bonus terrain (elevated ground)
    pub elevated_hit_bonus: i32,

    // === TERRAIN ===
    /// Minimum hazard damage taken at the start of a phase on hazardous ground
    pub hazard_damage_min: i32,

    /// Maximum hazard damage taken at the start of a phase on hazardous ground
    pub hazard_damage_max: i32,

    // === ESCAPE ===
    /// Escape chance before reflex is counted (percent)
    pub escape_base_chance: i32,

    /// Escape chance gained per point of reflex
    pub escape_reflex_factor: i32,

    /// Floor on the reflex-derived escape chance
    pub escape_min_chance: i32,

    /// Ceiling on the reflex-derived escape chance, before escape boosts
    pub escape_max_chance: i32,

    /// Absolute ceiling once escape boosts are added
    pub escape_boosted_cap: i32,

    /// Share of max health lost on a successful escape (percent, never lethal)
    pub escape_health_cost_percent: u32,

    /// Chance of dropping one combat item on a successful escape (percent)
    pub escape_item_loss_chance: i32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            action_points_per_turn: 2,
            max_turns: None,
            max_rejected_actions: 8,

            damage_variance_min: 0.8,
            damage_variance_max: 1.2,
            player_damage_multiplier: 1.0,
            opponent_damage_multiplier: 1.0,
            base_crit_chance: 5,
            crit_multiplier: 1.5,
            basic_bleed_chance: 15,

            multi_hit_base_chance: 80,
            flank_hit_bonus: 10,
            elevated_hit_bonus: 10,

            hazard_damage_min: 1,
            hazard_damage_max: 3,

            escape_base_chance: 30,
            escape_reflex_factor: 5,
            escape_min_chance: 10,
            escape_max_chance: 70,
            escape_boosted_cap: 95,
            escape_health_cost_percent: 10,
            escape_item_loss_chance: 25,
        }
    }
}

impl CombatConfig {
    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, RegistryError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load a config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Builder-style turn ceiling
    pub fn with_max_turns(mut self, max_turns: Turn) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    /// Escape chance for a given reflex and accumulated escape boost
    pub fn escape_chance(&self, reflex: i32, boost: i32) -> i32 {
        let base = (self.escape_base_chance + reflex * self.escape_reflex_factor)
            .clamp(self.escape_min_chance, self.escape_max_chance);
        (base + boost).clamp(0, self.escape_boosted_cap)
    }
}
