//! Character and enemy records owned outside the combat engine
//!
//! The engine reads a record once to build a [`Combatant`](super::Combatant)
//! and writes results back through the record's mutation hooks when the
//! encounter ends.

use serde::{Deserialize, Serialize};

use super::constants::{BASE_HEALTH, HEALTH_PER_STRENGTH, REFLEX_PER_DEFENSE};
use super::status::StatusKind;
use crate::core::types::{AbilityId, CharacterClass, DamageType, EnemyArchetype, Stats};

/// What a character or enemy record must expose to fight
pub trait CombatantRecord {
    fn name(&self) -> &str;
    fn health(&self) -> i32;
    fn max_health(&self) -> i32;
    fn stats(&self) -> Stats;
    /// Base damage stat
    fn attack_power(&self) -> i32;
    fn defense(&self) -> i32;

    fn class(&self) -> Option<CharacterClass> {
        None
    }

    fn archetype(&self) -> EnemyArchetype {
        EnemyArchetype::Standard
    }

    fn abilities(&self) -> Vec<AbilityId> {
        Vec::new()
    }

    fn weaknesses(&self) -> Vec<DamageType> {
        Vec::new()
    }

    fn resistances(&self) -> Vec<DamageType> {
        Vec::new()
    }

    /// Inventory items usable in combat
    fn combat_items(&self) -> Vec<String> {
        Vec::new()
    }

    /// Apply damage and return the amount actually lost
    fn take_damage(&mut self, amount: i32, ignore_defense: bool, damage_type: Option<DamageType>)
        -> i32;

    fn apply_status(&mut self, kind: StatusKind, duration: u32);

    /// Restore health up to max and return the amount gained; records
    /// without the hook keep their pre-encounter health
    fn restore_health(&mut self, _amount: i32) -> i32 {
        0
    }

    /// Drop one inventory item; false if the record had none by that name
    fn lose_item(&mut self, _item: &str) -> bool {
        false
    }
}

/// Mitigated damage shared by the bundled record types
fn mitigate(amount: i32, defense: i32, ignore_defense: bool) -> i32 {
    if amount <= 0 {
        return 0;
    }
    if ignore_defense {
        amount
    } else {
        (amount - defense).max(1)
    }
}

/// A player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSheet {
    pub name: String,
    pub class: CharacterClass,
    pub stats: Stats,
    pub health: i32,
    pub max_health: i32,
    #[serde(default)]
    pub abilities: Vec<AbilityId>,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub lingering: Vec<(StatusKind, u32)>,
}

impl CharacterSheet {
    /// New character at full health; max health grows with strength
    pub fn new(name: impl Into<String>, class: CharacterClass, stats: Stats) -> Self {
        let max_health = BASE_HEALTH + stats.strength * HEALTH_PER_STRENGTH;
        Self {
            name: name.into(),
            class,
            stats,
            health: max_health,
            max_health,
            abilities: Vec::new(),
            items: Vec::new(),
            lingering: Vec::new(),
        }
    }

    pub fn with_abilities(mut self, abilities: impl IntoIterator<Item = AbilityId>) -> Self {
        self.abilities = abilities.into_iter().collect();
        self
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = String>) -> Self {
        self.items = items.into_iter().collect();
        self
    }
}

impl CombatantRecord for CharacterSheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn health(&self) -> i32 {
        self.health
    }

    fn max_health(&self) -> i32 {
        self.max_health
    }

    fn stats(&self) -> Stats {
        self.stats
    }

    fn attack_power(&self) -> i32 {
        self.stats.strength.max(1)
    }

    fn defense(&self) -> i32 {
        (self.stats.reflex / REFLEX_PER_DEFENSE).max(0)
    }

    fn class(&self) -> Option<CharacterClass> {
        Some(self.class)
    }

    fn abilities(&self) -> Vec<AbilityId> {
        self.abilities.clone()
    }

    fn combat_items(&self) -> Vec<String> {
        self.items.clone()
    }

    fn take_damage(&mut self, amount: i32, ignore_defense: bool, _damage_type: Option<DamageType>) -> i32 {
        let actual = mitigate(amount, self.defense(), ignore_defense).min(self.health);
        self.health -= actual;
        actual
    }

    fn apply_status(&mut self, kind: StatusKind, duration: u32) {
        self.lingering.retain(|(k, _)| *k != kind);
        self.lingering.push((kind, duration));
    }

    fn restore_health(&mut self, amount: i32) -> i32 {
        let gained = amount.max(0).min(self.max_health - self.health);
        self.health += gained;
        gained
    }

    fn lose_item(&mut self, item: &str) -> bool {
        match self.items.iter().position(|i| i == item) {
            Some(idx) => {
                self.items.remove(idx);
                true
            }
            None => false,
        }
    }
}

/// Enemy entry as written in `enemies.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub id: String,
    pub name: String,
    pub health: i32,
    pub attack: i32,
    #[serde(default)]
    pub defense: i32,
    #[serde(default)]
    pub archetype: EnemyArchetype,
    #[serde(default)]
    pub weaknesses: Vec<DamageType>,
    #[serde(default)]
    pub resistances: Vec<DamageType>,
    #[serde(default)]
    pub abilities: Vec<AbilityId>,
}

impl EnemyTemplate {
    /// Build a live enemy with archetype adjustments applied
    pub fn spawn(&self) -> EnemyProfile {
        let (health_adj, attack_adj, defense_adj) = self.archetype.stat_adjustments();
        let max_health = (self.health + health_adj).max(1);
        EnemyProfile {
            name: self.name.clone(),
            archetype: self.archetype,
            health: max_health,
            max_health,
            attack: (self.attack + attack_adj).max(1),
            defense: (self.defense + defense_adj).max(0),
            weaknesses: self.weaknesses.clone(),
            resistances: self.resistances.clone(),
            abilities: self.abilities.clone(),
            lingering: Vec::new(),
        }
    }
}

/// A spawned enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyProfile {
    pub name: String,
    pub archetype: EnemyArchetype,
    pub health: i32,
    pub max_health: i32,
    pub attack: i32,
    pub defense: i32,
    pub weaknesses: Vec<DamageType>,
    pub resistances: Vec<DamageType>,
    pub abilities: Vec<AbilityId>,
    pub lingering: Vec<(StatusKind, u32)>,
}

impl EnemyProfile {
    pub fn new(name: impl Into<String>, health: i32, attack: i32, defense: i32) -> Self {
        Self {
            name: name.into(),
            archetype: EnemyArchetype::Standard,
            health,
            max_health: health,
            attack,
            defense,
            weaknesses: Vec::new(),
            resistances: Vec::new(),
            abilities: Vec::new(),
            lingering: Vec::new(),
        }
    }
}

impl CombatantRecord for EnemyProfile {
    fn name(&self) -> &str {
        &self.name
    }

    fn health(&self) -> i32 {
        self.health
    }

    fn max_health(&self) -> i32 {
        self.max_health
    }

    fn stats(&self) -> Stats {
        Stats::default()
    }

    fn attack_power(&self) -> i32 {
        self.attack
    }

    fn defense(&self) -> i32 {
        self.defense
    }

    fn archetype(&self) -> EnemyArchetype {
        self.archetype
    }

    fn abilities(&self) -> Vec<AbilityId> {
        self.abilities.clone()
    }

    fn weaknesses(&self) -> Vec<DamageType> {
        self.weaknesses.clone()
    }

    fn resistances(&self) -> Vec<DamageType> {
        self.resistances.clone()
    }

    fn take_damage(&mut self, amount: i32, ignore_defense: bool, _damage_type: Option<DamageType>) -> i32 {
        let actual = mitigate(amount, self.defense, ignore_defense).min(self.health);
        self.health -= actual;
        actual
    }

    fn apply_status(&mut self, kind: StatusKind, duration: u32) {
        self.lingering.retain(|(k, _)| *k != kind);
        self.lingering.push((kind, duration));
    }

    fn restore_health(&mut self, amount: i32) -> i32 {
        let gained = amount.max(0).min(self.max_health - self.health);
        self.health += gained;
        gained
    }
}
