//! Per-encounter combatant model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::cover::Cover;
use super::record::CombatantRecord;
use super::status::StatusEffects;
use crate::core::types::{AbilityId, CharacterClass, DamageType, EnemyArchetype, Side, Stats};
use crate::tactics::position::Position;

/// One side of an encounter
///
/// Health always stays within `0..=max_health`; only [`Combatant::lose_health`]
/// and [`Combatant::heal`] change it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub side: Side,
    pub class: Option<CharacterClass>,
    pub archetype: EnemyArchetype,
    health: i32,
    max_health: i32,
    pub stats: Stats,
    pub attack_power: i32,
    pub defense: i32,
    pub position: Position,
    pub cover: Cover,
    pub statuses: StatusEffects,
    pub abilities: Vec<AbilityId>,
    pub cooldowns: BTreeMap<AbilityId, u32>,
    pub weaknesses: Vec<DamageType>,
    pub resistances: Vec<DamageType>,
    /// Weaknesses revealed to the other side
    pub analyzed: bool,
    pub items: Vec<String>,
}

impl Combatant {
    pub fn new(name: impl Into<String>, side: Side, max_health: i32) -> Self {
        let max_health = max_health.max(1);
        Self {
            name: name.into(),
            side,
            class: None,
            archetype: EnemyArchetype::Standard,
            health: max_health,
            max_health,
            stats: Stats::default(),
            attack_power: 1,
            defense: 0,
            position: Position::Center,
            cover: Cover::default(),
            statuses: StatusEffects::default(),
            abilities: Vec::new(),
            cooldowns: BTreeMap::new(),
            weaknesses: Vec::new(),
            resistances: Vec::new(),
            analyzed: false,
            items: Vec::new(),
        }
    }

    /// Snapshot an external record at encounter start
    pub fn from_record(record: &dyn CombatantRecord, side: Side) -> Self {
        let max_health = record.max_health().max(1);
        Self {
            name: record.name().to_string(),
            side,
            class: record.class(),
            archetype: record.archetype(),
            health: record.health().clamp(0, max_health),
            max_health,
            stats: record.stats(),
            attack_power: record.attack_power(),
            defense: record.defense(),
            position: Position::Center,
            cover: Cover::default(),
            statuses: StatusEffects::default(),
            abilities: record.abilities(),
            cooldowns: BTreeMap::new(),
            weaknesses: record.weaknesses(),
            resistances: record.resistances(),
            analyzed: false,
            items: record.combat_items(),
        }
    }

    pub fn with_class(mut self, class: CharacterClass) -> Self {
        self.class = Some(class);
        self
    }

    pub fn with_archetype(mut self, archetype: EnemyArchetype) -> Self {
        self.archetype = archetype;
        self
    }

    pub fn with_attack(mut self, attack_power: i32) -> Self {
        self.attack_power = attack_power;
        self
    }

    pub fn with_defense(mut self, defense: i32) -> Self {
        self.defense = defense;
        self
    }

    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_abilities(mut self, abilities: impl IntoIterator<Item = AbilityId>) -> Self {
        self.abilities = abilities.into_iter().collect();
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }

    /// Remove health, returning the amount actually lost
    pub fn lose_health(&mut self, amount: i32) -> i32 {
        let lost = amount.clamp(0, self.health);
        self.health -= lost;
        lost
    }

    /// Restore health up to the maximum, returning the amount restored
    pub fn heal(&mut self, amount: i32) -> i32 {
        let restored = amount.clamp(0, self.max_health - self.health);
        self.health += restored;
        restored
    }

    pub fn has_ability(&self, ability: &AbilityId) -> bool {
        self.abilities.contains(ability)
    }

    pub fn cooldown(&self, ability: &AbilityId) -> u32 {
        self.cooldowns.get(ability).copied().unwrap_or(0)
    }

    pub fn set_cooldown(&mut self, ability: AbilityId, turns: u32) {
        if turns == 0 {
            self.cooldowns.remove(&ability);
        } else {
            self.cooldowns.insert(ability, turns);
        }
    }

    /// Count every ability cooldown down by one turn
    pub fn tick_cooldowns(&mut self) {
        for remaining in self.cooldowns.values_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        self.cooldowns.retain(|_, remaining| *remaining > 0);
    }

    /// Abilities off cooldown, in the order the combatant knows them
    pub fn ready_abilities(&self) -> impl Iterator<Item = &AbilityId> {
        self.abilities.iter().filter(|a| self.cooldown(a) == 0)
    }

    /// Damage-type multiplier in percent against this combatant
    pub fn matchup_percent(&self, damage_type: DamageType) -> i32 {
        use super::constants::{RESISTANCE_DAMAGE_PCT, WEAKNESS_DAMAGE_PCT};
        if self.weaknesses.contains(&damage_type) {
            WEAKNESS_DAMAGE_PCT
        } else if self.resistances.contains(&damage_type) {
            RESISTANCE_DAMAGE_PCT
        } else {
            100
        }
    }

    /// Push encounter results back into the owning record
    pub fn write_back(&self, record: &mut dyn CombatantRecord) {
        let delta = self.health - record.health();
        if delta < 0 {
            record.take_damage(-delta, true, None);
        } else if delta > 0 {
            record.restore_health(delta);
        }
        for effect in self.statuses.iter() {
            record.apply_status(effect.kind, effect.remaining);
        }
        let mut kept = self.items.clone();
        for item in record.combat_items() {
            match kept.iter().position(|i| *i == item) {
                Some(idx) => {
                    kept.remove(idx);
                }
                None => {
                    record.lose_item(&item);
                }
            }
        }
    }
}
