//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Turn counter (one player phase plus one opponent phase)
pub type Turn = u32;

/// Which side of the encounter a combatant fights on
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Side {
    #[default]
    Player,
    Opponent,
}

impl Side {
    /// The other side of the encounter
    pub fn opposing(&self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Opponent => write!(f, "opponent"),
        }
    }
}

/// Character classes that unlock abilities and gadget bonuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    NetRunner,
    Solo,
    Fixer,
    Techie,
    Enforcer,
}

impl CharacterClass {
    pub fn all() -> [CharacterClass; 5] {
        [
            CharacterClass::NetRunner,
            CharacterClass::Solo,
            CharacterClass::Fixer,
            CharacterClass::Techie,
            CharacterClass::Enforcer,
        ]
    }
}

/// Enemy behaviour archetypes
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum EnemyArchetype {
    #[default]
    Standard,
    /// Hits harder, guards less
    Berserker,
    Tactician,
    /// Extra health and armor, slower hands
    Tank,
    Rogue,
}

impl EnemyArchetype {
    /// Flat (health, attack, defense) adjustments applied when the enemy is created
    pub fn stat_adjustments(&self) -> (i32, i32, i32) {
        match self {
            EnemyArchetype::Standard => (0, 0, 0),
            EnemyArchetype::Berserker => (0, 2, -1),
            EnemyArchetype::Tactician => (0, 0, 2),
            EnemyArchetype::Tank => (5, -1, 3),
            EnemyArchetype::Rogue => (0, 1, 0),
        }
    }
}

/// Damage categories checked against weaknesses and resistances
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    #[default]
    Physical,
    Hacking,
    Emp,
    Chemical,
}

/// Base attributes a combatant brings into an encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Stats {
    pub strength: i32,
    pub intelligence: i32,
    pub charisma: i32,
    pub reflex: i32,
}

/// Registry key for an ability definition
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbilityId(pub String);

impl AbilityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry key for a gadget definition
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GadgetId(pub String);

impl GadgetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GadgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opposing() {
        assert_eq!(Side::Player.opposing(), Side::Opponent);
        assert_eq!(Side::Opponent.opposing(), Side::Player);
    }

    #[test]
    fn test_tank_adjustments() {
        assert_eq!(EnemyArchetype::Tank.stat_adjustments(), (5, -1, 3));
    }

    #[test]
    fn test_ids_deserialize_transparently() {
        #[derive(Deserialize)]
        struct Holder {
            id: AbilityId,
        }
        let holder: Holder = toml::from_str("id = \"firewall\"").unwrap();
        assert_eq!(holder.id, AbilityId::new("firewall"));
    }
}
