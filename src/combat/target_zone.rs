//! Target zones the player can aim at
//!
//! Aiming is free and persists until changed. Zones trade hit difficulty
//! for damage.

use serde::{Deserialize, Serialize};

/// Where the player aims
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TargetZone {
    /// Center mass, no modifiers
    #[default]
    Torso,
    Head,
    Arms,
    Legs,
}

impl TargetZone {
    pub fn all() -> [TargetZone; 4] {
        [
            TargetZone::Torso,
            TargetZone::Head,
            TargetZone::Arms,
            TargetZone::Legs,
        ]
    }
}

/// Damage multiplier and hit penalty for one zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneProfile {
    pub damage_multiplier: f32,
    /// Percent subtracted from multi-hit accuracy
    pub hit_difficulty: i32,
}

impl Default for ZoneProfile {
    fn default() -> Self {
        Self {
            damage_multiplier: 1.0,
            hit_difficulty: 0,
        }
    }
}

/// Zone lookup table, loaded from `target_zones.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneTable {
    pub torso: ZoneProfile,
    pub head: ZoneProfile,
    pub arms: ZoneProfile,
    pub legs: ZoneProfile,
}

impl Default for ZoneTable {
    fn default() -> Self {
        Self {
            torso: ZoneProfile::default(),
            head: ZoneProfile {
                damage_multiplier: 1.5,
                hit_difficulty: 25,
            },
            arms: ZoneProfile {
                damage_multiplier: 0.8,
                hit_difficulty: 10,
            },
            legs: ZoneProfile {
                damage_multiplier: 0.9,
                hit_difficulty: 5,
            },
        }
    }
}

impl ZoneTable {
    pub fn profile(&self, zone: TargetZone) -> ZoneProfile {
        match zone {
            TargetZone::Torso => self.torso,
            TargetZone::Head => self.head,
            TargetZone::Arms => self.arms,
            TargetZone::Legs => self.legs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_torso_is_neutral() {
        let table = ZoneTable::default();
        let torso = table.profile(TargetZone::Torso);
        assert_eq!(torso.damage_multiplier, 1.0);
        assert_eq!(torso.hit_difficulty, 0);
    }

    #[test]
    fn test_head_is_risky() {
        let table = ZoneTable::default();
        let head = table.profile(TargetZone::Head);
        assert!(head.damage_multiplier > 1.0);
        assert!(head.hit_difficulty > table.profile(TargetZone::Arms).hit_difficulty);
    }
}
