//! Terrain categories and per-encounter terrain maps
//!
//! Terrain is assigned once per encounter from the environment and never
//! changes afterwards.

use serde::{Deserialize, Serialize};

use super::position::Position;

/// Terrain category covering one position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    #[default]
    Open, // No penalty, no cover
    Debris,    // Rubble to hide behind
    Elevated,  // High ground, better aim
    Confined,  // Tight quarters, hard to flank
    Hazardous, // Live wires, toxic spills
    TechRich,  // Terminals and exposed networks
    Shadows,   // Poor light
}

/// Special rule a terrain category carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainSpecial {
    CanCreateCover,
    AccuracyBonus,
    LimitedFlanking,
    DamagePerTurn,
    NetrunnerBonus,
    StealthBonus,
}

impl Terrain {
    /// Extra action points needed to move away from this terrain
    pub fn move_penalty(&self) -> u32 {
        match self {
            Terrain::Debris | Terrain::Hazardous => 1,
            Terrain::Confined => 2,
            _ => 0,
        }
    }

    /// Cover points; each is worth 5% defense
    pub fn cover_bonus(&self) -> i32 {
        match self {
            Terrain::Debris | Terrain::Elevated => 1,
            Terrain::Confined => 2,
            _ => 0,
        }
    }

    pub fn special(&self) -> Option<TerrainSpecial> {
        match self {
            Terrain::Open => None,
            Terrain::Debris => Some(TerrainSpecial::CanCreateCover),
            Terrain::Elevated => Some(TerrainSpecial::AccuracyBonus),
            Terrain::Confined => Some(TerrainSpecial::LimitedFlanking),
            Terrain::Hazardous => Some(TerrainSpecial::DamagePerTurn),
            Terrain::TechRich => Some(TerrainSpecial::NetrunnerBonus),
            Terrain::Shadows => Some(TerrainSpecial::StealthBonus),
        }
    }

    pub fn has_special(&self, special: TerrainSpecial) -> bool {
        self.special() == Some(special)
    }
}

/// Encounter locations; each one lays out a fixed terrain map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Standard,
    Warehouse,
    Street,
    Nightclub,
    CorpOffice,
    Junkyard,
    CyberDen,
    Alley,
}

impl Environment {
    pub fn all() -> [Environment; 8] {
        [
            Environment::Standard,
            Environment::Warehouse,
            Environment::Street,
            Environment::Nightclub,
            Environment::CorpOffice,
            Environment::Junkyard,
            Environment::CyberDen,
            Environment::Alley,
        ]
    }

    /// Terrain for (center, flank left, flank right, aggressive, defensive)
    fn layout(&self) -> [Terrain; 5] {
        use Terrain::*;
        match self {
            Environment::Standard => [Open, Open, Open, Open, Open],
            Environment::Warehouse => [Open, Debris, Debris, Confined, Elevated],
            Environment::Street => [Open, Debris, Debris, Hazardous, Elevated],
            Environment::Nightclub => [Open, Shadows, TechRich, Confined, Elevated],
            Environment::CorpOffice => [TechRich, Open, Open, Confined, Elevated],
            Environment::Junkyard => [Hazardous, Debris, Debris, Hazardous, Elevated],
            Environment::CyberDen => [TechRich, Shadows, Confined, Debris, TechRich],
            Environment::Alley => [Confined, Shadows, Shadows, Hazardous, Debris],
        }
    }

    pub fn terrain_map(&self) -> TerrainMap {
        TerrainMap {
            tiles: self.layout(),
        }
    }
}

/// Terrain at every position for one encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TerrainMap {
    tiles: [Terrain; 5],
}

impl TerrainMap {
    /// Same terrain everywhere
    pub fn uniform(terrain: Terrain) -> Self {
        Self { tiles: [terrain; 5] }
    }

    pub fn at(&self, position: Position) -> Terrain {
        self.tiles[Self::slot(position)]
    }

    pub fn set(&mut self, position: Position, terrain: Terrain) {
        self.tiles[Self::slot(position)] = terrain;
    }

    fn slot(position: Position) -> usize {
        match position {
            Position::Center => 0,
            Position::FlankLeft => 1,
            Position::FlankRight => 2,
            Position::Aggressive => 3,
            Position::Defensive => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terrain_properties() {
        assert_eq!(Terrain::Confined.move_penalty(), 2);
        assert_eq!(Terrain::Confined.cover_bonus(), 2);
        assert_eq!(Terrain::Hazardous.move_penalty(), 1);
        assert_eq!(Terrain::Hazardous.cover_bonus(), 0);
        assert!(Terrain::Debris.has_special(TerrainSpecial::CanCreateCover));
        assert_eq!(Terrain::Open.special(), None);
    }

    #[test]
    fn test_warehouse_layout() {
        let map = Environment::Warehouse.terrain_map();
        assert_eq!(map.at(Position::Center), Terrain::Open);
        assert_eq!(map.at(Position::FlankLeft), Terrain::Debris);
        assert_eq!(map.at(Position::Aggressive), Terrain::Confined);
        assert_eq!(map.at(Position::Defensive), Terrain::Elevated);
    }

    #[test]
    fn test_standard_is_all_open() {
        let map = Environment::Standard.terrain_map();
        for position in Position::all() {
            assert_eq!(map.at(position), Terrain::Open);
        }
    }

    #[test]
    fn test_environment_deserializes_snake_case() {
        #[derive(Deserialize)]
        struct Holder {
            env: Environment,
        }
        let holder: Holder = toml::from_str("env = \"corp_office\"").unwrap();
        assert_eq!(holder.env, Environment::CorpOffice);
    }
}
