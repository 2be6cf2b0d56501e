//! Destructible cover
//!
//! Cover soaks incoming damage with its own health pool. When that pool
//! hits zero the cover is gone in the same step.

use serde::{Deserialize, Serialize};

use super::constants::{COVER_SEARCH_INT_CAP, COVER_SEARCH_INT_FACTOR};
use crate::tactics::terrain::{Terrain, TerrainSpecial};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CoverTier {
    #[default]
    None,
    Light,
    Medium,
    Heavy,
    Full,
}

impl CoverTier {
    /// Health a freshly taken cover of this tier starts with
    pub fn default_health(&self) -> i32 {
        match self {
            CoverTier::None => 0,
            CoverTier::Light => 3,
            CoverTier::Medium => 5,
            CoverTier::Heavy => 8,
            CoverTier::Full => 10,
        }
    }

    /// Chance to find this tier when searching, before intelligence
    pub fn search_chance(&self) -> i32 {
        match self {
            CoverTier::None => 0,
            CoverTier::Light => 85,
            CoverTier::Medium => 60,
            CoverTier::Heavy => 30,
            CoverTier::Full => 20,
        }
    }

    /// Can this tier be found on `terrain`?
    pub fn available_on(&self, terrain: Terrain) -> bool {
        match self {
            CoverTier::None => false,
            CoverTier::Light | CoverTier::Medium => true,
            CoverTier::Heavy => terrain.has_special(TerrainSpecial::CanCreateCover),
            CoverTier::Full => terrain == Terrain::Confined,
        }
    }
}

/// Search chance for a tier with the searcher's intelligence folded in
pub fn cover_search_chance(tier: CoverTier, intelligence: i32) -> i32 {
    let int_bonus = (intelligence * COVER_SEARCH_INT_FACTOR).clamp(0, COVER_SEARCH_INT_CAP);
    (tier.search_chance() + int_bonus).min(100)
}

/// Cover a combatant currently holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Cover {
    pub tier: CoverTier,
    health: i32,
    /// Flat defense added while the cover stands
    boost: i32,
}

/// What happened when damage met cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Absorption {
    pub absorbed: i32,
    pub passed_through: i32,
    pub destroyed: bool,
}

impl Cover {
    pub fn new(tier: CoverTier) -> Self {
        Self::with_health(tier, tier.default_health())
    }

    pub fn with_health(tier: CoverTier, health: i32) -> Self {
        let mut cover = Self {
            tier,
            health: health.max(0),
            boost: 0,
        };
        cover.settle();
        cover
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn boost(&self) -> i32 {
        self.boost
    }

    pub fn is_up(&self) -> bool {
        self.tier != CoverTier::None
    }

    /// Add flat defense to standing cover
    pub fn reinforce(&mut self, amount: i32) {
        if self.is_up() {
            self.boost += amount.max(0);
        }
    }

    /// Soak `amount` with cover health; the rest passes through
    pub fn absorb(&mut self, amount: i32) -> Absorption {
        if !self.is_up() || amount <= 0 {
            return Absorption {
                absorbed: 0,
                passed_through: amount.max(0),
                destroyed: false,
            };
        }
        let absorbed = amount.min(self.health);
        self.health -= absorbed;
        let destroyed = self.settle();
        Absorption {
            absorbed,
            passed_through: amount - absorbed,
            destroyed,
        }
    }

    /// Damage the cover directly (cover-interaction effects)
    pub fn wear(&mut self, amount: i32) -> bool {
        if !self.is_up() {
            return false;
        }
        self.health = (self.health - amount.max(0)).max(0);
        self.settle()
    }

    pub fn clear(&mut self) {
        *self = Cover::default();
    }

    /// Collapse to no cover once health is gone. Returns true if it collapsed.
    fn settle(&mut self) -> bool {
        if self.health <= 0 && self.tier != CoverTier::None {
            self.clear();
            return true;
        }
        if self.tier == CoverTier::None {
            self.health = 0;
            self.boost = 0;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_breaks_cover() {
        let mut cover = Cover::with_health(CoverTier::Medium, 5);
        let result = cover.absorb(8);
        assert_eq!(result.absorbed, 5);
        assert_eq!(result.passed_through, 3);
        assert!(result.destroyed);
        assert_eq!(cover.tier, CoverTier::None);
        assert_eq!(cover.health(), 0);
    }

    #[test]
    fn test_absorb_partial() {
        let mut cover = Cover::new(CoverTier::Heavy);
        let result = cover.absorb(3);
        assert_eq!(result.passed_through, 0);
        assert_eq!(cover.health(), 5);
        assert!(cover.is_up());
    }

    #[test]
    fn test_no_cover_passes_everything() {
        let mut cover = Cover::default();
        assert_eq!(cover.absorb(4).passed_through, 4);
    }

    #[test]
    fn test_zero_health_cover_collapses() {
        let cover = Cover::with_health(CoverTier::Light, 0);
        assert_eq!(cover.tier, CoverTier::None);
    }

    #[test]
    fn test_boost_cleared_with_cover() {
        let mut cover = Cover::new(CoverTier::Light);
        cover.reinforce(2);
        assert_eq!(cover.boost(), 2);
        assert!(cover.wear(10));
        assert_eq!(cover.boost(), 0);
    }

    #[test]
    fn test_tier_availability() {
        assert!(CoverTier::Heavy.available_on(Terrain::Debris));
        assert!(!CoverTier::Heavy.available_on(Terrain::Open));
        assert!(CoverTier::Full.available_on(Terrain::Confined));
        assert!(CoverTier::Light.available_on(Terrain::Open));
    }

    #[test]
    fn test_search_chance_int_cap() {
        assert_eq!(cover_search_chance(CoverTier::Medium, 2), 66);
        assert_eq!(cover_search_chance(CoverTier::Medium, 10), 75);
        assert_eq!(cover_search_chance(CoverTier::Light, 10), 100);
    }
}
