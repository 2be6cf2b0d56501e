//! Damage and defense calculation
//!
//! A strike runs through a fixed pipeline:
//! hit roll, base damage with variance, position and flanking bonuses,
//! status modifiers, target zone, critical, defense, damage type matchup,
//! cover absorption, and finally health.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::combatant::Combatant;
use super::target_zone::ZoneProfile;
use crate::core::config::CombatConfig;
use crate::core::rng::CombatRng;
use crate::core::types::{DamageType, Side};
use crate::tactics::modifiers::position_modifiers;
use crate::tactics::position::flanking_bonus;
use crate::tactics::terrain::{TerrainMap, TerrainSpecial};

/// What a single application of damage did to a defender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HitReport {
    /// Damage after defense and matchups, before cover
    pub dealt: i32,
    pub absorbed: i32,
    pub health_lost: i32,
    pub cover_destroyed: bool,
}

/// How a strike should be rolled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeProfile {
    /// Multiplier on base damage (abilities scale this)
    pub multiplier: f32,
    pub ignore_defense: bool,
    pub damage_type: DamageType,
    pub zone: ZoneProfile,
    pub can_crit: bool,
}

impl StrikeProfile {
    pub fn basic(damage_type: DamageType, zone: ZoneProfile) -> Self {
        Self {
            multiplier: 1.0,
            ignore_defense: false,
            damage_type,
            zone,
            can_crit: true,
        }
    }
}

/// Outcome of a full strike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StrikeReport {
    pub landed: bool,
    pub critical: bool,
    pub damage: HitReport,
}

/// Effective defense of `defender` where it currently stands
pub fn defense_value(defender: &Combatant, terrain: &TerrainMap) -> i32 {
    let mods = position_modifiers(
        defender.position,
        defender.class,
        terrain.at(defender.position),
    );
    let scaled = defender.defense * (100 + mods.defense_bonus) / 100;
    let scaled = scaled * defender.statuses.defense_percent() / 100;
    (scaled + defender.statuses.flat_defense() + defender.cover.boost()).max(0)
}

/// Apply an already-rolled amount to a defender
///
/// Any connecting damage does at least 1 before cover.
pub fn apply_damage(
    defender: &mut Combatant,
    terrain: &TerrainMap,
    amount: i32,
    ignore_defense: bool,
    damage_type: Option<DamageType>,
) -> HitReport {
    let mitigated = if ignore_defense {
        amount.max(1)
    } else {
        (amount - defense_value(defender, terrain)).max(1)
    };
    let dealt = match damage_type {
        Some(kind) => (mitigated * defender.matchup_percent(kind) / 100).max(1),
        None => mitigated,
    };

    let absorption = defender.cover.absorb(dealt);
    let health_lost = defender.lose_health(absorption.passed_through);
    debug!(
        defender = %defender.name,
        amount, dealt, absorbed = absorption.absorbed, health_lost,
        "damage applied"
    );

    HitReport {
        dealt,
        absorbed: absorption.absorbed,
        health_lost,
        cover_destroyed: absorption.destroyed,
    }
}

/// Hit chance in percent for an attack from `attacker` on `defender`
///
/// `flank_accuracy` adds the flank bonus, used by multi-hit volleys.
pub fn hit_chance(
    base: i32,
    attacker: &Combatant,
    defender: &Combatant,
    terrain: &TerrainMap,
    zone: ZoneProfile,
    config: &CombatConfig,
    flank_accuracy: bool,
) -> i32 {
    let mut chance = base - zone.hit_difficulty
        + attacker.statuses.accuracy_modifier()
        + defender.statuses.exposure().0;
    if flank_accuracy && attacker.position.is_flank() {
        chance += config.flank_hit_bonus;
    }
    if terrain
        .at(attacker.position)
        .has_special(TerrainSpecial::AccuracyBonus)
    {
        chance += config.elevated_hit_bonus;
    }
    chance.clamp(0, 100)
}

/// Critical chance in percent
pub fn crit_chance(
    attacker: &Combatant,
    defender: &Combatant,
    terrain: &TerrainMap,
    config: &CombatConfig,
) -> i32 {
    let mods = position_modifiers(
        attacker.position,
        attacker.class,
        terrain.at(attacker.position),
    );
    (config.base_crit_chance
        + mods.crit_bonus
        + attacker.statuses.crit_bonus()
        + defender.statuses.exposure().1)
        .clamp(0, 100)
}

/// Base damage from the attacker's stat, difficulty multiplier and variance
pub fn base_damage(
    attacker: &Combatant,
    multiplier: f32,
    config: &CombatConfig,
    rng: &mut dyn CombatRng,
) -> i32 {
    let side_multiplier = match attacker.side {
        Side::Player => config.player_damage_multiplier,
        Side::Opponent => config.opponent_damage_multiplier,
    };
    let variance = rng.range_f32(config.damage_variance_min, config.damage_variance_max);
    let raw = attacker.attack_power as f32 * multiplier * side_multiplier * variance;
    (raw.round() as i32).max(1)
}

/// Position, flanking and status bonuses on top of base damage
pub fn offensive_damage(
    base: i32,
    attacker: &Combatant,
    defender: &Combatant,
    terrain: &TerrainMap,
) -> i32 {
    let mods = position_modifiers(
        attacker.position,
        attacker.class,
        terrain.at(attacker.position),
    );
    let mut flank = flanking_bonus(attacker.position, defender.position);
    if terrain
        .at(defender.position)
        .has_special(TerrainSpecial::LimitedFlanking)
    {
        flank /= 2;
    }
    let boosted = base * (100 + mods.attack_bonus + flank) / 100;
    (boosted * attacker.statuses.damage_percent() / 100).max(1)
}

/// Damage type an attacker uses by default against `defender`
///
/// Once a defender has been analyzed, attacks exploit its first weakness.
pub fn preferred_damage_type(defender: &Combatant) -> DamageType {
    if defender.analyzed {
        if let Some(&weakness) = defender.weaknesses.first() {
            return weakness;
        }
    }
    DamageType::Physical
}

/// Roll a full strike and apply it to the defender
pub fn strike(
    attacker: &Combatant,
    defender: &mut Combatant,
    terrain: &TerrainMap,
    profile: StrikeProfile,
    config: &CombatConfig,
    rng: &mut dyn CombatRng,
) -> StrikeReport {
    let chance = hit_chance(100, attacker, defender, terrain, profile.zone, config, false);
    if !rng.percent(chance) {
        debug!(attacker = %attacker.name, chance, "strike missed");
        return StrikeReport::default();
    }

    let base = base_damage(attacker, profile.multiplier, config, rng);
    let boosted = offensive_damage(base, attacker, defender, terrain);
    let mut amount = ((boosted as f32) * profile.zone.damage_multiplier).floor() as i32;

    let mut critical = false;
    if profile.can_crit && rng.percent(crit_chance(attacker, defender, terrain, config)) {
        critical = true;
        amount = ((amount as f32) * config.crit_multiplier).floor() as i32;
    }

    let damage = apply_damage(
        defender,
        terrain,
        amount,
        profile.ignore_defense,
        Some(profile.damage_type),
    );
    StrikeReport {
        landed: true,
        critical,
        damage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::cover::{Cover, CoverTier};
    use crate::combat::status::{StatusEffect, StatusKind, StatusSource};
    use crate::core::rng::FixedRolls;
    use crate::tactics::position::Position;
    use crate::tactics::terrain::Terrain;

    fn open() -> TerrainMap {
        TerrainMap::uniform(Terrain::Open)
    }

    #[test]
    fn test_cover_absorbs_before_health() {
        let mut defender = Combatant::new("Target", Side::Opponent, 20);
        defender.cover = Cover::with_health(CoverTier::Medium, 5);
        let report = apply_damage(&mut defender, &open(), 8, false, None);
        assert_eq!(report.absorbed, 5);
        assert_eq!(report.health_lost, 3);
        assert!(report.cover_destroyed);
        assert_eq!(defender.cover.tier, CoverTier::None);
        assert_eq!(defender.health(), 17);
    }

    #[test]
    fn test_minimum_one_damage() {
        let mut defender = Combatant::new("Tank", Side::Opponent, 20).with_defense(10);
        let report = apply_damage(&mut defender, &open(), 3, false, None);
        assert_eq!(report.dealt, 1);
        assert_eq!(defender.health(), 19);
    }

    #[test]
    fn test_defense_value_position_and_status() {
        let mut defender = Combatant::new("Target", Side::Opponent, 20)
            .with_defense(10)
            .with_position(Position::Defensive);
        // Defensive grants +15%
        assert_eq!(defense_value(&defender, &open()), 11);
        defender
            .statuses
            .apply(StatusEffect::new(StatusKind::Vulnerable, 2, StatusSource::Attack));
        assert_eq!(defense_value(&defender, &open()), 7);
    }

    #[test]
    fn test_weakness_multiplies_after_defense() {
        let mut defender = Combatant::new("Drone", Side::Opponent, 30).with_defense(2);
        defender.weaknesses.push(DamageType::Emp);
        let report = apply_damage(&mut defender, &open(), 10, false, Some(DamageType::Emp));
        assert_eq!(report.dealt, 12);
    }

    #[test]
    fn test_offensive_damage_flanking() {
        let attacker = Combatant::new("A", Side::Player, 10).with_position(Position::Aggressive);
        let defender = Combatant::new("D", Side::Opponent, 10).with_position(Position::Defensive);
        // +20 attack, +25 flanking
        assert_eq!(offensive_damage(100, &attacker, &defender, &open()), 145);

        let mut confined = open();
        confined.set(Position::Defensive, Terrain::Confined);
        // Flanking halved against a defender in tight quarters
        assert_eq!(offensive_damage(100, &attacker, &defender, &confined), 132);
    }

    #[test]
    fn test_strike_with_forced_rolls() {
        let attacker = Combatant::new("A", Side::Player, 10).with_attack(10);
        let mut defender = Combatant::new("D", Side::Opponent, 50);
        let mut rng = FixedRolls::always_succeed();
        let report = strike(
            &attacker,
            &mut defender,
            &open(),
            StrikeProfile::basic(DamageType::Physical, ZoneProfile::default()),
            &CombatConfig::default(),
            &mut rng,
        );
        // Roll of 1 always crits: 10 * 1.5
        assert!(report.landed && report.critical);
        assert_eq!(report.damage.health_lost, 15);
    }

    #[test]
    fn test_strike_miss_changes_nothing() {
        let mut attacker = Combatant::new("A", Side::Player, 10).with_attack(10);
        attacker.statuses.apply(
            StatusEffect::new(StatusKind::ReducedAccuracy, 2, StatusSource::Attack).with_magnitude(20),
        );
        let mut defender = Combatant::new("D", Side::Opponent, 50);
        let mut rng = FixedRolls::always_fail();
        let report = strike(
            &attacker,
            &mut defender,
            &open(),
            StrikeProfile::basic(DamageType::Physical, ZoneProfile::default()),
            &CombatConfig::default(),
            &mut rng,
        );
        assert!(!report.landed);
        assert_eq!(defender.health(), 50);
    }

    #[test]
    fn test_preferred_damage_type_needs_analysis() {
        let mut defender = Combatant::new("D", Side::Opponent, 10);
        defender.weaknesses.push(DamageType::Hacking);
        assert_eq!(preferred_damage_type(&defender), DamageType::Physical);
        defender.analyzed = true;
        assert_eq!(preferred_damage_type(&defender), DamageType::Hacking);
    }
}
