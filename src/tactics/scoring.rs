//! Position scoring for automated movement
//!
//! Scores are integers (ten times the blended percentages) so ranking is
//! exact and reproducible. Ties go to the earliest position in
//! [`Position::all`] order.

use super::modifiers::{movement_cost, position_modifiers};
use super::position::{flanking_bonus, Position};
use super::terrain::TerrainMap;
use crate::core::types::{CharacterClass, EnemyArchetype};

/// Score per preference rank step
const PREFERENCE_WEIGHT: i32 = 100;
/// Score lost per action point spent moving
const MOVE_COST_WEIGHT: i32 = 50;

/// Positions a class likes to fight from, most preferred first
pub fn class_preferences(class: CharacterClass) -> &'static [Position] {
    match class {
        CharacterClass::NetRunner => &[Position::Center, Position::Defensive],
        CharacterClass::Enforcer => &[Position::Aggressive, Position::Center],
        CharacterClass::Fixer => &[Position::FlankLeft, Position::FlankRight],
        CharacterClass::Techie => &[Position::Defensive, Position::Center],
        CharacterClass::Solo => &[],
    }
}

/// Positions an enemy archetype drifts toward, most preferred first
pub fn archetype_preferences(archetype: EnemyArchetype) -> &'static [Position] {
    match archetype {
        EnemyArchetype::Berserker => &[Position::Aggressive, Position::Center],
        EnemyArchetype::Tactician => &[Position::FlankLeft, Position::FlankRight],
        EnemyArchetype::Tank => &[Position::Defensive, Position::Center],
        EnemyArchetype::Rogue => &[Position::FlankRight, Position::FlankLeft],
        EnemyArchetype::Standard => &[],
    }
}

/// Inputs for ranking candidate positions
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub current: Position,
    pub enemy_position: Position,
    pub action_points: u32,
    pub terrain: &'a TerrainMap,
    pub class: Option<CharacterClass>,
    pub preferences: &'a [Position],
}

/// Score for standing at `candidate`, or `None` if it cannot be reached
pub fn score_position(ctx: &ScoringContext<'_>, candidate: Position) -> Option<i32> {
    let cost = movement_cost(ctx.current, candidate, ctx.terrain.at(ctx.current));
    let cost = if candidate == ctx.current { 0 } else { cost };
    if cost > ctx.action_points {
        return None;
    }

    let mods = position_modifiers(candidate, ctx.class, ctx.terrain.at(candidate));
    let flank = flanking_bonus(candidate, ctx.enemy_position);
    let preference = ctx
        .preferences
        .iter()
        .position(|&p| p == candidate)
        .map(|idx| (ctx.preferences.len() - idx) as i32)
        .unwrap_or(0);

    Some(
        mods.attack_bonus * 5 + mods.defense_bonus * 3 + mods.crit_bonus * 2 + flank * 5
            + preference * PREFERENCE_WEIGHT
            - cost as i32 * MOVE_COST_WEIGHT,
    )
}

/// Best reachable position; staying put is always a candidate
pub fn optimal_position(ctx: &ScoringContext<'_>) -> Position {
    let mut best = ctx.current;
    let mut best_score = i32::MIN;
    for candidate in Position::all() {
        if let Some(score) = score_position(ctx, candidate) {
            if score > best_score {
                best = candidate;
                best_score = score;
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tactics::terrain::{Environment, Terrain};

    fn ctx<'a>(terrain: &'a TerrainMap, preferences: &'a [Position]) -> ScoringContext<'a> {
        ScoringContext {
            current: Position::Center,
            enemy_position: Position::Defensive,
            action_points: 2,
            terrain,
            class: None,
            preferences,
        }
    }

    #[test]
    fn test_aggressive_wins_against_defender() {
        let terrain = TerrainMap::uniform(Terrain::Open);
        // Aggressive: 20*5 + (-10)*3 + 10*2 + 25*5 - 2*50 = 115
        assert_eq!(score_position(&ctx(&terrain, &[]), Position::Aggressive), Some(115));
        assert_eq!(optimal_position(&ctx(&terrain, &[])), Position::Aggressive);
    }

    #[test]
    fn test_unreachable_positions_skipped() {
        let terrain = TerrainMap::uniform(Terrain::Open);
        let mut context = ctx(&terrain, &[]);
        context.action_points = 1;
        assert_eq!(score_position(&context, Position::Aggressive), None);
        assert!(score_position(&context, Position::Center).is_some());
    }

    #[test]
    fn test_preference_pulls_toward_defensive() {
        let terrain = Environment::Warehouse.terrain_map();
        let prefs = class_preferences(CharacterClass::Techie);
        let context = ctx(&terrain, prefs);
        assert_eq!(optimal_position(&context), Position::Defensive);
    }

    #[test]
    fn test_tie_breaks_to_enumeration_order() {
        let terrain = TerrainMap::uniform(Terrain::Open);
        let mut context = ctx(&terrain, &[]);
        context.current = Position::Aggressive;
        context.enemy_position = Position::Aggressive;
        context.action_points = 0;
        // Only the current position is reachable
        assert_eq!(optimal_position(&context), Position::Aggressive);

        // Flanks score identically; the left flank comes first
        context.current = Position::Center;
        context.enemy_position = Position::Center;
        context.action_points = 1;
        let left = score_position(&context, Position::FlankLeft);
        let right = score_position(&context, Position::FlankRight);
        assert_eq!(left, right);
        assert_eq!(optimal_position(&context), Position::FlankLeft);
    }
}
