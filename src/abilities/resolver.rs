//! Ability resolution
//!
//! Validation happens before anything is touched. Once an ability is
//! accepted every effect runs, effects that have nothing to act on become
//! no-ops, and the cooldown is always set.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::definition::{AbilityEffect, CoverAction, PositionShift};
use crate::combat::combatant::Combatant;
use crate::combat::cover::{Cover, CoverTier};
use crate::combat::damage::{apply_damage, hit_chance, strike, StrikeProfile};
use crate::combat::state::{CombatState, Drone};
use crate::combat::status::{StatusEffect, StatusKind, StatusSource};
use crate::core::config::CombatConfig;
use crate::core::error::{CombatError, Result};
use crate::core::rng::CombatRng;
use crate::core::types::{AbilityId, DamageType, Side};
use crate::registry::Registry;
use crate::tactics::position::Position;
use crate::tactics::scoring::{class_preferences, optimal_position, ScoringContext};

/// Everything an ability did, for logs and callers
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbilityOutcome {
    pub ability: Option<AbilityId>,
    pub actor: Side,
    pub target: Option<Side>,
    /// Damage dealt to the target after defense, before cover
    pub damage_dealt: i32,
    pub critical: bool,
    pub hits_attempted: u32,
    pub hits_landed: u32,
    pub healed: i32,
    pub cleansed: Vec<StatusKind>,
    pub statuses_applied: Vec<(Side, StatusKind)>,
    pub revealed: bool,
    pub drone_deployed: bool,
    pub self_damage: i32,
    pub escape_boost: i32,
    pub moved: Vec<(Side, Position)>,
    pub cover_changes: Vec<(Side, CoverTier)>,
    /// Effects that had nothing to act on
    pub no_ops: u32,
}

/// Check whether `actor` may use `ability` on `target` right now
pub fn validate_ability(
    state: &CombatState,
    registry: &Registry,
    actor: Side,
    ability: &AbilityId,
    target: Option<Side>,
) -> Result<()> {
    let user = state.combatant(actor);
    if registry.ability(ability).is_none() || !user.has_ability(ability) {
        return Err(CombatError::UnknownAbility(ability.clone()));
    }
    let remaining = user.cooldown(ability);
    if remaining > 0 {
        return Err(CombatError::AbilityOnCooldown {
            ability: ability.clone(),
            remaining,
        });
    }
    if user.statuses.is_disabled() {
        return Err(CombatError::ActorDisabled(actor));
    }
    if target == Some(actor) {
        return Err(CombatError::InvalidTarget(actor));
    }
    Ok(())
}

/// Resolve `ability` for `actor` against an optional target
pub fn resolve_ability(
    state: &mut CombatState,
    registry: &Registry,
    config: &CombatConfig,
    actor: Side,
    ability: &AbilityId,
    target: Option<Side>,
    rng: &mut dyn CombatRng,
) -> Result<AbilityOutcome> {
    validate_ability(state, registry, actor, ability, target)?;
    let def = registry
        .ability(ability)
        .ok_or_else(|| CombatError::UnknownAbility(ability.clone()))?;

    let mut outcome = AbilityOutcome {
        ability: Some(ability.clone()),
        actor,
        target,
        ..Default::default()
    };
    let source = StatusSource::Ability(ability.clone());
    let terrain = state.terrain;
    let zone = registry.zones().profile(state.aim_of(actor));

    for effect in def.ordered_effects() {
        if effect.needs_target() && target.is_none() {
            outcome.no_ops += 1;
            continue;
        }
        let (user, foe) = state.pair_mut(actor);

        match effect {
            AbilityEffect::Damage {
                multiplier,
                ignore_defense,
                damage_type,
            } => {
                let profile = StrikeProfile {
                    multiplier,
                    ignore_defense,
                    damage_type,
                    zone,
                    can_crit: true,
                };
                let report = strike(user, foe, &terrain, profile, config, rng);
                outcome.damage_dealt += report.damage.dealt;
                outcome.critical |= report.critical;
            }
            AbilityEffect::MultiHit {
                hits,
                damage_per_hit,
            } => {
                for _ in 0..hits {
                    outcome.hits_attempted += 1;
                    let chance = hit_chance(
                        config.multi_hit_base_chance,
                        user,
                        foe,
                        &terrain,
                        zone,
                        config,
                        true,
                    );
                    if rng.percent(chance) {
                        let report = apply_damage(
                            foe,
                            &terrain,
                            damage_per_hit,
                            false,
                            Some(DamageType::Physical),
                        );
                        outcome.hits_landed += 1;
                        outcome.damage_dealt += report.dealt;
                    }
                }
            }
            AbilityEffect::Heal { amount, cleanse } => {
                outcome.healed += user.heal(amount);
                if cleanse {
                    outcome.cleansed.extend(user.statuses.cleanse());
                }
            }
            AbilityEffect::Status {
                status,
                duration,
                magnitude,
                on_self,
            } => {
                let recipient = if on_self { user } else { foe };
                let duration = duration.unwrap_or_else(|| status.default_duration());
                recipient.statuses.apply(
                    StatusEffect::new(status, duration, source.clone()).with_magnitude(magnitude),
                );
                outcome.statuses_applied.push((recipient.side, status));
            }
            AbilityEffect::DefenseBoost { amount, duration } => {
                user.statuses.apply(
                    StatusEffect::new(StatusKind::DefenseBoost, duration, source.clone())
                        .with_magnitude(amount),
                );
                outcome
                    .statuses_applied
                    .push((actor, StatusKind::DefenseBoost));
            }
            AbilityEffect::RevealWeakness => {
                foe.analyzed = true;
                outcome.revealed = true;
            }
            AbilityEffect::Drone {
                damage_per_turn,
                duration,
            } => {
                state.drones.push(Drone {
                    owner: actor,
                    damage: damage_per_turn,
                    remaining: duration.max(1),
                });
                outcome.drone_deployed = true;
            }
            AbilityEffect::SelfDamage { amount } => {
                outcome.self_damage += user.lose_health(amount);
            }
            AbilityEffect::EscapeBoost { amount } => {
                let boost = user.statuses.escape_boost() + amount;
                user.statuses.apply(
                    StatusEffect::new(
                        StatusKind::EscapeBoost,
                        StatusKind::EscapeBoost.default_duration(),
                        source.clone(),
                    )
                    .with_magnitude(boost),
                );
                outcome.escape_boost += amount;
            }
            AbilityEffect::Position { shift } => {
                match shift_position(shift, user, foe, &terrain, rng) {
                    Some(moved) => outcome.moved.push(moved),
                    None => outcome.no_ops += 1,
                }
            }
            AbilityEffect::Cover { action } => {
                let (side, tier) = match action {
                    CoverAction::Damage { amount } => {
                        if foe.cover.is_up() {
                            foe.cover.wear(amount);
                        } else {
                            outcome.no_ops += 1;
                        }
                        (foe.side, foe.cover.tier)
                    }
                    CoverAction::Create { tier, health } => {
                        user.cover =
                            Cover::with_health(tier, health.unwrap_or_else(|| tier.default_health()));
                        (actor, user.cover.tier)
                    }
                    CoverAction::Boost { amount } => {
                        if user.cover.is_up() {
                            user.cover.reinforce(amount);
                        } else {
                            outcome.no_ops += 1;
                        }
                        (actor, user.cover.tier)
                    }
                };
                outcome.cover_changes.push((side, tier));
            }
            AbilityEffect::Unrecognized => {
                warn!(ability = %ability, "unrecognized effect kind skipped");
                outcome.no_ops += 1;
            }
        }
    }

    state
        .combatant_mut(actor)
        .set_cooldown(ability.clone(), def.cooldown);
    debug!(ability = %ability, ?actor, ?outcome, "ability resolved");
    Ok(outcome)
}

/// Apply a position shift; `None` when nobody ends up somewhere new
fn shift_position(
    shift: PositionShift,
    user: &mut Combatant,
    foe: &mut Combatant,
    terrain: &crate::tactics::terrain::TerrainMap,
    rng: &mut dyn CombatRng,
) -> Option<(Side, Position)> {
    let (mover, to) = match shift {
        PositionShift::Scramble => {
            let all = Position::all();
            (foe, all[rng.index(all.len())])
        }
        PositionShift::ForceCenter => (foe, Position::Center),
        PositionShift::CloseDistance => (user, Position::Aggressive),
        PositionShift::ImprovePosition => {
            let preferences = user.class.map(class_preferences).unwrap_or(&[]);
            let ctx = ScoringContext {
                current: user.position,
                enemy_position: foe.position,
                action_points: u32::MAX,
                terrain,
                class: user.class,
                preferences,
            };
            (user, optimal_position(&ctx))
        }
    };
    if mover.position == to {
        return None;
    }
    mover.position = to;
    Some((mover.side, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::FixedRolls;
    use crate::core::types::CharacterClass;
    use crate::tactics::terrain::Environment;

    fn state_with(abilities: &[&str]) -> CombatState {
        CombatState::new(
            Combatant::new("V", Side::Player, 30)
                .with_class(CharacterClass::Solo)
                .with_attack(6)
                .with_abilities(abilities.iter().map(|a| AbilityId::new(*a))),
            Combatant::new("Ganger", Side::Opponent, 40),
            Environment::Standard,
        )
    }

    #[test]
    fn test_unknown_ability_rejected_without_mutation() {
        let mut state = state_with(&["firewall"]);
        let registry = Registry::builtin().unwrap();
        let before = state.clone();
        let err = resolve_ability(
            &mut state,
            &registry,
            &CombatConfig::default(),
            Side::Player,
            &AbilityId::new("system_shock"),
            Some(Side::Opponent),
            &mut FixedRolls::always_succeed(),
        );
        assert_eq!(err, Err(CombatError::UnknownAbility(AbilityId::new("system_shock"))));
        assert_eq!(state, before);
    }

    #[test]
    fn test_cooldown_blocks_reuse() {
        let mut state = state_with(&["firewall"]);
        let registry = Registry::builtin().unwrap();
        let firewall = AbilityId::new("firewall");
        let mut rng = FixedRolls::always_succeed();
        resolve_ability(&mut state, &registry, &CombatConfig::default(), Side::Player, &firewall, Some(Side::Opponent), &mut rng)
            .unwrap();
        assert_eq!(state.player.cooldown(&firewall), 4);
        let err = resolve_ability(&mut state, &registry, &CombatConfig::default(), Side::Player, &firewall, Some(Side::Opponent), &mut rng);
        assert!(matches!(err, Err(CombatError::AbilityOnCooldown { remaining: 4, .. })));
    }

    #[test]
    fn test_self_target_invalid() {
        let mut state = state_with(&["precision_shot"]);
        let registry = Registry::builtin().unwrap();
        let err = resolve_ability(
            &mut state,
            &registry,
            &CombatConfig::default(),
            Side::Player,
            &AbilityId::new("precision_shot"),
            Some(Side::Player),
            &mut FixedRolls::always_succeed(),
        );
        assert_eq!(err, Err(CombatError::InvalidTarget(Side::Player)));
    }

    #[test]
    fn test_no_target_still_consumes_cooldown() {
        let mut state = state_with(&["precision_shot"]);
        let registry = Registry::builtin().unwrap();
        let shot = AbilityId::new("precision_shot");
        let outcome = resolve_ability(
            &mut state,
            &registry,
            &CombatConfig::default(),
            Side::Player,
            &shot,
            None,
            &mut FixedRolls::always_succeed(),
        )
        .unwrap();
        assert_eq!(outcome.damage_dealt, 0);
        assert!(outcome.no_ops > 0);
        assert_eq!(state.opponent.health(), 40);
        assert_eq!(state.player.cooldown(&shot), 3);
    }

    #[test]
    fn test_overcharge_damage_then_self_damage() {
        let mut state = state_with(&["overcharge"]);
        let registry = Registry::builtin().unwrap();
        let outcome = resolve_ability(
            &mut state,
            &registry,
            &CombatConfig::default(),
            Side::Player,
            &AbilityId::new("overcharge"),
            Some(Side::Opponent),
            &mut FixedRolls::always_succeed(),
        )
        .unwrap();
        // 6 * 1.8 = 10.8 -> 11, crit on a roll of 1 -> 16
        assert_eq!(outcome.damage_dealt, 16);
        assert_eq!(outcome.self_damage, 3);
        assert_eq!(state.player.health(), 27);
    }

    #[test]
    fn test_disabled_actor_rejected() {
        let mut state = state_with(&["firewall"]);
        state.player.statuses.apply(StatusEffect::new(
            StatusKind::Disabled,
            1,
            StatusSource::Attack,
        ));
        let registry = Registry::builtin().unwrap();
        let err = resolve_ability(
            &mut state,
            &registry,
            &CombatConfig::default(),
            Side::Player,
            &AbilityId::new("firewall"),
            Some(Side::Opponent),
            &mut FixedRolls::always_succeed(),
        );
        assert_eq!(err, Err(CombatError::ActorDisabled(Side::Player)));
    }

    #[test]
    fn test_street_medicine_heals_and_cleanses() {
        let mut state = state_with(&["street_medicine"]);
        state.player.lose_health(20);
        state.player.statuses.apply(StatusEffect::new(
            StatusKind::Bleeding,
            3,
            StatusSource::Attack,
        ));
        let registry = Registry::builtin().unwrap();
        let outcome = resolve_ability(
            &mut state,
            &registry,
            &CombatConfig::default(),
            Side::Player,
            &AbilityId::new("street_medicine"),
            Some(Side::Opponent),
            &mut FixedRolls::always_succeed(),
        )
        .unwrap();
        assert_eq!(outcome.healed, 15);
        assert_eq!(outcome.cleansed, vec![StatusKind::Bleeding]);
        assert_eq!(state.player.health(), 25);
    }

    #[test]
    fn test_cover_damage_without_cover_is_no_op() {
        let mut state = state_with(&["breaching_charge"]);
        let registry = Registry::builtin().unwrap();
        let charge = AbilityId::new("breaching_charge");
        let mut rng = FixedRolls::always_succeed();
        let bare = resolve_ability(&mut state, &registry, &CombatConfig::default(), Side::Player, &charge, Some(Side::Opponent), &mut rng)
            .unwrap();
        assert_eq!(bare.no_ops, 1);

        let mut state = state_with(&["breaching_charge"]);
        state.opponent.cover = Cover::with_health(CoverTier::Full, 40);
        let covered = resolve_ability(&mut state, &registry, &CombatConfig::default(), Side::Player, &charge, Some(Side::Opponent), &mut rng)
            .unwrap();
        assert_eq!(covered.no_ops, 0);
        assert!(state.opponent.cover.health() < 40 - 6);
    }

    #[test]
    fn test_shift_onto_same_slot_is_not_a_move() {
        let mut state = state_with(&["hook_pull"]);
        assert_eq!(state.opponent.position, Position::Center);
        let registry = Registry::builtin().unwrap();
        let outcome = resolve_ability(
            &mut state,
            &registry,
            &CombatConfig::default(),
            Side::Player,
            &AbilityId::new("hook_pull"),
            Some(Side::Opponent),
            &mut FixedRolls::always_succeed(),
        )
        .unwrap();
        assert!(outcome.moved.is_empty());
        assert_eq!(outcome.no_ops, 1);

        let mut state = state_with(&["hook_pull"]);
        state.opponent.position = Position::FlankRight;
        let outcome = resolve_ability(
            &mut state,
            &registry,
            &CombatConfig::default(),
            Side::Player,
            &AbilityId::new("hook_pull"),
            Some(Side::Opponent),
            &mut FixedRolls::always_succeed(),
        )
        .unwrap();
        assert_eq!(outcome.moved, vec![(Side::Opponent, Position::Center)]);
    }
}
