//! Combat integration tests
//!
//! Drives full encounters through the turn controller with pinned rolls
//! and checks the worked examples end to end.

use std::sync::Arc;

use neon_tactics::combat::{
    apply_damage, Combatant, CombatState, Cover, CoverTier, StatusEffect, StatusKind, StatusSource,
};
use neon_tactics::core::{
    AbilityId, CharacterClass, CombatConfig, CombatError, FixedRolls, GadgetId, SeededRng, Side,
};
use neon_tactics::engine::{
    AutoPilot, CombatAction, CombatEventType, CombatLog, CombatOutcome, NullSink,
    ScriptedDecisions, TurnController, TurnPhase,
};
use neon_tactics::registry::Registry;
use neon_tactics::tactics::{flanking_bonus, Environment, Position, Terrain, TerrainMap};

fn registry() -> Arc<Registry> {
    Registry::shared().expect("builtin content loads")
}

fn duel(player: Combatant, opponent: Combatant) -> CombatState {
    CombatState::new(player, opponent, Environment::Standard)
}

#[test]
fn test_aggressive_on_defensive_is_best_flank() {
    let best = flanking_bonus(Position::Aggressive, Position::Defensive);
    assert_eq!(best, 25);
    for attacker in Position::all() {
        for defender in Position::all() {
            assert!(flanking_bonus(attacker, defender) <= best);
        }
    }
}

/// Redeploy is blocked the turn after deployment and open the turn after that
#[test]
fn test_gadget_cooldown_across_turns() {
    let state = duel(
        Combatant::new("V", Side::Player, 30),
        Combatant::new("Ganger", Side::Opponent, 30),
    );
    let mut controller = TurnController::new(
        state,
        registry(),
        CombatConfig::default(),
        FixedRolls::always_fail(),
    );
    let mine = GadgetId::new("proximity_mine");
    let mut script = ScriptedDecisions::new([
        CombatAction::DeployGadget(mine.clone()),
        CombatAction::EndTurn,
        CombatAction::DeployGadget(mine.clone()),
        CombatAction::EndTurn,
        CombatAction::DeployGadget(mine.clone()),
        CombatAction::EndTurn,
    ]);
    let mut log = CombatLog::new();
    for _ in 0..3 {
        controller.run_turn(&mut script, &mut log);
    }

    assert_eq!(
        script.rejections(),
        &[CombatError::GadgetOnCooldown {
            gadget: mine.clone(),
            remaining: 1
        }]
    );
    let deploy_turns: Vec<u32> = log
        .filter(|t| matches!(t, CombatEventType::GadgetDeployed { side: Side::Player, .. }))
        .map(|e| e.turn)
        .collect();
    assert_eq!(deploy_turns, vec![1, 3]);
}

#[test]
fn test_multi_hit_with_forced_hits() {
    let state = duel(
        Combatant::new("V", Side::Player, 30)
            .with_class(CharacterClass::Solo)
            .with_abilities([AbilityId::new("rapid_fire")]),
        Combatant::new("Ganger", Side::Opponent, 30),
    );
    let mut controller = TurnController::new(
        state,
        registry(),
        CombatConfig::default(),
        FixedRolls::always_succeed(),
    );
    let mut script = ScriptedDecisions::new([CombatAction::UseAbility(AbilityId::new("rapid_fire"))]);
    let mut log = CombatLog::new();
    controller.run_turn(&mut script, &mut log);

    let used: Vec<_> = log
        .filter(|t| matches!(t, CombatEventType::AbilityUsed { .. }))
        .collect();
    assert_eq!(used.len(), 1);
    let state = controller.state();
    // Three flat hits of 4 against zero defense
    assert_eq!(state.opponent.health(), 30 - 12);
    // Set to 4 on use, one resolution tick since
    assert_eq!(state.player.cooldown(&AbilityId::new("rapid_fire")), 3);
}

#[test]
fn test_cover_breaks_and_spills_over() {
    let mut defender = Combatant::new("Ganger", Side::Opponent, 20);
    defender.cover = Cover::new(CoverTier::Medium);
    assert_eq!(defender.cover.health(), 5);

    let terrain = TerrainMap::uniform(Terrain::Open);
    let hit = apply_damage(&mut defender, &terrain, 8, false, None);

    assert_eq!(hit.absorbed, 5);
    assert!(hit.cover_destroyed);
    assert_eq!(defender.cover.health(), 0);
    assert_eq!(defender.cover.tier, CoverTier::None);
    assert_eq!(defender.health(), 17);
}

#[test]
fn test_lethal_attack_ends_encounter_immediately() {
    let state = duel(
        Combatant::new("V", Side::Player, 30).with_attack(6),
        Combatant::new("Ganger", Side::Opponent, 1),
    );
    let mut controller = TurnController::new(
        state,
        registry(),
        CombatConfig::default(),
        FixedRolls::always_succeed(),
    );
    let mut script = ScriptedDecisions::new([CombatAction::Attack, CombatAction::Attack]);
    let mut log = CombatLog::new();
    let phase = controller.run_turn(&mut script, &mut log);

    assert_eq!(phase, TurnPhase::Victory);
    assert_eq!(controller.outcome(), Some(CombatOutcome::Victory));
    assert_eq!(script.remaining(), 1);
    assert!(matches!(
        log.events.last().map(|e| &e.event_type),
        Some(CombatEventType::EncounterEnded {
            outcome: CombatOutcome::Victory
        })
    ));
    // Nothing more happens once finished
    let after = log.len();
    assert_eq!(controller.run_turn(&mut script, &mut log), TurnPhase::Victory);
    assert_eq!(log.len(), after);
}

#[test]
fn test_bleeding_out_before_acting_is_defeat() {
    let mut player = Combatant::new("V", Side::Player, 10);
    player.lose_health(9);
    player
        .statuses
        .apply(StatusEffect::new(StatusKind::Bleeding, 3, StatusSource::Attack));
    let mut controller = TurnController::new(
        duel(player, Combatant::new("Ganger", Side::Opponent, 10)),
        registry(),
        CombatConfig::default(),
        FixedRolls::always_succeed(),
    );
    let mut script = ScriptedDecisions::new([CombatAction::Attack]);
    assert_eq!(controller.run_turn(&mut script, &mut NullSink), TurnPhase::Defeat);
    assert_eq!(script.remaining(), 1);
    assert_eq!(controller.state().opponent.health(), 10);
}

#[test]
fn test_rejected_action_costs_nothing() {
    let mut controller = TurnController::new(
        duel(
            Combatant::new("V", Side::Player, 30).with_attack(3),
            Combatant::new("Ganger", Side::Opponent, 30),
        ),
        registry(),
        CombatConfig::default(),
        FixedRolls::always_succeed(),
    );
    let mut script = ScriptedDecisions::new([
        CombatAction::UseAbility(AbilityId::new("rapid_fire")),
        CombatAction::Attack,
        CombatAction::Attack,
    ]);
    let mut log = CombatLog::new();
    controller.run_turn(&mut script, &mut log);

    assert_eq!(
        script.rejections(),
        &[CombatError::UnknownAbility(AbilityId::new("rapid_fire"))]
    );
    let attacks = log
        .filter(|t| matches!(t, CombatEventType::Attacked { side: Side::Player, .. }))
        .count();
    assert_eq!(attacks, 2);
}

#[test]
fn test_move_reports_cost() {
    let mut controller = TurnController::new(
        duel(
            Combatant::new("V", Side::Player, 30),
            Combatant::new("Ganger", Side::Opponent, 30),
        ),
        registry(),
        CombatConfig::default(),
        FixedRolls::always_fail(),
    );
    let mut script = ScriptedDecisions::new([CombatAction::Move(Position::FlankLeft)]);
    let mut log = CombatLog::new();
    controller.run_turn(&mut script, &mut log);
    assert_eq!(controller.state().player.position, Position::FlankLeft);
    assert!(log
        .filter(|t| matches!(
            t,
            CombatEventType::Moved {
                side: Side::Player,
                from: Position::Center,
                to: Position::FlankLeft,
                cost: 1
            }
        ))
        .next()
        .is_some());
}

#[test]
fn test_seeded_autopilot_encounter_finishes() {
    let reg = registry();
    let template = reg.enemy("street_thug").expect("street_thug exists");
    let enemy = template.spawn();
    let player = Combatant::new("V", Side::Player, 30)
        .with_class(CharacterClass::Solo)
        .with_attack(5)
        .with_abilities(reg.class_abilities(CharacterClass::Solo));
    let state = CombatState::new(
        player,
        Combatant::from_record(&enemy, Side::Opponent),
        Environment::Street,
    );
    let config = CombatConfig::default().with_max_turns(50);

    let mut first = TurnController::new(state.clone(), reg.clone(), config.clone(), SeededRng::new(7));
    let mut second = TurnController::new(state, reg, config, SeededRng::new(7));
    let mut log_a = CombatLog::new();
    let mut log_b = CombatLog::new();
    let a = first.run(&mut AutoPilot::new(), &mut log_a);
    let b = second.run(&mut AutoPilot::new(), &mut log_b);

    assert_eq!(a, b);
    assert_eq!(log_a.events, log_b.events);
    assert_eq!(first.state(), second.state());
}
