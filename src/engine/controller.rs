//! Combat turn controller
//!
//! Drives an encounter through its phases:
//! PlayerTurn -> ActionLoop -> EnemyTurn -> Resolution -> PlayerTurn, until
//! a side drops, the player escapes, or the optional turn ceiling is hit.
//! Termination is checked after every action and every batch of
//! effects; once it fires nothing else resolves.

use std::sync::Arc;
use tracing::{debug, info};

use super::action::{ActionReport, CombatAction, EscapeReport};
use super::decision::{DecisionContext, DecisionSource};
use super::events::{CombatEvent, CombatEventType, EventSink};
use super::opponent::OpponentAi;
use super::phase::{CombatOutcome, TurnPhase};
use crate::abilities::resolver::resolve_ability;
use crate::combat::cover::{cover_search_chance, Cover, CoverTier};
use crate::combat::damage::{apply_damage, preferred_damage_type, strike, StrikeProfile};
use crate::combat::record::CombatantRecord;
use crate::combat::state::CombatState;
use crate::combat::status::{StatusEffect, StatusKind, StatusSource};
use crate::core::config::CombatConfig;
use crate::core::error::{CombatError, Result};
use crate::core::rng::{CombatRng, SeededRng};
use crate::core::types::Side;
use crate::gadgets::instance::TriggerEvent;
use crate::gadgets::system::{
    deploy_gadget, end_turn_upkeep, process_phase_triggers, process_position_change,
    GadgetFiring, GadgetOutcome,
};
use crate::registry::Registry;
use crate::tactics::modifiers::movement_cost;
use crate::tactics::terrain::TerrainSpecial;

pub struct TurnController<R: CombatRng = SeededRng> {
    state: CombatState,
    registry: Arc<Registry>,
    config: CombatConfig,
    rng: R,
    phase: TurnPhase,
    action_points: u32,
    opponent_ai: OpponentAi,
    started: bool,
}

impl<R: CombatRng> TurnController<R> {
    pub fn new(state: CombatState, registry: Arc<Registry>, config: CombatConfig, rng: R) -> Self {
        Self {
            state,
            registry,
            config,
            rng,
            phase: TurnPhase::PlayerTurn,
            action_points: 0,
            opponent_ai: OpponentAi,
            started: false,
        }
    }

    pub fn state(&self) -> &CombatState {
        &self.state
    }

    /// Direct state access for setting up scenarios
    pub fn state_mut(&mut self) -> &mut CombatState {
        &mut self.state
    }

    pub fn into_state(self) -> CombatState {
        self.state
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<CombatOutcome> {
        self.phase.outcome()
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn action_points(&self) -> u32 {
        self.action_points
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Run full turns until the encounter ends
    ///
    /// Without a turn ceiling this only returns once a side drops or the
    /// player escapes.
    pub fn run(
        &mut self,
        decisions: &mut dyn DecisionSource,
        sink: &mut dyn EventSink,
    ) -> CombatOutcome {
        loop {
            if let Some(outcome) = self.run_turn(decisions, sink).outcome() {
                return outcome;
            }
        }
    }

    /// Run one full turn: player phase, opponent phase, resolution
    pub fn run_turn(
        &mut self,
        decisions: &mut dyn DecisionSource,
        sink: &mut dyn EventSink,
    ) -> TurnPhase {
        if self.is_finished() {
            return self.phase;
        }
        if !self.started {
            self.started = true;
            let description = format!(
                "{} faces {} in the {:?}",
                self.state.player.name, self.state.opponent.name, self.state.environment
            );
            info!(turn = self.state.turn, "{}", description);
            self.log_event(sink, CombatEventType::EncounterStarted, description);
        }

        // ===== PHASE 1: PLAYER =====
        self.phase = TurnPhase::PlayerTurn;
        if self.phase_side(Side::Player, Some(decisions), sink) {
            return self.phase;
        }

        // ===== PHASE 2: OPPONENT =====
        // Statuses landing on the player from here on survive this turn's resolution
        self.state.player.statuses.settle();
        self.phase = TurnPhase::EnemyTurn;
        if self.phase_side(Side::Opponent, None, sink) {
            return self.phase;
        }

        // ===== PHASE 3: RESOLUTION =====
        self.phase = TurnPhase::Resolution;
        self.phase_resolution(sink);
        self.phase
    }

    /// One side's phase. Returns true if the encounter ended.
    fn phase_side(
        &mut self,
        side: Side,
        decisions: Option<&mut dyn DecisionSource>,
        sink: &mut dyn EventSink,
    ) -> bool {
        self.action_points = self.config.action_points_per_turn;
        self.log_event(
            sink,
            CombatEventType::PhaseStarted { side },
            format!("{} phase begins", self.state.combatant(side).name),
        );

        let acts = self.phase_start(side, sink);
        if self.check_end(sink) {
            return true;
        }

        if acts {
            if side == Side::Player {
                self.phase = TurnPhase::ActionLoop;
            }
            self.action_loop(side, decisions, sink);
            if self.is_finished() || self.check_end(sink) {
                return true;
            }
        }

        let firings = process_phase_triggers(&mut self.state, TriggerEvent::TurnEnd, side);
        self.log_firings(sink, &firings);
        self.action_points = 0;
        self.check_end(sink)
    }

    /// Start-of-phase effects. Returns false if the side loses its actions.
    fn phase_start(&mut self, side: Side, sink: &mut dyn EventSink) -> bool {
        // Terrain
        let position = self.state.combatant(side).position;
        if self
            .state
            .terrain
            .at(position)
            .has_special(TerrainSpecial::DamagePerTurn)
        {
            let amount = self
                .rng
                .range_inclusive(self.config.hazard_damage_min, self.config.hazard_damage_max);
            let lost = self.state.combatant_mut(side).lose_health(amount);
            let description = format!(
                "{} takes {} hazard damage",
                self.state.combatant(side).name,
                lost
            );
            self.log_event(
                sink,
                CombatEventType::TerrainDamage { side, amount: lost },
                description,
            );
            if self.state.defeated_side().is_some() {
                return false;
            }
        }

        // Damage over time
        let bleed = self.state.combatant(side).statuses.periodic_damage();
        if bleed > 0 {
            let lost = self.state.combatant_mut(side).lose_health(bleed);
            let description = format!("{} bleeds for {}", self.state.combatant(side).name, lost);
            self.log_event(
                sink,
                CombatEventType::StatusDamage {
                    side,
                    status: StatusKind::Bleeding,
                    amount: lost,
                },
                description,
            );
            if self.state.defeated_side().is_some() {
                return false;
            }
        }

        // Drones
        let terrain = self.state.terrain;
        let mut strikes = Vec::new();
        for idx in 0..self.state.drones.len() {
            if self.state.drones[idx].owner != side {
                continue;
            }
            let damage = self.state.drones[idx].damage;
            let report = apply_damage(
                self.state.combatant_mut(side.opposing()),
                &terrain,
                damage,
                false,
                None,
            );
            self.state.drones[idx].remaining = self.state.drones[idx].remaining.saturating_sub(1);
            strikes.push(report.dealt);
            if self.state.defeated_side().is_some() {
                break;
            }
        }
        self.state.drones.retain(|d| d.remaining > 0);
        for dealt in strikes {
            self.log_event(
                sink,
                CombatEventType::DroneStrike {
                    owner: side,
                    damage: dealt,
                },
                format!("Drone strikes for {}", dealt),
            );
        }
        if self.state.defeated_side().is_some() {
            return false;
        }

        // Gadgets
        let firings = process_phase_triggers(&mut self.state, TriggerEvent::TurnStart, side);
        self.log_firings(sink, &firings);
        if self.state.defeated_side().is_some() {
            return false;
        }

        if self.state.combatant(side).statuses.is_stunned() {
            let description = format!("{} is stunned and loses the turn", self.state.combatant(side).name);
            self.log_event(sink, CombatEventType::TurnSkipped { side }, description);
            return false;
        }
        true
    }

    fn action_loop(
        &mut self,
        side: Side,
        mut decisions: Option<&mut dyn DecisionSource>,
        sink: &mut dyn EventSink,
    ) {
        // Consecutive actions that spent nothing, rejected or free
        let mut stalls = 0;
        while self.action_points > 0 && stalls < self.config.max_rejected_actions {
            let action = {
                let ctx = DecisionContext {
                    state: &self.state,
                    registry: &self.registry,
                    side,
                    action_points: self.action_points,
                };
                match decisions.as_deref_mut() {
                    Some(source) => source.next_action(&ctx),
                    None => self.opponent_ai.choose(&ctx, &mut self.rng),
                }
            };
            if action == CombatAction::EndTurn {
                break;
            }

            let before = self.action_points;
            match self.perform(side, action.clone(), sink) {
                Ok(ActionReport::Escape(_)) => break,
                Ok(_) if self.action_points < before => stalls = 0,
                Ok(_) => stalls += 1,
                Err(error) => {
                    stalls += 1;
                    debug!(?side, ?action, %error, "action rejected");
                    self.log_event(
                        sink,
                        CombatEventType::ActionRejected {
                            side,
                            reason: error.to_string(),
                        },
                        format!("{:?} rejected: {}", action, error),
                    );
                    if let Some(source) = decisions.as_deref_mut() {
                        source.rejected(&action, &error);
                    }
                }
            }

            if self.is_finished() || self.check_end(sink) {
                return;
            }
        }
    }

    /// Validate and apply one action for `side`, spending its action points
    ///
    /// A rejected action changes nothing and costs nothing.
    pub fn perform(
        &mut self,
        side: Side,
        action: CombatAction,
        sink: &mut dyn EventSink,
    ) -> Result<ActionReport> {
        let cost = self.action_cost(side, &action)?;
        if cost > self.action_points {
            return Err(CombatError::InsufficientActionPoints {
                required: cost,
                available: self.action_points,
            });
        }

        let report = match action {
            CombatAction::Move(to) => self.do_move(side, to, cost, sink),
            CombatAction::Attack => self.do_attack(side, sink),
            CombatAction::UseAbility(ability) => {
                let target = Some(side.opposing());
                let outcome = resolve_ability(
                    &mut self.state,
                    &self.registry,
                    &self.config,
                    side,
                    &ability,
                    target,
                    &mut self.rng,
                )?;
                let description = format!(
                    "{} uses {} ({} damage, {} healed)",
                    self.state.combatant(side).name,
                    ability,
                    outcome.damage_dealt,
                    outcome.healed
                );
                self.log_event(
                    sink,
                    CombatEventType::AbilityUsed {
                        side,
                        ability: ability.clone(),
                    },
                    description,
                );
                let mut firings = Vec::new();
                for (moved, _) in &outcome.moved {
                    firings.extend(process_position_change(&mut self.state, *moved));
                }
                self.log_firings(sink, &firings);
                ActionReport::Ability { outcome, firings }
            }
            CombatAction::DeployGadget(gadget) => {
                let deployment = deploy_gadget(&mut self.state, &self.registry, side, &gadget)?;
                let description = format!(
                    "{} deploys {} at {}",
                    self.state.combatant(side).name,
                    gadget,
                    self.state.combatant(side).position.label()
                );
                self.log_event(
                    sink,
                    CombatEventType::GadgetDeployed {
                        side,
                        gadget: gadget.clone(),
                    },
                    description,
                );
                if let Some(firing) = &deployment.immediate {
                    self.log_firings(sink, std::slice::from_ref(firing));
                }
                ActionReport::Gadget(deployment)
            }
            CombatAction::TakeCover(tier) => self.do_take_cover(side, tier, sink),
            CombatAction::SetTargetZone(zone) => {
                self.state.target_zone = zone;
                self.log_event(
                    sink,
                    CombatEventType::TargetZoneChanged,
                    format!("Aiming at {:?}", zone),
                );
                ActionReport::TargetZone(zone)
            }
            CombatAction::Escape => ActionReport::Escape(self.do_escape(sink)),
            CombatAction::EndTurn => {
                self.action_points = 0;
                return Ok(ActionReport::EndedTurn);
            }
        };

        self.action_points = self.action_points.saturating_sub(cost);
        if matches!(report, ActionReport::Escape(_)) {
            self.action_points = 0;
        }
        Ok(report)
    }

    /// Cost of an action, or the reason it can never be taken right now
    fn action_cost(&self, side: Side, action: &CombatAction) -> Result<u32> {
        let me = self.state.combatant(side);
        match action {
            CombatAction::Move(to) => {
                if *to == me.position {
                    return Err(CombatError::UnreachablePosition {
                        from: me.position,
                        to: *to,
                    });
                }
                Ok(movement_cost(
                    me.position,
                    *to,
                    self.state.terrain.at(me.position),
                ))
            }
            CombatAction::TakeCover(tier) => {
                if !tier.available_on(self.state.terrain.at(me.position)) {
                    return Err(CombatError::CoverUnavailable(*tier));
                }
                Ok(action.flat_cost())
            }
            CombatAction::SetTargetZone(_) | CombatAction::Escape if side != Side::Player => {
                Err(CombatError::InvalidTarget(side))
            }
            _ => Ok(action.flat_cost()),
        }
    }

    fn do_move(
        &mut self,
        side: Side,
        to: crate::tactics::position::Position,
        cost: u32,
        sink: &mut dyn EventSink,
    ) -> ActionReport {
        let mover = self.state.combatant_mut(side);
        let from = mover.position;
        mover.position = to;
        let description = format!("{} moves from {} to {}", mover.name, from.label(), to.label());
        self.log_event(
            sink,
            CombatEventType::Moved {
                side,
                from,
                to,
                cost,
            },
            description,
        );

        let firings = process_position_change(&mut self.state, side);
        self.log_firings(sink, &firings);
        ActionReport::Moved {
            from,
            to,
            cost,
            firings,
        }
    }

    fn do_attack(&mut self, side: Side, sink: &mut dyn EventSink) -> ActionReport {
        let terrain = self.state.terrain;
        let zone = self.registry.zones().profile(self.state.aim_of(side));
        let damage_type = preferred_damage_type(self.state.combatant(side.opposing()));
        let profile = StrikeProfile::basic(damage_type, zone);

        let (attacker, defender) = self.state.pair_mut(side);
        let report = strike(attacker, defender, &terrain, profile, &self.config, &mut self.rng);

        let mut bleeding = false;
        if report.landed
            && side == Side::Player
            && !defender.is_defeated()
            && self.rng.percent(self.config.basic_bleed_chance)
        {
            defender.statuses.apply(StatusEffect::new(
                StatusKind::Bleeding,
                StatusKind::Bleeding.default_duration(),
                StatusSource::Attack,
            ));
            bleeding = true;
        }

        let description = if report.landed {
            format!(
                "{} hits {} for {}{}",
                attacker.name,
                defender.name,
                report.damage.dealt,
                if report.critical { " (critical)" } else { "" }
            )
        } else {
            format!("{} misses {}", attacker.name, defender.name)
        };
        let defender_name = defender.name.clone();
        self.log_event(
            sink,
            CombatEventType::Attacked {
                side,
                landed: report.landed,
                critical: report.critical,
                damage: report.damage.dealt,
            },
            description,
        );
        if report.damage.cover_destroyed {
            self.log_event(
                sink,
                CombatEventType::CoverDestroyed {
                    side: side.opposing(),
                },
                format!("{}'s cover is destroyed", defender_name),
            );
        }
        if bleeding {
            self.log_event(
                sink,
                CombatEventType::BleedingInflicted {
                    side: side.opposing(),
                },
                format!("{} is bleeding", defender_name),
            );
        }

        ActionReport::Attacked {
            strike: report,
            bleeding,
        }
    }

    fn do_take_cover(&mut self, side: Side, tier: CoverTier, sink: &mut dyn EventSink) -> ActionReport {
        let intelligence = self.state.combatant(side).stats.intelligence;
        let chance = cover_search_chance(tier, intelligence);
        let found = self.rng.percent(chance);
        let me = self.state.combatant_mut(side);
        let (event_type, description) = if found {
            me.cover = Cover::new(tier);
            (
                CombatEventType::CoverTaken { side, tier },
                format!("{} takes {:?} cover", me.name, tier),
            )
        } else {
            (
                CombatEventType::CoverSearchFailed { side, tier },
                format!("{} finds no {:?} cover", me.name, tier),
            )
        };
        self.log_event(sink, event_type, description);
        ActionReport::Cover { tier, found }
    }

    fn do_escape(&mut self, sink: &mut dyn EventSink) -> EscapeReport {
        let player = &self.state.player;
        let chance = self
            .config
            .escape_chance(player.stats.reflex, player.statuses.escape_boost());
        let success = self.rng.percent(chance);
        let mut report = EscapeReport {
            chance,
            success,
            ..Default::default()
        };

        if success {
            let cost = (self.state.player.max_health()
                * self.config.escape_health_cost_percent as i32
                / 100)
                .max(1);
            let affordable = (self.state.player.health() - 1).max(0);
            report.health_lost = self.state.player.lose_health(cost.min(affordable));

            if !self.state.player.items.is_empty()
                && self.rng.percent(self.config.escape_item_loss_chance)
            {
                let idx = self.rng.index(self.state.player.items.len());
                report.item_lost = Some(self.state.player.items.remove(idx));
            }
            self.phase = TurnPhase::Escaped;
        } else {
            self.state.player.cover.clear();
        }

        let description = if success {
            format!("Escape succeeds ({}% chance)", chance)
        } else {
            format!("Escape fails ({}% chance), cover abandoned", chance)
        };
        info!(chance, success, "escape attempt");
        self.log_event(
            sink,
            CombatEventType::EscapeAttempted { chance, success },
            description,
        );
        if success {
            self.log_event(
                sink,
                CombatEventType::EncounterEnded {
                    outcome: CombatOutcome::Escaped,
                },
                "Player escaped".to_string(),
            );
        }
        report
    }

    /// Status durations, cooldowns and gadget upkeep, then advance the turn
    fn phase_resolution(&mut self, sink: &mut dyn EventSink) {
        for side in [Side::Player, Side::Opponent] {
            let combatant = self.state.combatant_mut(side);
            let expired = match side {
                Side::Player => combatant.statuses.tick_settled(),
                Side::Opponent => combatant.statuses.tick(),
            };
            combatant.tick_cooldowns();
            let name = combatant.name.clone();
            for status in expired {
                self.log_event(
                    sink,
                    CombatEventType::StatusExpired { side, status },
                    format!("{}'s {:?} wears off", name, status),
                );
            }
        }
        end_turn_upkeep(&mut self.state);

        let finished_turn = self.state.turn;
        self.log_event(
            sink,
            CombatEventType::TurnEnded,
            format!("Turn {} ends", finished_turn),
        );
        self.state.turn += 1;

        if let Some(limit) = self.config.max_turns {
            if finished_turn >= limit {
                self.end(CombatOutcome::TurnLimit, sink);
                return;
            }
        }
        self.phase = TurnPhase::PlayerTurn;
    }

    /// Move to a terminal phase if a side has dropped
    fn check_end(&mut self, sink: &mut dyn EventSink) -> bool {
        if self.is_finished() {
            return true;
        }
        match self.state.defeated_side() {
            Some(Side::Player) => self.end(CombatOutcome::Defeat, sink),
            Some(Side::Opponent) => self.end(CombatOutcome::Victory, sink),
            None => return false,
        }
        true
    }

    fn end(&mut self, outcome: CombatOutcome, sink: &mut dyn EventSink) {
        self.phase = TurnPhase::from(outcome);
        self.action_points = 0;
        info!(turn = self.state.turn, ?outcome, "encounter ended");
        self.log_event(
            sink,
            CombatEventType::EncounterEnded { outcome },
            format!("Encounter ends: {:?}", outcome),
        );
    }

    /// Push final health, statuses and lost items back into the records
    pub fn write_back(&self, player: &mut dyn CombatantRecord, opponent: &mut dyn CombatantRecord) {
        self.state.player.write_back(player);
        self.state.opponent.write_back(opponent);
    }

    fn log_firings(&self, sink: &mut dyn EventSink, firings: &[GadgetFiring]) {
        for firing in firings {
            let what = match firing.outcome {
                GadgetOutcome::Damaged(hit) => format!("{} damage", hit.dealt),
                GadgetOutcome::Healed(amount) => format!("{} healing", amount),
                GadgetOutcome::StatusApplied(status) => format!("{:?}", status),
            };
            self.log_event(
                sink,
                CombatEventType::GadgetFired {
                    owner: firing.owner,
                    gadget: firing.gadget.clone(),
                    recipient: firing.recipient,
                },
                format!("{} fires on {}: {}", firing.gadget, firing.recipient, what),
            );
            if firing.expired {
                self.log_event(
                    sink,
                    CombatEventType::GadgetExpired {
                        owner: firing.owner,
                        gadget: firing.gadget.clone(),
                    },
                    format!("{} is spent", firing.gadget),
                );
            }
        }
    }

    fn log_event(&self, sink: &mut dyn EventSink, event_type: CombatEventType, description: String) {
        debug!(turn = self.state.turn, ?event_type, "{}", description);
        sink.record(CombatEvent {
            turn: self.state.turn,
            event_type,
            description,
        });
    }
}
