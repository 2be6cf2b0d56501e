//! Gadget deployment, trigger processing and turn-end upkeep

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::definition::{GadgetEffect, GadgetTrigger};
use super::instance::{GadgetInstance, TriggerEvent};
use crate::combat::damage::{apply_damage, HitReport};
use crate::combat::state::CombatState;
use crate::combat::status::{StatusEffect, StatusKind, StatusSource};
use crate::core::error::{CombatError, Result};
use crate::core::types::{GadgetId, Side};
use crate::registry::Registry;

/// What one firing did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GadgetOutcome {
    Damaged(HitReport),
    Healed(i32),
    StatusApplied(StatusKind),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GadgetFiring {
    pub gadget: GadgetId,
    pub owner: Side,
    pub recipient: Side,
    pub outcome: GadgetOutcome,
    /// The instance used its last charge and was removed
    pub expired: bool,
}

/// Result of a successful deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub gadget: GadgetId,
    pub owner: Side,
    /// Present when the gadget fires on deployment
    pub immediate: Option<GadgetFiring>,
}

/// Deploy `gadget` for `owner` at the owner's current position
///
/// Rejections leave the state untouched.
pub fn deploy_gadget(
    state: &mut CombatState,
    registry: &Registry,
    owner: Side,
    gadget: &GadgetId,
) -> Result<Deployment> {
    let def = registry
        .gadget(gadget)
        .ok_or_else(|| CombatError::UnknownGadget(gadget.clone()))?;

    let deployer = state.combatant(owner);
    if deployer.statuses.is_disabled() {
        return Err(CombatError::ActorDisabled(owner));
    }
    let remaining = state.gadget_cooldowns.get(owner, gadget);
    if remaining > 0 {
        return Err(CombatError::GadgetOnCooldown {
            gadget: gadget.clone(),
            remaining,
        });
    }
    if !def.allows(deployer.position) {
        return Err(CombatError::PositionNotAllowed {
            gadget: gadget.clone(),
            position: deployer.position,
        });
    }

    let instance = GadgetInstance::deploy(def, owner, deployer.class, deployer.position);
    debug!(gadget = %gadget, ?owner, position = ?instance.position, "gadget deployed");
    state.gadgets.push(instance);
    state
        .gadget_cooldowns
        .set(owner, gadget.clone(), def.cooldown);

    let immediate = if def.trigger == GadgetTrigger::OnDeploy {
        let idx = state.gadgets.len() - 1;
        let mut firing = fire(state, idx, owner.opposing());
        // One-shot regardless of charges
        state.gadgets[idx].active = false;
        firing.expired = true;
        sweep_spent(state);
        Some(firing)
    } else {
        None
    };

    Ok(Deployment {
        gadget: gadget.clone(),
        owner,
        immediate,
    })
}

/// Fire every gadget owned by `side` that answers a phase boundary
pub fn process_phase_triggers(
    state: &mut CombatState,
    event: TriggerEvent,
    side: Side,
) -> Vec<GadgetFiring> {
    let target = side.opposing();
    let target_position = state.combatant(target).position;
    run_triggers(state, event, side, target, target_position)
}

/// Fire gadgets hostile to `mover` after it changes position
pub fn process_position_change(state: &mut CombatState, mover: Side) -> Vec<GadgetFiring> {
    let new_position = state.combatant(mover).position;
    run_triggers(
        state,
        TriggerEvent::PositionChange,
        mover.opposing(),
        mover,
        new_position,
    )
}

fn run_triggers(
    state: &mut CombatState,
    event: TriggerEvent,
    owner: Side,
    target: Side,
    target_position: crate::tactics::position::Position,
) -> Vec<GadgetFiring> {
    let mut firings = Vec::new();
    for idx in 0..state.gadgets.len() {
        let instance = &state.gadgets[idx];
        if instance.owner != owner || !instance.can_trigger(event, target_position) {
            continue;
        }
        firings.push(fire(state, idx, target));
        if state.defeated_side().is_some() {
            break;
        }
    }
    sweep_spent(state);
    firings
}

/// Apply one instance's payload and spend a charge
fn fire(state: &mut CombatState, idx: usize, target: Side) -> GadgetFiring {
    let (gadget, owner, effect, effect_duration) = {
        let instance = &state.gadgets[idx];
        (
            instance.gadget.clone(),
            instance.owner,
            instance.effect,
            instance.effect_duration,
        )
    };

    let (recipient, outcome) = match effect {
        GadgetEffect::Damage { amount } => {
            let terrain = state.terrain;
            let report = apply_damage(state.combatant_mut(target), &terrain, amount, false, None);
            (target, GadgetOutcome::Damaged(report))
        }
        GadgetEffect::Healing { amount } => {
            let healed = state.combatant_mut(owner).heal(amount);
            (owner, GadgetOutcome::Healed(healed))
        }
        GadgetEffect::Status { status, value } => {
            let recipient = if status.is_negative() { target } else { owner };
            let (magnitude, secondary) = value.map(|v| v.magnitudes()).unwrap_or((0, 0));
            state.combatant_mut(recipient).statuses.apply(
                StatusEffect::new(status, effect_duration, StatusSource::Gadget(gadget.clone()))
                    .with_magnitude(magnitude)
                    .with_secondary(secondary),
            );
            (recipient, GadgetOutcome::StatusApplied(status))
        }
    };

    let expired = state.gadgets[idx].consume();
    debug!(gadget = %gadget, ?recipient, ?outcome, expired, "gadget fired");
    GadgetFiring {
        gadget,
        owner,
        recipient,
        outcome,
        expired,
    }
}

fn sweep_spent(state: &mut CombatState) {
    state.gadgets.retain(|g| g.active);
}

/// Turn-end upkeep: count down redeploy cooldowns and re-arm gadgets
pub fn end_turn_upkeep(state: &mut CombatState) {
    state.gadget_cooldowns.tick();
    for instance in &mut state.gadgets {
        instance.triggered_this_turn = false;
    }
}
