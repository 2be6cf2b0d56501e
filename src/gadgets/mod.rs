//! Deployable gadgets: definitions, live instances and trigger processing

pub mod definition;
pub mod instance;
pub mod system;

pub use definition::{ClassBonus, EffectValue, GadgetDef, GadgetEffect, GadgetTrigger};
pub use instance::{GadgetInstance, TriggerEvent};
pub use system::{
    deploy_gadget, end_turn_upkeep, process_phase_triggers, process_position_change, Deployment,
    GadgetFiring, GadgetOutcome,
};
