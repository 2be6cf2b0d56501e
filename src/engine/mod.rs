//! Encounter engine - turn phases, actions and decision sources
//!
//! One [`TurnController`] owns one [`CombatState`](crate::combat::CombatState)
//! and drives it to an outcome. Player choices come from a
//! [`DecisionSource`]; the opponent is played by [`OpponentAi`].

pub mod action;
pub mod controller;
pub mod decision;
pub mod events;
pub mod opponent;
pub mod phase;

// Re-exports for convenient access
pub use action::{ActionReport, CombatAction, EscapeReport};
pub use controller::TurnController;
pub use decision::{AutoPilot, DecisionContext, DecisionSource, ScriptedDecisions};
pub use events::{CombatEvent, CombatEventType, CombatLog, EventSink, NullSink};
pub use opponent::{ActionWeights, OpponentAi};
pub use phase::{CombatOutcome, TurnPhase};
