//! Neon Tactics - turn-based tactical combat resolution
//!
//! Two combatants, five abstract positions, terrain, cover, statuses,
//! class abilities and deployable gadgets. Content lives in TOML under
//! `data/`; every random roll goes through an injectable RNG.

pub mod abilities;
pub mod combat;
pub mod core;
pub mod engine;
pub mod gadgets;
pub mod registry;
pub mod tactics;
