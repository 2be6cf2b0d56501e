//! Combatants, cover, statuses and damage resolution

pub mod combatant;
pub mod constants;
pub mod cover;
pub mod damage;
pub mod record;
pub mod state;
pub mod status;
pub mod target_zone;

pub use combatant::Combatant;
pub use cover::{Cover, CoverTier};
pub use damage::{apply_damage, strike, HitReport, StrikeProfile, StrikeReport};
pub use record::{CharacterSheet, CombatantRecord, EnemyProfile, EnemyTemplate};
pub use state::{CombatState, Drone, GadgetCooldowns};
pub use status::{StatusEffect, StatusEffects, StatusKind, StatusSource};
pub use target_zone::{TargetZone, ZoneProfile, ZoneTable};
