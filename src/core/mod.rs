pub mod config;
pub mod error;
pub mod rng;
pub mod types;

pub use config::CombatConfig;
pub use error::{CombatError, RegistryError, Result};
pub use rng::{CombatRng, FixedRolls, SeededRng};
pub use types::{
    AbilityId, CharacterClass, DamageType, EnemyArchetype, GadgetId, Side, Stats, Turn,
};
