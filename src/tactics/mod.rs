//! Positions, terrain and the modifiers they grant

pub mod modifiers;
pub mod position;
pub mod scoring;
pub mod terrain;

pub use modifiers::{move_options, movement_cost, position_modifiers, ModifierBundle, MoveOption};
pub use position::{flanking_bonus, Position, PositionAdvantage};
pub use scoring::{optimal_position, score_position, ScoringContext};
pub use terrain::{Environment, Terrain, TerrainMap, TerrainSpecial};
