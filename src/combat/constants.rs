//! Combat constants - status strengths and derived-stat formulas
//!
//! Percent values are integer percentages applied with integer math.

// Derived stats
pub const BASE_HEALTH: i32 = 10;
pub const HEALTH_PER_STRENGTH: i32 = 2;
pub const REFLEX_PER_DEFENSE: i32 = 2;

// Status strengths
pub const BLEED_DAMAGE_PER_TURN: i32 = 2;
pub const WEAKENED_DAMAGE_PCT: i32 = 70;
pub const STRENGTHENED_DAMAGE_PCT: i32 = 130;
pub const VULNERABLE_DEFENSE_PCT: i32 = 70;
pub const PROTECTED_DEFENSE_PCT: i32 = 130;
pub const FOCUSED_CRIT_BONUS: i32 = 15;
pub const DISORIENTED_HIT_PENALTY: i32 = 15;

// Damage type matchups
pub const WEAKNESS_DAMAGE_PCT: i32 = 150;
pub const RESISTANCE_DAMAGE_PCT: i32 = 70;

// Cover search
pub const COVER_SEARCH_INT_FACTOR: i32 = 3;
pub const COVER_SEARCH_INT_CAP: i32 = 15;
