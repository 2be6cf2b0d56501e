//! Timed status effects
//!
//! Damage-over-time lands at the start of the bearer's phase. Durations
//! count down once per full turn, during resolution.

use serde::{Deserialize, Serialize};

use super::constants::*;
use crate::core::types::{AbilityId, GadgetId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Bleeding,
    /// Skips the bearer's action loop
    Stunned,
    Weakened,
    Vulnerable,
    Strengthened,
    Protected,
    Focused,
    Disoriented,
    /// No abilities, no gadget deployment
    Disabled,
    ReducedAccuracy,
    DamageReduction,
    /// Attackers gain `magnitude` hit chance and `secondary` crit chance
    Marked,
    DefenseBoost,
    EscapeBoost,
}

impl StatusKind {
    /// Duration used when a status is applied without an explicit one
    pub fn default_duration(&self) -> u32 {
        match self {
            StatusKind::Bleeding => 3,
            StatusKind::Stunned | StatusKind::Disabled => 1,
            _ => 2,
        }
    }

    /// Harmful to the bearer; removed by cleansing effects
    pub fn is_negative(&self) -> bool {
        matches!(
            self,
            StatusKind::Bleeding
                | StatusKind::Stunned
                | StatusKind::Weakened
                | StatusKind::Vulnerable
                | StatusKind::Disoriented
                | StatusKind::Disabled
                | StatusKind::ReducedAccuracy
                | StatusKind::Marked
        )
    }
}

/// What put a status on a combatant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusSource {
    Attack,
    Ability(AbilityId),
    Gadget(GadgetId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub remaining: u32,
    pub magnitude: i32,
    pub secondary: i32,
    pub source: StatusSource,
    /// Landed since the bearer's statuses were last settled
    #[serde(default)]
    pub fresh: bool,
}

impl StatusEffect {
    pub fn new(kind: StatusKind, remaining: u32, source: StatusSource) -> Self {
        Self {
            kind,
            remaining,
            magnitude: 0,
            secondary: 0,
            source,
            fresh: false,
        }
    }

    pub fn with_magnitude(mut self, magnitude: i32) -> Self {
        self.magnitude = magnitude;
        self
    }

    pub fn with_secondary(mut self, secondary: i32) -> Self {
        self.secondary = secondary;
        self
    }
}

/// All statuses on one combatant; at most one per kind
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusEffects {
    effects: Vec<StatusEffect>,
}

impl StatusEffects {
    /// Apply a status, replacing any existing status of the same kind
    pub fn apply(&mut self, mut effect: StatusEffect) {
        if effect.remaining == 0 {
            return;
        }
        effect.fresh = true;
        self.effects.retain(|e| e.kind != effect.kind);
        self.effects.push(effect);
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    fn magnitude(&self, kind: StatusKind) -> i32 {
        self.get(kind).map(|e| e.magnitude).unwrap_or(0)
    }

    /// Remove every negative status, returning what was removed
    pub fn cleanse(&mut self) -> Vec<StatusKind> {
        let removed: Vec<StatusKind> = self
            .effects
            .iter()
            .filter(|e| e.kind.is_negative())
            .map(|e| e.kind)
            .collect();
        self.effects.retain(|e| !e.kind.is_negative());
        removed
    }

    /// Damage-over-time owed at the start of the bearer's phase
    pub fn periodic_damage(&self) -> i32 {
        if self.has(StatusKind::Bleeding) {
            BLEED_DAMAGE_PER_TURN
        } else {
            0
        }
    }

    /// Everything currently held counts as settled; later arrivals are fresh
    pub fn settle(&mut self) {
        for effect in &mut self.effects {
            effect.fresh = false;
        }
    }

    /// Count every duration down by one and drop expired statuses
    pub fn tick(&mut self) -> Vec<StatusKind> {
        self.tick_where(|_| true)
    }

    /// Like [`tick`](Self::tick), but fresh statuses are spared once and
    /// settle instead
    pub fn tick_settled(&mut self) -> Vec<StatusKind> {
        self.tick_where(|e| !e.fresh)
    }

    fn tick_where(&mut self, counts: impl Fn(&StatusEffect) -> bool) -> Vec<StatusKind> {
        for effect in &mut self.effects {
            if counts(effect) {
                effect.remaining = effect.remaining.saturating_sub(1);
            }
            effect.fresh = false;
        }
        let expired: Vec<StatusKind> = self
            .effects
            .iter()
            .filter(|e| e.remaining == 0)
            .map(|e| e.kind)
            .collect();
        self.effects.retain(|e| e.remaining > 0);
        expired
    }

    pub fn is_stunned(&self) -> bool {
        self.has(StatusKind::Stunned)
    }

    pub fn is_disabled(&self) -> bool {
        self.has(StatusKind::Disabled)
    }

    /// Outgoing damage multiplier in percent
    pub fn damage_percent(&self) -> i32 {
        let mut pct = 100;
        if self.has(StatusKind::Weakened) {
            pct = pct * WEAKENED_DAMAGE_PCT / 100;
        }
        if self.has(StatusKind::Strengthened) {
            pct = pct * STRENGTHENED_DAMAGE_PCT / 100;
        }
        pct
    }

    /// Defense multiplier in percent
    pub fn defense_percent(&self) -> i32 {
        let mut pct = 100;
        if self.has(StatusKind::Vulnerable) {
            pct = pct * VULNERABLE_DEFENSE_PCT / 100;
        }
        if self.has(StatusKind::Protected) {
            pct = pct * PROTECTED_DEFENSE_PCT / 100;
        }
        pct
    }

    /// Flat defense from boosts and damage reduction fields
    pub fn flat_defense(&self) -> i32 {
        self.magnitude(StatusKind::DefenseBoost) + self.magnitude(StatusKind::DamageReduction)
    }

    /// Crit chance the bearer gains as an attacker
    pub fn crit_bonus(&self) -> i32 {
        if self.has(StatusKind::Focused) {
            FOCUSED_CRIT_BONUS
        } else {
            0
        }
    }

    /// Hit chance change the bearer suffers as an attacker
    pub fn accuracy_modifier(&self) -> i32 {
        let mut modifier = -self.magnitude(StatusKind::ReducedAccuracy);
        if self.has(StatusKind::Disoriented) {
            modifier -= DISORIENTED_HIT_PENALTY;
        }
        modifier
    }

    /// (hit, crit) bonuses granted to whoever attacks the bearer
    pub fn exposure(&self) -> (i32, i32) {
        self.get(StatusKind::Marked)
            .map(|e| (e.magnitude, e.secondary))
            .unwrap_or((0, 0))
    }

    pub fn escape_boost(&self) -> i32 {
        self.magnitude(StatusKind::EscapeBoost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effect(kind: StatusKind, remaining: u32) -> StatusEffect {
        StatusEffect::new(kind, remaining, StatusSource::Attack)
    }

    #[test]
    fn test_reapply_replaces() {
        let mut statuses = StatusEffects::default();
        statuses.apply(effect(StatusKind::DefenseBoost, 2).with_magnitude(5));
        statuses.apply(effect(StatusKind::DefenseBoost, 3).with_magnitude(2));
        assert_eq!(statuses.iter().count(), 1);
        assert_eq!(statuses.flat_defense(), 2);
    }

    #[test]
    fn test_tick_expires() {
        let mut statuses = StatusEffects::default();
        statuses.apply(effect(StatusKind::Stunned, 1));
        statuses.apply(effect(StatusKind::Bleeding, 3));
        let expired = statuses.tick();
        assert_eq!(expired, vec![StatusKind::Stunned]);
        assert!(!statuses.is_stunned());
        assert_eq!(statuses.periodic_damage(), BLEED_DAMAGE_PER_TURN);
    }

    #[test]
    fn test_fresh_statuses_spared_once() {
        let mut statuses = StatusEffects::default();
        statuses.apply(effect(StatusKind::Focused, 1));
        statuses.settle();
        statuses.apply(effect(StatusKind::Stunned, 1));

        assert_eq!(statuses.tick_settled(), vec![StatusKind::Focused]);
        assert!(statuses.is_stunned());
        assert_eq!(statuses.tick_settled(), vec![StatusKind::Stunned]);
        assert!(statuses.is_empty());
    }

    #[test]
    fn test_cleanse_keeps_positive() {
        let mut statuses = StatusEffects::default();
        statuses.apply(effect(StatusKind::Bleeding, 3));
        statuses.apply(effect(StatusKind::Protected, 2));
        let removed = statuses.cleanse();
        assert_eq!(removed, vec![StatusKind::Bleeding]);
        assert!(statuses.has(StatusKind::Protected));
    }

    #[test]
    fn test_percent_modifiers_stack() {
        let mut statuses = StatusEffects::default();
        assert_eq!(statuses.damage_percent(), 100);
        statuses.apply(effect(StatusKind::Weakened, 2));
        assert_eq!(statuses.damage_percent(), 70);
        statuses.apply(effect(StatusKind::Vulnerable, 2));
        assert_eq!(statuses.defense_percent(), 70);
    }

    #[test]
    fn test_marked_exposure() {
        let mut statuses = StatusEffects::default();
        statuses.apply(effect(StatusKind::Marked, 2).with_magnitude(15).with_secondary(10));
        assert_eq!(statuses.exposure(), (15, 10));
    }

    #[test]
    fn test_zero_duration_ignored() {
        let mut statuses = StatusEffects::default();
        statuses.apply(effect(StatusKind::Focused, 0));
        assert!(statuses.is_empty());
    }
}
