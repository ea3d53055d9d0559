//! Energy components: health, hunger and the procreation clock.

use crate::constants::{HUNGRY_THRESHOLD, MAX_HEALTH, MAX_HUNGER};
use serde::{Deserialize, Serialize};

/// Health in `[0, 100]` plus a per-second regeneration rate.
///
/// Damage and feeding both go through [`Health::remove`], whose return
/// value is the amount actually taken.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub value: f32,
    pub regen: f32,
}

impl Health {
    pub fn new(value: f32, regen: f32) -> Self {
        Self {
            value: value.clamp(0.0, MAX_HEALTH),
            regen,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.value <= 0.0
    }

    /// Remove up to `damage` health, returning what was removed
    pub fn remove(&mut self, damage: f32) -> f32 {
        let drop = damage.min(self.value).max(0.0);
        self.value -= drop;
        drop
    }

    /// Add up to `amount` health without passing the maximum.
    /// Dead agents cannot heal.
    pub fn add(&mut self, amount: f32) -> f32 {
        if self.is_dead() {
            return 0.0;
        }
        let gain = amount.min(MAX_HEALTH - self.value).max(0.0);
        self.value += gain;
        gain
    }
}

/// Hunger in `[0, 100]`, building up linearly over time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hunger {
    pub value: f32,
    pub buildup: f32,
    pub damage: f32,
    pub satisfied_regen: f32,
}

impl Hunger {
    pub fn new(value: f32, buildup: f32) -> Self {
        Self {
            value: value.clamp(0.0, MAX_HUNGER),
            buildup,
            damage: crate::constants::hunger::DAMAGE,
            satisfied_regen: crate::constants::hunger::SATISFIED_HEALTH_REGEN,
        }
    }

    pub fn is_hungry(&self) -> bool {
        self.value >= HUNGRY_THRESHOLD
    }

    pub fn is_starving(&self) -> bool {
        self.value >= MAX_HUNGER
    }

    pub fn add(&mut self, amount: f32) {
        self.value = (self.value + amount).min(MAX_HUNGER);
    }

    pub fn relieve(&mut self, amount: f32) {
        self.value = (self.value - amount).max(0.0);
    }
}

/// Countdown to the next offspring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Procreation {
    pub countdown: f32,
    pub mean: f32,
}

/// Why an agent died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathReason {
    Unknown,
    Hunger,
    Attack,
    Eaten,
    Rotted,
}

impl DeathReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeathReason::Unknown => "unknown",
            DeathReason::Hunger => "hunger",
            DeathReason::Attack => "attack",
            DeathReason::Eaten => "eaten",
            DeathReason::Rotted => "rotted",
        }
    }
}

impl std::fmt::Display for DeathReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
