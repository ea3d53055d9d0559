//! Health and hunger economy - pure per-tick updates.

use crate::components::{Carcass, DeathReason, Health, Hunger, Kind};
use crate::constants::{carcass, STARVATION_HUNGER};

/// Build up hunger; starving drains health, a satisfied stomach heals
pub fn hunger_step(hunger: &mut Hunger, health: &mut Health, dt: f32) {
    hunger.add(hunger.buildup * dt);
    if hunger.is_starving() {
        health.remove(hunger.damage * dt);
    } else if !hunger.is_hungry() {
        health.add(hunger.satisfied_regen * dt);
    }
}

/// Regenerate health. Returns false when the agent is dead and its
/// death hook must run instead.
pub fn health_step(health: &mut Health, dt: f32) -> bool {
    if health.is_dead() {
        return false;
    }
    health.add(health.regen * dt);
    true
}

/// Lose health to rot, accumulating it into `total_rotted`
pub fn rot_step(remains: &mut Carcass, health: &mut Health, dt: f32) {
    remains.total_rotted += health.remove(remains.rot_speed * dt);
}

/// Why an agent of `kind` with this state died
pub fn death_reason(kind: Kind, hunger: Option<&Hunger>, remains: Option<&Carcass>) -> DeathReason {
    match kind {
        Kind::Grass => DeathReason::Eaten,
        Kind::Carcass => match remains {
            Some(c) if c.total_rotted > carcass::EATEN_ROT_LIMIT => DeathReason::Rotted,
            Some(_) => DeathReason::Eaten,
            None => DeathReason::Unknown,
        },
        Kind::Herbivore | Kind::Carnivore => match hunger {
            Some(h) if h.value >= STARVATION_HUNGER => DeathReason::Hunger,
            Some(_) => DeathReason::Attack,
            None => DeathReason::Unknown,
        },
    }
}
