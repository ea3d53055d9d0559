//! Species components: agent kind, per-kind data and behavior states.

use hecs::Entity;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::animal;

/// The four agent kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    Grass,
    Herbivore,
    Carcass,
    Carnivore,
}

impl Kind {
    /// Update order within a tick
    pub const ALL: [Kind; 4] = [Kind::Grass, Kind::Herbivore, Kind::Carcass, Kind::Carnivore];

    pub fn index(&self) -> usize {
        match self {
            Kind::Grass => 0,
            Kind::Herbivore => 1,
            Kind::Carcass => 2,
            Kind::Carnivore => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Kind::Grass => "Grass",
            Kind::Herbivore => "Herbivore",
            Kind::Carcass => "Carcass",
            Kind::Carnivore => "Carnivore",
        }
    }

    /// Whether this kind hunts, eats and breeds
    pub fn is_animal(&self) -> bool {
        matches!(self, Kind::Herbivore | Kind::Carnivore)
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Marker component for grass
#[derive(Debug, Clone, Copy, Default)]
pub struct Grass;

/// Remains of a dead animal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Carcass {
    /// Species the carcass came from
    pub original: Kind,
    /// Health lost to rot so far, never decreases
    pub total_rotted: f32,
    /// Health lost to rot per second
    pub rot_speed: f32,
}

/// Per-individual animal traits, rolled at birth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Traits {
    pub idle_speed: f32,
    pub chase_speed: f32,
    pub eat_speed: f32,
    pub attack_damage: f32,
}

impl Traits {
    pub fn random(rng: &mut impl Rng, attack_min: f32, attack_max: f32) -> Self {
        Self {
            idle_speed: rng.gen_range(animal::IDLE_SPEED_MIN..animal::IDLE_SPEED_MAX),
            chase_speed: rng.gen_range(animal::CHASE_SPEED_MIN..animal::CHASE_SPEED_MAX),
            eat_speed: rng.gen_range(animal::EAT_SPEED_MIN..animal::EAT_SPEED_MAX),
            attack_damage: rng.gen_range(attack_min..attack_max),
        }
    }
}

/// Random idle timer in `[max / 4, max]`
pub fn random_idle_time(rng: &mut impl Rng, max: f32) -> f32 {
    if max <= 0.0 {
        return 0.0;
    }
    rng.gen_range(max / 4.0..=max)
}

/// Herbivore behavior
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HerbivoreState {
    Idle { time_to_move: f32 },
    ChasingFood { target: Entity },
    Eating { target: Entity },
    AttackCooldown { time_to_wait: f32, target: Entity },
}

impl HerbivoreState {
    pub fn label(&self) -> &'static str {
        match self {
            HerbivoreState::Idle { .. } => "idle",
            HerbivoreState::ChasingFood { .. } => "chasing_food",
            HerbivoreState::Eating { .. } => "eating",
            HerbivoreState::AttackCooldown { .. } => "attack_cooldown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Herbivore {
    pub state: HerbivoreState,
    pub traits: Traits,
}

/// What a carnivore can chase. Each variant resolves against its own kind,
/// so a target of the wrong type cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prey {
    Herbivore(Entity),
    Carcass(Entity),
}

impl Prey {
    pub fn entity(&self) -> Entity {
        match self {
            Prey::Herbivore(e) | Prey::Carcass(e) => *e,
        }
    }
}

/// Carnivore behavior
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarnivoreState {
    Idle { time_to_move: f32 },
    ChasingPrey { target: Prey },
    AttackCooldown { time_to_wait: f32, target: Entity },
    Eating { target: Entity },
}

impl CarnivoreState {
    pub fn label(&self) -> &'static str {
        match self {
            CarnivoreState::Idle { .. } => "idle",
            CarnivoreState::ChasingPrey { .. } => "chasing_prey",
            CarnivoreState::AttackCooldown { .. } => "attack_cooldown",
            CarnivoreState::Eating { .. } => "eating",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Carnivore {
    pub state: CarnivoreState,
    pub traits: Traits,
}
