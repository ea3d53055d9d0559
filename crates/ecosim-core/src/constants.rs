//! Simulation tunables shared by the components and systems.
//!
//! Rates are per simulated second and get multiplied by `dt`;
//! speeds are arena units per tick.

/// Max speed of an agent that never entered a behavior setting it
pub const DEFAULT_MAX_SPEED: f32 = 100.0;

/// Upper bound for health and hunger
pub const MAX_HEALTH: f32 = 100.0;
pub const MAX_HUNGER: f32 = 100.0;

/// Hunger at or above this marks an agent as hungry
pub const HUNGRY_THRESHOLD: f32 = 50.0;

/// Hunger at or above this at death means the agent starved
pub const STARVATION_HUNGER: f32 = 99.0;

pub mod grass {
    pub const HEALTH_REGEN: f32 = 5.0;
    pub const REGROWTH_HEALTH_MIN: f32 = 10.0;
    pub const REGROWTH_HEALTH_MAX: f32 = 30.0;
}

pub mod hunger {
    pub const DAMAGE: f32 = 10.0;
    pub const SATISFIED_HEALTH_REGEN: f32 = 3.0;
    pub const INITIAL_MAX: f32 = 10.0;
}

pub mod procreation {
    pub const MIN_COUNTDOWN: f32 = 10.0;
    pub const OFFSPRING_HEALTH: f32 = 20.0;
    pub const HUNGER_COST: f32 = 30.0;
}

pub mod herbivore {
    pub const HEALTH_REGEN: f32 = 1.0;
    pub const HUNGER_BUILDUP: f32 = 4.0;
    pub const PROCREATE_MEAN: f32 = 60.0;
    pub const HEALTH_TO_HUNGER: f32 = 1.2;
    pub const ATTACK_DAMAGE_MIN: f32 = 5.0;
    pub const ATTACK_DAMAGE_MAX: f32 = 15.0;
    pub const ATTACK_COOLDOWN: f32 = 1.2;
    pub const COUNTER_ATTACK_RANGE: f32 = 100.0;
    /// Hunger that sends an idle herbivore foraging straight away
    pub const FORAGE_HUNGER: f32 = 60.0;
    /// Hunger that sends an idle herbivore foraging once its move timer ran out
    pub const IDLE_FORAGE_HUNGER: f32 = 40.0;
    pub const INITIAL_IDLE_MAX: f32 = 3.0;

    pub const FLOCK_RADIUS: f32 = 300.0;
    pub const FLOCK_DESIRED_DISTANCE: f32 = 150.0;
    pub const FLOCK_BUFFER: f32 = 50.0;
    pub const FLOCK_ATTRACT_STRENGTH: f32 = 2.0;
    pub const FLOCK_ATTRACT_EXP: f32 = 0.75;
    pub const FLOCK_REPEL_STRENGTH: f32 = 5.0;
    pub const FLOCK_REPEL_EXP: f32 = 0.5;
}

pub mod carnivore {
    pub const HEALTH_REGEN: f32 = 1.0;
    pub const HUNGER_BUILDUP: f32 = 5.0;
    pub const PROCREATE_MEAN: f32 = 100.0;
    pub const HEALTH_TO_HUNGER: f32 = 1.6;
    pub const ATTACK_DAMAGE_MIN: f32 = 20.0;
    pub const ATTACK_DAMAGE_MAX: f32 = 50.0;
    pub const ATTACK_COOLDOWN: f32 = 1.0;
    pub const HUNT_HUNGER: f32 = 50.0;
    pub const IDLE_HUNT_HUNGER: f32 = 30.0;
    /// Hunger minus health gap that means starving faster than recovering
    pub const STARVING_GAP: f32 = 20.0;

    pub const REPEL_RADIUS: f32 = 300.0;
    pub const REPEL_STRENGTH: f32 = 5.0;
    pub const REPEL_EXP: f32 = 1.2;
}

pub mod carcass {
    pub const ROT_SPEED_MIN: f32 = 1.0;
    pub const ROT_SPEED_MAX: f32 = 5.0;
    /// Rot at or below this still counts as eaten rather than rotted
    pub const EATEN_ROT_LIMIT: f32 = 70.0;
    pub const INITIAL_HEALTH: f32 = 100.0;
    pub const STARVED_INITIAL_HEALTH: f32 = 70.0;
    /// Regrowth succeeds when a draw in `[0, REGROWTH_ROLL)` is below total rot
    pub const REGROWTH_ROLL: u32 = 200;
}

/// Trait ranges shared by both animal kinds
pub mod animal {
    pub const IDLE_SPEED_MIN: f32 = 0.3;
    pub const IDLE_SPEED_MAX: f32 = 1.2;
    pub const CHASE_SPEED_MIN: f32 = 0.3;
    pub const CHASE_SPEED_MAX: f32 = 2.0;
    pub const EAT_SPEED_MIN: f32 = 15.0;
    pub const EAT_SPEED_MAX: f32 = 20.0;
    pub const IDLE_TIMER_MAX: f32 = 8.0;
}
