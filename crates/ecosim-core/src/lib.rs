//! EcoSim Core - Predator-Prey-Grass Ecosystem Simulation
//!
//! A 2D arena of grass, herbivores, carnivores and carcasses. Animals burn
//! hunger, eat to recover it, breed while fed and die into carcasses that
//! rot and may regrow grass, so the population oscillates on its own.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: One per agent, tagged with its [`components::Kind`]
//! - **Components**: Pure data (Body, Health, Hunger, per-species state)
//! - **Systems**: Free functions advancing one agent per call
//!
//! The [`engine::SimulationEngine`] runs fixed-timestep ticks, updating
//! kinds in a fixed order and applying spawns at the end of each tick.
//!
//! # Example
//!
//! ```rust,no_run
//! use ecosim_core::prelude::*;
//!
//! let mut engine = SimulationEngine::try_new(SimConfig::default()).unwrap();
//!
//! loop {
//!     engine.advance_frame();
//!     let population = engine.population();
//!     println!("{} herbivores", population.herbivores);
//! }
//! ```

pub mod components;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod events;
pub mod history;
pub mod rng;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::{SeedPreset, SimConfig};
    pub use crate::engine::{AgentView, SimulationEngine};
    pub use crate::error::SimError;
    pub use crate::history::Population;
    pub use crate::systems::SpawnParams;
}
