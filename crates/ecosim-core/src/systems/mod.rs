//! Systems - logic that operates on components

mod carnivore;
#[cfg(test)]
mod fixture;
mod herbivore;
mod lifecycle;
mod motion;
mod targeting;
mod vitals;

pub use carnivore::*;
pub use herbivore::*;
pub use lifecycle::*;
pub use motion::*;
pub use targeting::*;
pub use vitals::*;

use hecs::{Entity, World};

use crate::components::Rect;
use crate::events::EventLog;
use crate::rng::SimRng;

/// Mutable simulation state handed to every per-agent update
pub struct TickContext<'a> {
    pub world: &'a mut World,
    pub rng: &'a mut SimRng,
    pub spawner: &'a mut Spawner,
    pub events: &'a mut EventLog,
    pub bounds: Rect,
    pub dt: f32,
    /// Simulated seconds at the start of this tick
    pub now: f64,
}

/// Copy a component out of the world
pub(crate) fn read<T: hecs::Component + Copy>(world: &World, entity: Entity) -> Option<T> {
    world.get::<&T>(entity).ok().map(|c| *c)
}

/// Overwrite a component, ignoring entities that no longer exist
pub(crate) fn write<T: hecs::Component>(world: &World, entity: Entity, value: T) {
    if let Ok(mut c) = world.get::<&mut T>(entity) {
        *c = value;
    }
}
