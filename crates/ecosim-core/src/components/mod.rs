//! Component definitions for the ECS simulation.
//!
//! Components are plain data attached to agent entities.
//! Behavior lives in the systems.

mod common;
mod species;
mod vitals;

pub use common::*;
pub use species::*;
pub use vitals::*;
