//! Shared world setup for the systems tests

use hecs::{Entity, World};

use super::{Spawner, SpawnParams, TickContext};
use crate::components::{Kind, Rect};
use crate::events::EventLog;
use crate::rng::{create_rng, SimRng};

pub(crate) struct Fixture {
    pub world: World,
    pub rng: SimRng,
    pub spawner: Spawner,
    pub events: EventLog,
}

impl Fixture {
    pub fn new(cap: usize) -> Self {
        Self {
            world: World::new(),
            rng: create_rng(11),
            spawner: Spawner::new(cap, 50.0),
            events: EventLog::new(16),
        }
    }

    pub fn ctx(&mut self) -> TickContext<'_> {
        TickContext {
            world: &mut self.world,
            rng: &mut self.rng,
            spawner: &mut self.spawner,
            events: &mut self.events,
            bounds: Rect::from_size(800.0, 800.0),
            dt: 1.0 / 60.0,
            now: 0.0,
        }
    }

    pub fn flush(&mut self) {
        self.spawner.flush(&mut self.world);
    }

    pub fn all(&self, kind: Kind) -> Vec<Entity> {
        self.world
            .query::<&Kind>()
            .iter()
            .filter(|(_, k)| **k == kind)
            .map(|(e, _)| e)
            .collect()
    }

    pub fn only(&self, kind: Kind) -> Entity {
        let found = self.all(kind);
        assert_eq!(found.len(), 1, "expected exactly one {kind}");
        found[0]
    }

    /// Spawn one agent right away and return its handle
    pub fn add(&mut self, kind: Kind, left: f32, top: f32) -> Entity {
        let before = self.all(kind);
        assert!(self.ctx().spawn(kind, left, top, SpawnParams::default()));
        self.flush();
        self.all(kind)
            .into_iter()
            .find(|e| !before.contains(e))
            .expect("spawned agent is in the world")
    }

    /// Edit one component in place
    pub fn set<T: hecs::Component>(&self, entity: Entity, edit: impl FnOnce(&mut T)) {
        let mut component = self
            .world
            .get::<&mut T>(entity)
            .expect("component is present");
        edit(&mut component);
    }
}
