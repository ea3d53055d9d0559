//! Lifecycle - spawning, death hooks, carcass regrowth and procreation.
//!
//! Spawns go through a `hecs::CommandBuffer` and land in the world when the
//! tick driver flushes it, so agents born during a tick are not updated
//! until the next one. Deaths despawn immediately.

use hecs::{CommandBuffer, Entity, World};
use rand::Rng;

use super::motion::integrate;
use super::vitals::{death_reason, health_step, rot_step};
use super::{read, write, TickContext};
use crate::components::*;
use crate::constants::{self, carcass, grass, procreation};
use crate::events::EventKind;
use crate::rng::gaussian;

/// Optional overrides for a new agent
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpawnParams {
    /// Initial health, 100 when unset
    pub health: Option<f32>,
    /// Species a carcass came from, herbivore when unset
    pub original: Option<Kind>,
}

impl SpawnParams {
    pub fn with_health(health: f32) -> Self {
        Self {
            health: Some(health),
            ..Default::default()
        }
    }
}

/// Deferred spawn queue enforcing the per-kind population cap
pub struct Spawner {
    commands: CommandBuffer,
    pending: [usize; 4],
    cap: usize,
    agent_size: f32,
}

impl Spawner {
    pub fn new(cap: usize, agent_size: f32) -> Self {
        Self {
            commands: CommandBuffer::new(),
            pending: [0; 4],
            cap,
            agent_size,
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Spawns of `kind` queued but not yet in the world
    pub fn pending(&self, kind: Kind) -> usize {
        self.pending[kind.index()]
    }

    /// Whether one more `kind` fits under the cap
    pub fn has_room(&self, world: &World, kind: Kind) -> bool {
        live_count(world, kind) + self.pending(kind) < self.cap
    }

    /// Queue a new agent. Returns false and queues nothing at the cap.
    pub fn request(
        &mut self,
        world: &World,
        rng: &mut impl Rng,
        kind: Kind,
        left: f32,
        top: f32,
        params: SpawnParams,
    ) -> bool {
        if !self.has_room(world, kind) {
            return false;
        }

        let body = Body::from_left_top(left, top, self.agent_size);
        let start_health = params.health.unwrap_or(constants::MAX_HEALTH);

        match kind {
            Kind::Grass => {
                let health = Health::new(start_health, grass::HEALTH_REGEN);
                self.commands.spawn((kind, body, health, Grass));
            }
            Kind::Carcass => {
                let remains = Carcass {
                    original: params.original.unwrap_or(Kind::Herbivore),
                    total_rotted: 0.0,
                    rot_speed: rng.gen_range(carcass::ROT_SPEED_MIN..carcass::ROT_SPEED_MAX),
                };
                self.commands.spawn((kind, body, Health::new(start_health, 0.0), remains));
            }
            Kind::Herbivore => {
                let herbivore = Herbivore {
                    state: HerbivoreState::Idle {
                        time_to_move: random_idle_time(rng, constants::herbivore::INITIAL_IDLE_MAX),
                    },
                    traits: Traits::random(
                        rng,
                        constants::herbivore::ATTACK_DAMAGE_MIN,
                        constants::herbivore::ATTACK_DAMAGE_MAX,
                    ),
                };
                self.commands.spawn((
                    kind,
                    body,
                    Health::new(start_health, constants::herbivore::HEALTH_REGEN),
                    initial_hunger(rng, constants::herbivore::HUNGER_BUILDUP),
                    new_procreation(rng, constants::herbivore::PROCREATE_MEAN),
                    herbivore,
                ));
            }
            Kind::Carnivore => {
                let carnivore = Carnivore {
                    state: CarnivoreState::Idle { time_to_move: 0.0 },
                    traits: Traits::random(
                        rng,
                        constants::carnivore::ATTACK_DAMAGE_MIN,
                        constants::carnivore::ATTACK_DAMAGE_MAX,
                    ),
                };
                self.commands.spawn((
                    kind,
                    body,
                    Health::new(start_health, constants::carnivore::HEALTH_REGEN),
                    initial_hunger(rng, constants::carnivore::HUNGER_BUILDUP),
                    new_procreation(rng, constants::carnivore::PROCREATE_MEAN),
                    carnivore,
                ));
            }
        }

        self.pending[kind.index()] += 1;
        true
    }

    /// Apply every queued spawn
    pub fn flush(&mut self, world: &mut World) {
        self.commands.run_on(world);
        self.pending = [0; 4];
    }
}

/// Live agents of `kind`
pub fn live_count(world: &World, kind: Kind) -> usize {
    world.query::<&Kind>().iter().filter(|(_, k)| **k == kind).count()
}

fn initial_hunger(rng: &mut impl Rng, buildup: f32) -> Hunger {
    Hunger::new(rng.gen_range(0.0..constants::hunger::INITIAL_MAX), buildup)
}

fn new_procreation(rng: &mut impl Rng, mean: f32) -> Procreation {
    Procreation {
        countdown: procreation_countdown(rng, mean),
        mean,
    }
}

/// Gaussian countdown around `mean` (sigma = mean / 2), never below the floor
pub fn procreation_countdown(rng: &mut impl Rng, mean: f32) -> f32 {
    gaussian(rng, mean, mean / 2.0).max(procreation::MIN_COUNTDOWN)
}

/// Grass only regrows health; it never moves on its own
pub fn update_grass(ctx: &mut TickContext, entity: Entity) {
    let (Some(mut body), Some(mut health)) = (
        read::<Body>(ctx.world, entity),
        read::<Health>(ctx.world, entity),
    ) else {
        return;
    };
    integrate(&mut body, Vec2::ZERO, ctx.dt);
    write(ctx.world, entity, body);
    if !health_step(&mut health, ctx.dt) {
        ctx.kill(entity);
        return;
    }
    write(ctx.world, entity, health);
}

/// Rot a carcass; once nothing is left it dies and may regrow grass
pub fn update_carcass(ctx: &mut TickContext, entity: Entity) {
    let (Some(mut body), Some(mut health), Some(mut remains)) = (
        read::<Body>(ctx.world, entity),
        read::<Health>(ctx.world, entity),
        read::<Carcass>(ctx.world, entity),
    ) else {
        return;
    };
    rot_step(&mut remains, &mut health, ctx.dt);
    integrate(&mut body, Vec2::ZERO, ctx.dt);

    write(ctx.world, entity, body);
    write(ctx.world, entity, remains);
    write(ctx.world, entity, health);
    if !health_step(&mut health, ctx.dt) {
        ctx.kill(entity);
        return;
    }
    write(ctx.world, entity, health);
}

impl TickContext<'_> {
    /// Queue a spawn, logging cap rejections
    pub fn spawn(&mut self, kind: Kind, left: f32, top: f32, params: SpawnParams) -> bool {
        let accepted = self.spawner.request(&*self.world, &mut *self.rng, kind, left, top, params);
        if !accepted {
            self.events.record(self.now, EventKind::CapReached { kind });
        }
        accepted
    }

    /// Kill `entity` now with the reason its own state implies
    pub fn kill(&mut self, entity: Entity) {
        let Some(kind) = read::<Kind>(self.world, entity) else {
            return;
        };
        let hunger = read::<Hunger>(self.world, entity);
        let remains = read::<Carcass>(self.world, entity);
        let reason = death_reason(kind, hunger.as_ref(), remains.as_ref());
        self.kill_with_reason(entity, reason);
    }

    /// Run the death hook: despawn, then leave a carcass or maybe regrow grass.
    /// A second call for the same entity does nothing.
    pub fn kill_with_reason(&mut self, entity: Entity, reason: DeathReason) {
        let Some(kind) = read::<Kind>(self.world, entity) else {
            return;
        };
        let Some(body) = read::<Body>(self.world, entity) else {
            return;
        };
        let remains = read::<Carcass>(self.world, entity);
        if self.world.despawn(entity).is_err() {
            return;
        }
        self.events.record(self.now, EventKind::Died { kind, reason });

        match kind {
            Kind::Grass => {}
            Kind::Herbivore | Kind::Carnivore => {
                let health = if reason == DeathReason::Hunger {
                    carcass::STARVED_INITIAL_HEALTH
                } else {
                    carcass::INITIAL_HEALTH
                };
                let params = SpawnParams {
                    health: Some(health),
                    original: Some(kind),
                };
                self.spawn(Kind::Carcass, body.left(), body.top(), params);
            }
            Kind::Carcass => {
                let rotted = remains.map(|c| c.total_rotted).unwrap_or(0.0);
                let roll = self.rng.gen_range(0..carcass::REGROWTH_ROLL) as f32;
                if roll < rotted {
                    let health = self
                        .rng
                        .gen_range(grass::REGROWTH_HEALTH_MIN..grass::REGROWTH_HEALTH_MAX);
                    let params = SpawnParams::with_health(health);
                    if self.spawn(Kind::Grass, body.left(), body.top(), params) {
                        self.events.record(self.now, EventKind::Regrew);
                    }
                }
            }
        }
    }

    /// Count down to the next offspring while fed; on expiry spawn one
    /// beside the parent and charge the parent hunger.
    pub fn procreation_step(
        &mut self,
        kind: Kind,
        body: &Body,
        clock: &mut Procreation,
        hunger: &mut Hunger,
    ) {
        if hunger.is_hungry() {
            return;
        }
        clock.countdown -= self.dt;
        if clock.countdown > 0.0 {
            return;
        }

        let left = (body.left() - body.size).max(self.bounds.left());
        let params = SpawnParams::with_health(procreation::OFFSPRING_HEALTH);
        if self.spawn(kind, left, body.top(), params) {
            self.events.record(self.now, EventKind::Born { kind });
        }
        hunger.add(procreation::HUNGER_COST);
        clock.countdown = procreation_countdown(&mut *self.rng, clock.mean);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;
    use crate::systems::fixture::Fixture;

    #[test]
    fn test_spawn_is_deferred() {
        let mut fx = Fixture::new(10);
        assert!(fx.ctx().spawn(Kind::Grass, 0.0, 50.0, SpawnParams::default()));
        assert_eq!(live_count(&fx.world, Kind::Grass), 0);
        assert_eq!(fx.spawner.pending(Kind::Grass), 1);

        fx.flush();
        assert_eq!(live_count(&fx.world, Kind::Grass), 1);
        assert_eq!(fx.spawner.pending(Kind::Grass), 0);
    }

    #[test]
    fn test_cap_counts_pending() {
        let mut fx = Fixture::new(2);
        assert!(fx.ctx().spawn(Kind::Herbivore, 0.0, 50.0, SpawnParams::default()));
        fx.flush();
        assert!(fx.ctx().spawn(Kind::Herbivore, 0.0, 50.0, SpawnParams::default()));
        assert!(!fx.ctx().spawn(Kind::Herbivore, 0.0, 50.0, SpawnParams::default()));
        // Other kinds have their own cap
        assert!(fx.ctx().spawn(Kind::Grass, 0.0, 50.0, SpawnParams::default()));
        fx.flush();

        assert_eq!(live_count(&fx.world, Kind::Herbivore), 2);
        assert!(matches!(
            fx.events.last().map(|e| e.kind),
            Some(EventKind::CapReached { kind: Kind::Herbivore })
        ));
    }

    #[test]
    fn test_animal_death_leaves_carcass() {
        let mut fx = Fixture::new(10);
        fx.ctx().spawn(Kind::Carnivore, 100.0, 300.0, SpawnParams::default());
        fx.flush();
        let carnivore = fx.only(Kind::Carnivore);

        fx.ctx().kill_with_reason(carnivore, DeathReason::Hunger);
        // Second kill is a no-op
        fx.ctx().kill_with_reason(carnivore, DeathReason::Hunger);
        fx.flush();

        assert_eq!(live_count(&fx.world, Kind::Carnivore), 0);
        let remains = fx.only(Kind::Carcass);
        let health = read::<Health>(&fx.world, remains).unwrap();
        let carcass = read::<Carcass>(&fx.world, remains).unwrap();
        let body = read::<Body>(&fx.world, remains).unwrap();
        assert_eq!(health.value, 70.0);
        assert_eq!(carcass.original, Kind::Carnivore);
        assert_eq!((body.left(), body.top()), (100.0, 300.0));

        let deaths = fx
            .events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::Died { .. }))
            .count();
        assert_eq!(deaths, 1);
    }

    #[test]
    fn test_attack_death_carcass_is_full() {
        let mut fx = Fixture::new(10);
        fx.ctx().spawn(Kind::Herbivore, 100.0, 300.0, SpawnParams::default());
        fx.flush();
        let herbivore = fx.only(Kind::Herbivore);
        fx.ctx().kill_with_reason(herbivore, DeathReason::Attack);
        fx.flush();

        let remains = fx.only(Kind::Carcass);
        assert_eq!(read::<Health>(&fx.world, remains).unwrap().value, 100.0);
    }

    #[test]
    fn test_fully_rotted_carcass_regrows_often() {
        let mut fx = Fixture::new(1000);
        for _ in 0..200 {
            fx.ctx().spawn(Kind::Carcass, 10.0, 60.0, SpawnParams::default());
        }
        fx.flush();
        let carcasses: Vec<Entity> = fx.world.query::<&Carcass>().iter().map(|(e, _)| e).collect();
        for e in &carcasses {
            if let Ok(mut c) = fx.world.get::<&mut Carcass>(*e) {
                c.total_rotted = 100.0;
            }
            fx.ctx().kill(*e);
        }
        fx.flush();

        // Half of the rolls in [0, 200) fall below 100
        let grass = live_count(&fx.world, Kind::Grass);
        assert!((70..=130).contains(&grass), "regrew {grass} of 200");
        for (_, (_, health)) in fx.world.query::<(&Grass, &Health)>().iter() {
            assert!(health.value >= 10.0 && health.value <= 30.0);
        }
    }

    #[test]
    fn test_fresh_carcass_never_regrows() {
        let mut fx = Fixture::new(1000);
        for _ in 0..50 {
            fx.ctx().spawn(Kind::Carcass, 10.0, 60.0, SpawnParams::default());
        }
        fx.flush();
        let carcasses: Vec<Entity> = fx.world.query::<&Carcass>().iter().map(|(e, _)| e).collect();
        for e in carcasses {
            fx.ctx().kill(e);
        }
        fx.flush();
        assert_eq!(live_count(&fx.world, Kind::Grass), 0);
    }

    #[test]
    fn test_procreation_waits_while_hungry() {
        let mut fx = Fixture::new(10);
        let body = Body::from_left_top(100.0, 300.0, 50.0);
        let mut clock = Procreation {
            countdown: 0.001,
            mean: 60.0,
        };
        let mut hunger = Hunger::new(70.0, 4.0);

        fx.ctx().procreation_step(Kind::Herbivore, &body, &mut clock, &mut hunger);
        assert_eq!(clock.countdown, 0.001);
        assert_eq!(fx.spawner.pending(Kind::Herbivore), 0);
    }

    #[test]
    fn test_procreation_spawns_offspring() {
        let mut fx = Fixture::new(10);
        let body = Body::from_left_top(30.0, 300.0, 50.0);
        let mut clock = Procreation {
            countdown: 0.001,
            mean: 60.0,
        };
        let mut hunger = Hunger::new(10.0, 4.0);

        fx.ctx().procreation_step(Kind::Herbivore, &body, &mut clock, &mut hunger);
        fx.flush();

        assert_eq!(hunger.value, 40.0);
        assert!(clock.countdown >= 10.0);
        let child = fx.only(Kind::Herbivore);
        let child_body = read::<Body>(&fx.world, child).unwrap();
        assert_eq!(read::<Health>(&fx.world, child).unwrap().value, 20.0);
        // Clamped to the arena's left edge
        assert_eq!(child_body.left(), 0.0);
        assert_eq!(child_body.top(), 300.0);
    }

    #[test]
    fn test_countdown_floor() {
        let mut rng = create_rng(9);
        for _ in 0..1000 {
            assert!(procreation_countdown(&mut rng, 60.0) >= 10.0);
        }
    }
}
