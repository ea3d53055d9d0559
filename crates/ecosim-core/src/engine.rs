//! Simulation engine - owns the world and advances it one fixed tick at a time

use hecs::{Entity, World};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::Serialize;

use crate::components::*;
use crate::config::SimConfig;
use crate::error::SimError;
use crate::events::EventLog;
use crate::history::{Population, PopulationHistory};
use crate::rng::{create_rng, SimRng};
use crate::systems::*;

/// Read-only snapshot of one agent, for rendering and counting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentView {
    /// Stable for the agent's lifetime
    pub id: u64,
    pub kind: Kind,
    pub left: f32,
    pub top: f32,
    pub size: f32,
    pub center: Vec2,
    pub velocity: Vec2,
    pub health: f32,
    pub hunger: Option<f32>,
    pub state: &'static str,
}

/// Main simulation engine
pub struct SimulationEngine {
    world: World,
    rng: SimRng,
    config: SimConfig,
    bounds: Rect,
    spawner: Spawner,
    events: EventLog,
    history: PopulationHistory,
    /// Simulated seconds since start
    sim_time: f64,
    tick_count: u64,
    speed_multiplier: u32,
}

impl SimulationEngine {
    /// Create an empty arena without validating `config`.
    /// Use [`SimulationEngine::populate`] to seed it.
    pub fn new(config: SimConfig) -> Self {
        let bounds = Rect::from_size(config.arena_size, config.arena_size);
        Self {
            world: World::new(),
            rng: create_rng(config.seed),
            bounds,
            spawner: Spawner::new(config.population_cap, config.agent_size),
            events: EventLog::new(config.event_log_capacity),
            history: PopulationHistory::new(
                config.history_interval,
                config.history_capacity,
                0.0,
                Population::default(),
            ),
            sim_time: 0.0,
            tick_count: 0,
            speed_multiplier: 1,
            config,
        }
    }

    /// Validate `config`, then build and populate an engine
    pub fn try_new(config: SimConfig) -> Result<Self, SimError> {
        let mut engine = Self::new(config);
        engine.populate()?;
        Ok(engine)
    }

    /// Seed the initial random population using the configured preset.
    /// Fails without spawning anything when the config is invalid.
    pub fn populate(&mut self) -> Result<(), SimError> {
        let issues = crate::config::validate_config(&self.config);
        if !issues.is_empty() {
            return Err(SimError::InvalidConfig(issues));
        }

        let weights = self.config.preset.weights();
        let Ok(picker) = WeightedIndex::new(weights.iter().map(|(_, w)| *w)) else {
            return Ok(());
        };
        let size = self.config.agent_size;

        for _ in 0..self.config.initial_agents {
            let left = self.rng.gen_range(self.bounds.left()..self.bounds.right() - size);
            let top = self.rng.gen_range(self.bounds.bottom() + size..self.bounds.top());
            let kind = weights[picker.sample(&mut self.rng)].0;
            self.ctx().spawn(kind, left, top, SpawnParams::default());
        }
        self.spawner.flush(&mut self.world);

        let population = self.population();
        log::info!(
            "Seeded {:?} world: {} grass, {} herbivores, {} carnivores",
            self.config.preset,
            population.grass,
            population.herbivores,
            population.carnivores
        );
        self.history = PopulationHistory::new(
            self.config.history_interval,
            self.config.history_capacity,
            self.sim_time,
            population,
        );
        Ok(())
    }

    fn ctx(&mut self) -> TickContext<'_> {
        TickContext {
            world: &mut self.world,
            rng: &mut self.rng,
            spawner: &mut self.spawner,
            events: &mut self.events,
            bounds: self.bounds,
            dt: self.config.dt,
            now: self.sim_time,
        }
    }

    /// Advance the simulation by one fixed timestep.
    ///
    /// Kinds update in [`Kind::ALL`] order over the agents alive when the
    /// tick started. Agents spawned during the tick appear after the pass.
    pub fn tick(&mut self) {
        let snapshot: Vec<(Kind, Vec<Entity>)> = Kind::ALL
            .iter()
            .map(|&kind| (kind, self.entities_of_kind(kind)))
            .collect();

        {
            let mut ctx = self.ctx();
            for (kind, entities) in &snapshot {
                for &entity in entities {
                    if !ctx.world.contains(entity) {
                        continue;
                    }
                    match kind {
                        Kind::Grass => update_grass(&mut ctx, entity),
                        Kind::Herbivore => update_herbivore(&mut ctx, entity),
                        Kind::Carcass => update_carcass(&mut ctx, entity),
                        Kind::Carnivore => update_carnivore(&mut ctx, entity),
                    }
                    if let Ok(mut body) = ctx.world.get::<&mut Body>(entity) {
                        contain(&mut body, &ctx.bounds);
                    }
                }
            }

            // Agents knocked to zero after their own update still die this tick
            let dead: Vec<Entity> = ctx
                .world
                .query::<&Health>()
                .iter()
                .filter(|(_, h)| h.is_dead())
                .map(|(e, _)| e)
                .collect();
            for entity in dead {
                ctx.kill(entity);
            }
        }
        self.spawner.flush(&mut self.world);

        self.tick_count += 1;
        self.sim_time += self.config.dt as f64;
        let population = self.population();
        self.history.update(self.config.dt, self.sim_time, population);
    }

    /// Run `speed_multiplier` ticks; a multiplier of 0 pauses
    pub fn advance_frame(&mut self) {
        for _ in 0..self.speed_multiplier {
            self.tick();
        }
    }

    /// Set how many ticks each frame advances
    pub fn set_speed_multiplier(&mut self, multiplier: u32) {
        if multiplier != self.speed_multiplier {
            log::info!("Simulation speed: {}x", multiplier);
        }
        self.speed_multiplier = multiplier;
    }

    pub fn speed_multiplier(&self) -> u32 {
        self.speed_multiplier
    }

    /// Spawn an agent with its left edge at `x` and top edge at `y`.
    /// Returns false, changing nothing, when the kind is at its cap.
    pub fn create_agent(&mut self, x: f32, y: f32, kind: Kind, params: SpawnParams) -> bool {
        let created = self.ctx().spawn(kind, x, y, params);
        self.spawner.flush(&mut self.world);
        if created {
            self.history.add_mark();
        }
        created
    }

    /// Kill every agent covering the point. Returns how many died.
    pub fn kill_at(&mut self, x: f32, y: f32) -> usize {
        let point = Vec2::new(x, y);
        let targets: Vec<Entity> = self
            .world
            .query::<&Body>()
            .iter()
            .filter(|(_, body)| body.covers(&point))
            .map(|(e, _)| e)
            .collect();

        let mut ctx = self.ctx();
        for &entity in &targets {
            ctx.kill_with_reason(entity, DeathReason::Unknown);
        }
        self.spawner.flush(&mut self.world);
        targets.len()
    }

    /// Live agents of `kind`
    pub fn agents_of_kind(&self, kind: Kind) -> Vec<AgentView> {
        self.entities_of_kind(kind)
            .into_iter()
            .filter_map(|e| self.view(e))
            .collect()
    }

    /// Every live agent whose footprint covers the point
    pub fn find_at(&self, x: f32, y: f32) -> Vec<AgentView> {
        let point = Vec2::new(x, y);
        Kind::ALL
            .iter()
            .flat_map(|&kind| self.agents_of_kind(kind))
            .filter(|view| {
                let body = Body::from_left_top(view.left, view.top, view.size);
                body.covers(&point)
            })
            .collect()
    }

    /// The arena's containment rectangle
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn population(&self) -> Population {
        let mut counts = [0usize; 4];
        for (_, kind) in self.world.query::<&Kind>().iter() {
            counts[kind.index()] += 1;
        }
        Population {
            grass: counts[Kind::Grass.index()],
            herbivores: counts[Kind::Herbivore.index()],
            carcasses: counts[Kind::Carcass.index()],
            carnivores: counts[Kind::Carnivore.index()],
        }
    }

    /// Simulated seconds since start
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn history(&self) -> &PopulationHistory {
        &self.history
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Direct ECS access, for embedding systems and tests
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    fn entities_of_kind(&self, kind: Kind) -> Vec<Entity> {
        self.world
            .query::<&Kind>()
            .iter()
            .filter(|(_, k)| **k == kind)
            .map(|(e, _)| e)
            .collect()
    }

    fn view(&self, entity: Entity) -> Option<AgentView> {
        let mut query = self.world.query_one::<(&Kind, &Body, &Health)>(entity).ok()?;
        let (kind, body, health) = query.get()?;
        let hunger = self.world.get::<&Hunger>(entity).ok().map(|h| h.value);
        let state = match kind {
            Kind::Grass => "growing",
            Kind::Carcass => "rotting",
            Kind::Herbivore => self
                .world
                .get::<&Herbivore>(entity)
                .map(|h| h.state.label())
                .unwrap_or("unknown"),
            Kind::Carnivore => self
                .world
                .get::<&Carnivore>(entity)
                .map(|c| c.state.label())
                .unwrap_or("unknown"),
        };

        Some(AgentView {
            id: entity.to_bits().get(),
            kind: *kind,
            left: body.left(),
            top: body.top(),
            size: body.size,
            center: body.center,
            velocity: body.velocity,
            health: health.value,
            hunger,
            state,
        })
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}
