//! Herbivore behavior - grazing, flocking and counter-attacking carnivores.
//!
//! One pass per tick: whichever state is active is evaluated once and may
//! hand over to another state, which then waits for the next tick.

use hecs::Entity;

use super::motion::{flocking_force, integrate, neighbor_centers, random_heading, steer_towards};
use super::targeting::{find_close, resolve};
use super::vitals::{health_step, hunger_step};
use super::{read, write, TickContext};
use crate::components::*;
use crate::constants::{animal, herbivore};

/// Advance one herbivore by a tick: hunger, motion, health (and death),
/// procreation, then behavior.
pub fn update_herbivore(ctx: &mut TickContext, entity: Entity) {
    let (Some(mut body), Some(mut health), Some(mut hunger), Some(mut clock), Some(mut me)) = (
        read::<Body>(ctx.world, entity),
        read::<Health>(ctx.world, entity),
        read::<Hunger>(ctx.world, entity),
        read::<Procreation>(ctx.world, entity),
        read::<Herbivore>(ctx.world, entity),
    ) else {
        return;
    };

    hunger_step(&mut hunger, &mut health, ctx.dt);

    let external = match me.state {
        HerbivoreState::Idle { .. } => {
            body.max_speed = me.traits.idle_speed;
            let neighbors = neighbor_centers(ctx.world, entity, Kind::Herbivore);
            flocking_force(body.center, me.traits.idle_speed, &neighbors)
        }
        _ => Vec2::ZERO,
    };
    integrate(&mut body, external, ctx.dt);

    write(ctx.world, entity, body);
    write(ctx.world, entity, health);
    write(ctx.world, entity, hunger);
    if !health_step(&mut health, ctx.dt) {
        ctx.kill(entity);
        return;
    }

    ctx.procreation_step(Kind::Herbivore, &body, &mut clock, &mut hunger);
    evaluate_herbivore(ctx, entity, &mut body, &mut hunger, &mut me);

    write(ctx.world, entity, body);
    write(ctx.world, entity, health);
    write(ctx.world, entity, hunger);
    write(ctx.world, entity, clock);
    write(ctx.world, entity, me);
}

/// Run the state machine once
pub fn evaluate_herbivore(
    ctx: &mut TickContext,
    entity: Entity,
    body: &mut Body,
    hunger: &mut Hunger,
    me: &mut Herbivore,
) {
    match me.state {
        HerbivoreState::Idle { time_to_move } => {
            let time_to_move = time_to_move - ctx.dt;
            me.state = HerbivoreState::Idle { time_to_move };

            if hunger.value >= herbivore::FORAGE_HUNGER && chase_food(ctx, entity, body, me) {
                return;
            }
            if try_counter_attack(ctx, entity, body, me) {
                return;
            }
            if hunger.value >= herbivore::IDLE_FORAGE_HUNGER
                && time_to_move <= 0.0
                && chase_food(ctx, entity, body, me)
            {
                return;
            }
            if time_to_move <= 0.0 {
                random_heading(body, &mut *ctx.rng, me.traits.idle_speed);
                me.state = HerbivoreState::Idle {
                    time_to_move: random_idle_time(&mut *ctx.rng, animal::IDLE_TIMER_MAX),
                };
            }
        }
        HerbivoreState::AttackCooldown { time_to_wait, target } => {
            let time_to_wait = time_to_wait - ctx.dt;
            me.state = HerbivoreState::AttackCooldown { time_to_wait, target };
            if time_to_wait <= 0.0 && !try_counter_attack(ctx, entity, body, me) {
                me.state = HerbivoreState::Idle { time_to_move: 0.0 };
            }
        }
        HerbivoreState::ChasingFood { target } => match resolve(ctx.world, target, Kind::Grass) {
            None => {
                me.state = HerbivoreState::Idle {
                    time_to_move: random_idle_time(&mut *ctx.rng, 1.0),
                };
            }
            Some(food) if body.collides_with(&food) => {
                body.velocity = Vec2::ZERO;
                me.state = HerbivoreState::Eating { target };
            }
            Some(food) => steer_towards(body, food.center, me.traits.chase_speed),
        },
        HerbivoreState::Eating { target } => {
            if resolve(ctx.world, target, Kind::Grass).is_none() {
                me.state = HerbivoreState::Idle {
                    time_to_move: random_idle_time(&mut *ctx.rng, 1.0),
                };
                return;
            }
            let eaten = match ctx.world.get::<&mut Health>(target) {
                Ok(mut food) => food.remove(me.traits.eat_speed * ctx.dt),
                Err(_) => 0.0,
            };
            hunger.relieve(eaten * herbivore::HEALTH_TO_HUNGER);
            if hunger.value <= 0.0 {
                me.state = HerbivoreState::Idle {
                    time_to_move: random_idle_time(&mut *ctx.rng, 0.5),
                };
            }
        }
    }
}

fn chase_food(ctx: &mut TickContext, entity: Entity, body: &Body, me: &mut Herbivore) -> bool {
    match find_close(ctx.world, &mut *ctx.rng, entity, body.center, Kind::Grass, |_, _, _| true) {
        Some(grass) => {
            me.state = HerbivoreState::ChasingFood { target: grass };
            true
        }
        None => false,
    }
}

/// Strike a nearby carnivore that is busy mauling someone (in its attack
/// cooldown), which also lets herbivores defend each other.
fn try_counter_attack(
    ctx: &mut TickContext,
    entity: Entity,
    body: &Body,
    me: &mut Herbivore,
) -> bool {
    let origin = *body;
    let striking = |world: &hecs::World, e: Entity, other: &Body| {
        let cooling_down = matches!(
            world.get::<&Carnivore>(e).map(|c| c.state),
            Ok(CarnivoreState::AttackCooldown { .. })
        );
        cooling_down
            && (origin.center.distance(&other.center) < herbivore::COUNTER_ATTACK_RANGE
                || origin.collides_with(other))
    };
    let found = find_close(
        ctx.world,
        &mut *ctx.rng,
        entity,
        origin.center,
        Kind::Carnivore,
        striking,
    );

    let Some(carnivore) = found else {
        return false;
    };
    if let Ok(mut health) = ctx.world.get::<&mut Health>(carnivore) {
        health.remove(me.traits.attack_damage);
    }
    me.state = HerbivoreState::AttackCooldown {
        time_to_wait: herbivore::ATTACK_COOLDOWN,
        target: carnivore,
    };
    true
}
