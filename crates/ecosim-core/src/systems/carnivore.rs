//! Carnivore behavior - hunting herbivores and scavenging carcasses.
//!
//! Unlike herbivores, the carnivore state machine keeps evaluating within
//! the same tick while a transition leaves something to resolve (a dead
//! target, an expired cooldown), so chained transitions show no lag.

use hecs::Entity;

use super::motion::{integrate, neighbor_centers, random_heading, repulsion_force, steer_towards};
use super::targeting::{find_close, resolve};
use super::vitals::{health_step, hunger_step};
use super::{read, write, TickContext};
use crate::components::*;
use crate::constants::{animal, carnivore};

/// Advance one carnivore by a tick: hunger, motion, health (and death),
/// procreation, then behavior.
pub fn update_carnivore(ctx: &mut TickContext, entity: Entity) {
    let (Some(mut body), Some(mut health), Some(mut hunger), Some(mut clock), Some(mut me)) = (
        read::<Body>(ctx.world, entity),
        read::<Health>(ctx.world, entity),
        read::<Hunger>(ctx.world, entity),
        read::<Procreation>(ctx.world, entity),
        read::<Carnivore>(ctx.world, entity),
    ) else {
        return;
    };

    hunger_step(&mut hunger, &mut health, ctx.dt);

    let external = match me.state {
        CarnivoreState::Idle { .. } => {
            body.max_speed = me.traits.idle_speed;
            let neighbors = neighbor_centers(ctx.world, entity, Kind::Carnivore);
            repulsion_force(body.center, me.traits.idle_speed, &neighbors)
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

    ctx.procreation_step(Kind::Carnivore, &body, &mut clock, &mut hunger);
    evaluate_carnivore(ctx, entity, &mut body, &health, &mut hunger, &mut me);

    write(ctx.world, entity, body);
    write(ctx.world, entity, health);
    write(ctx.world, entity, hunger);
    write(ctx.world, entity, clock);
    write(ctx.world, entity, me);
}

/// Run the state machine until it settles for this tick
pub fn evaluate_carnivore(
    ctx: &mut TickContext,
    entity: Entity,
    body: &mut Body,
    health: &Health,
    hunger: &mut Hunger,
    me: &mut Carnivore,
) {
    loop {
        match me.state {
            CarnivoreState::Idle { time_to_move } => {
                let time_to_move = time_to_move - ctx.dt;
                me.state = CarnivoreState::Idle { time_to_move };

                if wants_to_hunt(hunger, health, time_to_move) {
                    if let Some(target) = find_prey(ctx, entity, body) {
                        me.state = CarnivoreState::ChasingPrey { target };
                        return;
                    }
                }
                if time_to_move <= 0.0 {
                    random_heading(body, &mut *ctx.rng, me.traits.idle_speed);
                    me.state = CarnivoreState::Idle {
                        time_to_move: random_idle_time(&mut *ctx.rng, animal::IDLE_TIMER_MAX),
                    };
                }
                return;
            }
            CarnivoreState::ChasingPrey { target } => {
                let kind = match target {
                    Prey::Herbivore(_) => Kind::Herbivore,
                    Prey::Carcass(_) => Kind::Carcass,
                };
                let Some(prey) = resolve(ctx.world, target.entity(), kind) else {
                    me.state = CarnivoreState::Idle { time_to_move: 0.0 };
                    continue;
                };

                if body.collides_with(&prey) {
                    body.velocity = Vec2::ZERO;
                    me.state = match target {
                        Prey::Carcass(remains) => CarnivoreState::Eating { target: remains },
                        Prey::Herbivore(victim) => {
                            if let Ok(mut victim_health) = ctx.world.get::<&mut Health>(victim) {
                                victim_health.remove(me.traits.attack_damage);
                            }
                            CarnivoreState::AttackCooldown {
                                time_to_wait: carnivore::ATTACK_COOLDOWN,
                                target: victim,
                            }
                        }
                    };
                } else {
                    steer_towards(body, prey.center, me.traits.chase_speed);
                }
                return;
            }
            CarnivoreState::AttackCooldown { time_to_wait, target } => {
                let time_to_wait = time_to_wait - ctx.dt;
                if time_to_wait <= 0.0 {
                    me.state = CarnivoreState::ChasingPrey {
                        target: Prey::Herbivore(target),
                    };
                    continue;
                }
                me.state = CarnivoreState::AttackCooldown { time_to_wait, target };
                return;
            }
            CarnivoreState::Eating { target } => {
                if resolve(ctx.world, target, Kind::Carcass).is_none() {
                    me.state = CarnivoreState::Idle {
                        time_to_move: random_idle_time(&mut *ctx.rng, 1.0),
                    };
                    return;
                }
                let eaten = match ctx.world.get::<&mut Health>(target) {
                    Ok(mut remains) => remains.remove(me.traits.eat_speed * ctx.dt),
                    Err(_) => 0.0,
                };
                hunger.relieve(eaten * carnivore::HEALTH_TO_HUNGER);
                if hunger.value <= 0.0 {
                    me.state = CarnivoreState::Idle {
                        time_to_move: random_idle_time(&mut *ctx.rng, 1.0),
                    };
                }
                return;
            }
        }
    }
}

/// Hungry, peckish with nothing else to do, or starving faster than healing
pub fn wants_to_hunt(hunger: &Hunger, health: &Health, time_to_move: f32) -> bool {
    hunger.value >= carnivore::HUNT_HUNGER
        || (hunger.value >= carnivore::IDLE_HUNT_HUNGER && time_to_move <= 0.0)
        || hunger.value - health.value >= carnivore::STARVING_GAP
}

/// Carcasses first, live herbivores otherwise
fn find_prey(ctx: &mut TickContext, entity: Entity, body: &Body) -> Option<Prey> {
    let any = |_: &hecs::World, _: Entity, _: &Body| true;
    let remains = find_close(ctx.world, &mut *ctx.rng, entity, body.center, Kind::Carcass, any);
    if let Some(remains) = remains {
        return Some(Prey::Carcass(remains));
    }
    find_close(ctx.world, &mut *ctx.rng, entity, body.center, Kind::Herbivore, any)
        .map(Prey::Herbivore)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::fixture::Fixture;

    /// Run one evaluation with the carnivore's current components
    fn evaluate_once(fx: &mut Fixture, entity: Entity) -> (Body, Hunger, Carnivore) {
        let mut body = read::<Body>(&fx.world, entity).unwrap();
        let health = read::<Health>(&fx.world, entity).unwrap();
        let mut hunger = read::<Hunger>(&fx.world, entity).unwrap();
        let mut me = read::<Carnivore>(&fx.world, entity).unwrap();
        evaluate_carnivore(&mut fx.ctx(), entity, &mut body, &health, &mut hunger, &mut me);
        (body, hunger, me)
    }

    fn health_of(fx: &Fixture, entity: Entity) -> f32 {
        read::<Health>(&fx.world, entity).unwrap().value
    }

    #[test]
    fn test_bites_herbivore_on_contact() {
        let mut fx = Fixture::new(10);
        let hunter = fx.add(Kind::Carnivore, 100.0, 300.0);
        let herbivore = fx.add(Kind::Herbivore, 120.0, 300.0);
        fx.set::<Carnivore>(hunter, |c| {
            c.state = CarnivoreState::ChasingPrey {
                target: Prey::Herbivore(herbivore),
            }
        });

        let (body, _, me) = evaluate_once(&mut fx, hunter);

        assert_eq!(body.velocity, Vec2::ZERO);
        assert_eq!(
            me.state,
            CarnivoreState::AttackCooldown {
                time_to_wait: carnivore::ATTACK_COOLDOWN,
                target: herbivore,
            }
        );
        let expected = (100.0 - me.traits.attack_damage).max(0.0);
        assert!((health_of(&fx, herbivore) - expected).abs() < 1e-4);
    }

    #[test]
    fn test_cooldown_expiry_bites_again_same_tick() {
        let mut fx = Fixture::new(10);
        let hunter = fx.add(Kind::Carnivore, 100.0, 300.0);
        let herbivore = fx.add(Kind::Herbivore, 120.0, 300.0);
        fx.set::<Carnivore>(hunter, |c| {
            c.state = CarnivoreState::AttackCooldown {
                time_to_wait: 0.001,
                target: herbivore,
            }
        });

        let (_, _, me) = evaluate_once(&mut fx, hunter);

        assert_eq!(
            me.state,
            CarnivoreState::AttackCooldown {
                time_to_wait: carnivore::ATTACK_COOLDOWN,
                target: herbivore,
            }
        );
        let expected = (100.0 - me.traits.attack_damage).max(0.0);
        assert!((health_of(&fx, herbivore) - expected).abs() < 1e-4);
    }

    #[test]
    fn test_cooldown_counts_down() {
        let mut fx = Fixture::new(10);
        let hunter = fx.add(Kind::Carnivore, 100.0, 300.0);
        let herbivore = fx.add(Kind::Herbivore, 120.0, 300.0);
        fx.set::<Carnivore>(hunter, |c| {
            c.state = CarnivoreState::AttackCooldown {
                time_to_wait: 0.5,
                target: herbivore,
            }
        });

        let (_, _, me) = evaluate_once(&mut fx, hunter);

        assert!(matches!(
            me.state,
            CarnivoreState::AttackCooldown { time_to_wait, .. } if time_to_wait < 0.5
        ));
        assert_eq!(health_of(&fx, herbivore), 100.0);
    }

    #[test]
    fn test_prefers_carcass_over_herbivore() {
        let mut fx = Fixture::new(10);
        let hunter = fx.add(Kind::Carnivore, 100.0, 300.0);
        // The herbivore is much closer, yet the carcass still wins
        fx.add(Kind::Herbivore, 160.0, 300.0);
        let remains = fx.add(Kind::Carcass, 600.0, 700.0);
        fx.set::<Hunger>(hunter, |h| h.value = 60.0);

        for _ in 0..20 {
            fx.set::<Carnivore>(hunter, |c| {
                c.state = CarnivoreState::Idle { time_to_move: 3.0 }
            });
            let (_, _, me) = evaluate_once(&mut fx, hunter);
            assert_eq!(
                me.state,
                CarnivoreState::ChasingPrey {
                    target: Prey::Carcass(remains)
                }
            );
        }
    }

    #[test]
    fn test_carcass_contact_starts_eating() {
        let mut fx = Fixture::new(10);
        let hunter = fx.add(Kind::Carnivore, 100.0, 300.0);
        let remains = fx.add(Kind::Carcass, 120.0, 300.0);
        fx.set::<Carnivore>(hunter, |c| {
            c.state = CarnivoreState::ChasingPrey {
                target: Prey::Carcass(remains),
            }
        });

        let (_, _, me) = evaluate_once(&mut fx, hunter);
        assert_eq!(me.state, CarnivoreState::Eating { target: remains });
        assert_eq!(health_of(&fx, remains), 100.0);
    }

    #[test]
    fn test_eating_relieves_hunger() {
        let mut fx = Fixture::new(10);
        let hunter = fx.add(Kind::Carnivore, 100.0, 300.0);
        let remains = fx.add(Kind::Carcass, 120.0, 300.0);
        fx.set::<Carnivore>(hunter, |c| c.state = CarnivoreState::Eating { target: remains });
        fx.set::<Hunger>(hunter, |h| h.value = 50.0);

        let (_, hunger, me) = evaluate_once(&mut fx, hunter);

        let eaten = me.traits.eat_speed / 60.0;
        assert!((health_of(&fx, remains) - (100.0 - eaten)).abs() < 1e-4);
        assert!((hunger.value - (50.0 - eaten * carnivore::HEALTH_TO_HUNGER)).abs() < 1e-4);
        assert_eq!(me.state, CarnivoreState::Eating { target: remains });
    }

    #[test]
    fn test_full_carnivore_stops_eating() {
        let mut fx = Fixture::new(10);
        let hunter = fx.add(Kind::Carnivore, 100.0, 300.0);
        let remains = fx.add(Kind::Carcass, 120.0, 300.0);
        fx.set::<Carnivore>(hunter, |c| c.state = CarnivoreState::Eating { target: remains });
        fx.set::<Hunger>(hunter, |h| h.value = 0.05);

        let (_, hunger, me) = evaluate_once(&mut fx, hunter);

        assert_eq!(hunger.value, 0.0);
        assert!(matches!(
            me.state,
            CarnivoreState::Idle { time_to_move } if (0.25..=1.0).contains(&time_to_move)
        ));
    }

    #[test]
    fn test_wants_to_hunt() {
        let health = Health::new(100.0, 1.0);
        assert!(wants_to_hunt(&Hunger::new(50.0, 5.0), &health, 3.0));
        assert!(!wants_to_hunt(&Hunger::new(35.0, 5.0), &health, 3.0));
        assert!(wants_to_hunt(&Hunger::new(35.0, 5.0), &health, 0.0));

        // Starving faster than recovering
        let weak = Health::new(10.0, 1.0);
        assert!(wants_to_hunt(&Hunger::new(30.0, 5.0), &weak, 3.0));
        assert!(!wants_to_hunt(&Hunger::new(29.0, 5.0), &weak, 3.0));
    }
}
