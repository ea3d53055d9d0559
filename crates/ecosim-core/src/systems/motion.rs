//! Motion system - force integration, steering and arena containment

use hecs::{Entity, World};
use rand::Rng;

use crate::components::{Body, Health, Kind, Rect, Vec2};
use crate::constants::{carnivore, herbivore};

/// Integrate one tick of motion.
///
/// Velocity picks up the smoothed base force plus this tick's external
/// force and is clamped to `max_speed`. The base force then drifts toward
/// the external force, so idle movement never reverses instantly.
pub fn integrate(body: &mut Body, external: Vec2, dt: f32) {
    body.velocity += (body.base_force + external) * dt;
    body.velocity = body.velocity.clamp_length(body.max_speed);
    body.base_force += (external - body.base_force) * dt;
    body.center += body.velocity;
}

/// Point straight at `target` at `speed`, bypassing the smoothing path
pub fn steer_towards(body: &mut Body, target: Vec2, speed: f32) {
    body.max_speed = speed;
    body.velocity = (target - body.center).normalize() * speed;
}

/// Pick a new random heading at `speed`, seeding the base force at half of it
pub fn random_heading(body: &mut Body, rng: &mut impl Rng, speed: f32) {
    let dir = Vec2::from_angle_degrees(rng.gen_range(0.0..360.0));
    body.velocity = dir * speed;
    body.base_force = dir * (speed / 2.0);
}

/// Bounce off the arena edges.
///
/// Edges are checked as one chain (left, right, top, bottom), so a body past
/// two edges at once only has one axis corrected this tick.
pub fn contain(body: &mut Body, bounds: &Rect) {
    if body.left() < bounds.left() {
        body.velocity.x = body.velocity.x.abs();
        body.base_force.x = body.base_force.x.abs();
    } else if body.right() > bounds.right() {
        body.velocity.x = -body.velocity.x.abs();
        body.base_force.x = -body.base_force.x.abs();
    } else if body.top() > bounds.top() {
        body.velocity.y = -body.velocity.y.abs();
        body.base_force.y = -body.base_force.y.abs();
    } else if body.bottom() < bounds.bottom() {
        body.velocity.y = body.velocity.y.abs();
        body.base_force.y = body.base_force.y.abs();
    }
}

/// Centers of every other live agent of `kind`
pub fn neighbor_centers(world: &World, me: Entity, kind: Kind) -> Vec<Vec2> {
    world
        .query::<(&Kind, &Body, &Health)>()
        .iter()
        .filter(|(e, (k, _, health))| **k == kind && *e != me && !health.is_dead())
        .map(|(_, (_, b, _))| b.center)
        .collect()
}

/// Herbivore flocking: pull toward neighbors beyond the comfort band,
/// push away from those inside it, ignore those within it.
pub fn flocking_force(center: Vec2, idle_speed: f32, neighbors: &[Vec2]) -> Vec2 {
    let mut force = Vec2::ZERO;
    let radius = herbivore::FLOCK_RADIUS;
    let far = herbivore::FLOCK_DESIRED_DISTANCE + herbivore::FLOCK_BUFFER;
    let near = herbivore::FLOCK_DESIRED_DISTANCE - herbivore::FLOCK_BUFFER;

    for other in neighbors {
        let offset = *other - center;
        let norm2 = offset.length_squared();
        if norm2 > radius * radius || norm2 == 0.0 {
            continue;
        }
        let norm = norm2.sqrt();

        let (dir, falloff, strength, exp) = if norm > far {
            (
                offset,
                (radius - norm) / (radius - far),
                herbivore::FLOCK_ATTRACT_STRENGTH,
                herbivore::FLOCK_ATTRACT_EXP,
            )
        } else if norm < near {
            (
                -offset,
                (near - norm) / near,
                herbivore::FLOCK_REPEL_STRENGTH,
                herbivore::FLOCK_REPEL_EXP,
            )
        } else {
            continue;
        };

        let mult = falloff.powf(exp) * idle_speed * strength;
        force += dir * (mult / norm);
    }

    force
}

/// Carnivore spacing: push away from every neighbor in range, total
/// clamped to `idle_speed`.
pub fn repulsion_force(center: Vec2, idle_speed: f32, neighbors: &[Vec2]) -> Vec2 {
    let mut force = Vec2::ZERO;
    let radius = carnivore::REPEL_RADIUS;

    for other in neighbors {
        let offset = center - *other;
        let norm2 = offset.length_squared();
        if norm2 > radius * radius || norm2 == 0.0 {
            continue;
        }
        let norm = norm2.sqrt();
        let falloff = ((radius - norm) / radius).powf(carnivore::REPEL_EXP);
        let mult = falloff * idle_speed * carnivore::REPEL_STRENGTH;
        force += offset * (mult / norm);
    }

    force.clamp_length(idle_speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;

    fn body_at(x: f32, y: f32) -> Body {
        let mut body = Body::from_left_top(0.0, 0.0, 10.0);
        body.center = Vec2::new(x, y);
        body
    }

    #[test]
    fn test_integrate_clamps_speed() {
        let mut body = body_at(0.0, 0.0);
        body.max_speed = 1.0;
        integrate(&mut body, Vec2::new(1000.0, 0.0), 1.0 / 60.0);
        assert!((body.velocity.length() - 1.0).abs() < 1e-5);
        assert!((body.center.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_base_force_smoothing() {
        let mut body = body_at(0.0, 0.0);
        let dt = 0.5;
        integrate(&mut body, Vec2::new(2.0, 0.0), dt);
        // Halfway from zero toward the external force
        assert_eq!(body.base_force, Vec2::new(1.0, 0.0));
        integrate(&mut body, Vec2::new(2.0, 0.0), dt);
        assert_eq!(body.base_force, Vec2::new(1.5, 0.0));
    }

    #[test]
    fn test_zero_force_keeps_still() {
        let mut body = body_at(5.0, 5.0);
        integrate(&mut body, Vec2::ZERO, 1.0 / 60.0);
        assert_eq!(body.center, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_steer_towards() {
        let mut body = body_at(0.0, 0.0);
        steer_towards(&mut body, Vec2::new(0.0, 10.0), 2.0);
        assert_eq!(body.velocity, Vec2::new(0.0, 2.0));
        assert_eq!(body.max_speed, 2.0);
    }

    #[test]
    fn test_random_heading_speed() {
        let mut rng = create_rng(3);
        let mut body = body_at(0.0, 0.0);
        random_heading(&mut body, &mut rng, 0.8);
        assert!((body.velocity.length() - 0.8).abs() < 1e-5);
        assert!((body.base_force.length() - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_contain_reflects_one_axis() {
        let bounds = Rect::from_size(100.0, 100.0);
        let mut body = body_at(2.0, 98.0); // past left and top
        body.velocity = Vec2::new(-1.0, 1.0);
        body.base_force = Vec2::new(-0.5, 0.5);

        contain(&mut body, &bounds);
        assert_eq!(body.velocity, Vec2::new(1.0, 1.0));
        assert_eq!(body.base_force, Vec2::new(0.5, 0.5));

        // Still past the left edge, so the top edge waits
        contain(&mut body, &bounds);
        assert_eq!(body.velocity, Vec2::new(1.0, 1.0));
        body.center = Vec2::new(50.0, 98.0);
        contain(&mut body, &bounds);
        assert_eq!(body.velocity, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_flocking_bands() {
        let center = Vec2::ZERO;

        // Far neighbor pulls inward
        let pull = flocking_force(center, 1.0, &[Vec2::new(250.0, 0.0)]);
        assert!(pull.x > 0.0);
        // (300 - 250) / 100 = 0.5, 0.5^0.75 * 2
        assert!((pull.x - 0.5f32.powf(0.75) * 2.0).abs() < 1e-4);

        // Neighbor in the comfort band is ignored
        assert_eq!(flocking_force(center, 1.0, &[Vec2::new(150.0, 0.0)]), Vec2::ZERO);

        // Close neighbor pushes away
        let push = flocking_force(center, 1.0, &[Vec2::new(0.0, 36.0)]);
        assert!(push.y < 0.0);
        assert!((push.y + 0.64f32.sqrt() * 5.0).abs() < 1e-4);

        // Out of range and coincident neighbors contribute nothing
        assert_eq!(flocking_force(center, 1.0, &[Vec2::new(301.0, 0.0), center]), Vec2::ZERO);
    }

    #[test]
    fn test_neighbor_centers_skip_dead() {
        let mut world = World::new();
        let me = world.spawn((Kind::Carnivore, body_at(0.0, 0.0), Health::new(50.0, 0.0)));
        world.spawn((Kind::Carnivore, body_at(10.0, 0.0), Health::new(0.0, 0.0)));
        world.spawn((Kind::Carnivore, body_at(20.0, 0.0), Health::new(40.0, 0.0)));
        world.spawn((Kind::Herbivore, body_at(30.0, 0.0), Health::new(40.0, 0.0)));

        assert_eq!(neighbor_centers(&world, me, Kind::Carnivore), vec![Vec2::new(20.0, 0.0)]);
    }

    #[test]
    fn test_repulsion_clamped() {
        let center = Vec2::ZERO;
        let crowd = vec![Vec2::new(1.0, 0.0); 10];
        let force = repulsion_force(center, 0.5, &crowd);
        assert!(force.x < 0.0);
        assert!((force.length() - 0.5).abs() < 1e-5);

        assert_eq!(repulsion_force(center, 0.5, &[Vec2::new(400.0, 0.0)]), Vec2::ZERO);
    }
}
