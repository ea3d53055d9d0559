//! Target acquisition - proximity-weighted random choice among live agents.
//!
//! The nearest candidate gets weight 1 and every other candidate
//! `nearest_d² / d²`, so pursuit favors close targets without always
//! taking the closest one.

use hecs::{Entity, World};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::components::{Body, Health, Kind, Vec2};

/// Selection weight for each squared distance
pub fn selection_weights(distances_squared: &[f32]) -> Vec<f32> {
    let nearest = distances_squared
        .iter()
        .copied()
        .fold(f32::INFINITY, f32::min);

    distances_squared
        .iter()
        .map(|&d| {
            if d <= 0.0 {
                1.0
            } else if d.is_finite() {
                nearest / d
            } else {
                0.0
            }
        })
        .collect()
}

/// Draw one index with [`selection_weights`]; `None` for an empty set
pub fn pick_weighted(rng: &mut impl Rng, distances_squared: &[f32]) -> Option<usize> {
    if distances_squared.is_empty() {
        return None;
    }
    let weights = selection_weights(distances_squared);
    WeightedIndex::new(&weights).ok().map(|dist| dist.sample(rng))
}

/// Body of `target` if it is still a live agent of `kind`
pub fn resolve(world: &World, target: Entity, kind: Kind) -> Option<Body> {
    let mut query = world.query_one::<(&Kind, &Body, &Health)>(target).ok()?;
    let (k, body, health) = query.get()?;
    if *k != kind || health.is_dead() {
        return None;
    }
    Some(*body)
}

/// Pick a nearby live agent of `kind` passing `filter`.
///
/// Agents already at zero health are never candidates, nor is the seeker.
pub fn find_close<F>(
    world: &World,
    rng: &mut impl Rng,
    seeker: Entity,
    origin: Vec2,
    kind: Kind,
    mut filter: F,
) -> Option<Entity>
where
    F: FnMut(&World, Entity, &Body) -> bool,
{
    let live: Vec<(Entity, Body)> = world
        .query::<(&Kind, &Body, &Health)>()
        .iter()
        .filter(|(e, (k, _, health))| **k == kind && *e != seeker && !health.is_dead())
        .map(|(e, (_, body, _))| (e, *body))
        .collect();

    let candidates: Vec<(Entity, f32)> = live
        .into_iter()
        .filter(|(e, body)| filter(world, *e, body))
        .map(|(e, body)| (e, origin.distance_squared(&body.center)))
        .collect();

    let distances: Vec<f32> = candidates.iter().map(|(_, d)| *d).collect();
    pick_weighted(rng, &distances).map(|i| candidates[i].0)
}
