//! Seeded randomness shared by every system.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

/// RNG type owned by the simulation
pub type SimRng = ChaCha12Rng;

/// Create a deterministic RNG from a seed.
pub fn create_rng(seed: u64) -> SimRng {
    ChaCha12Rng::seed_from_u64(seed)
}

/// Gaussian sample via Box-Muller.
pub fn gaussian(rng: &mut impl Rng, mean: f32, sigma: f32) -> f32 {
    let u1: f32 = rng.gen::<f32>().max(f32::EPSILON);
    let u2: f32 = rng.gen::<f32>();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
    mean + z * sigma
}
