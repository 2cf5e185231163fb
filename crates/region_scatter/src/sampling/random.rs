//! Seeded random stream used for one placement call.
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::sampling::rand01;

/// Deterministic uniform draws from a 32-bit seed.
///
/// A stream is created per call and never shared, so the same seed and the same
/// sequence of draws always reproduce the same values. The generator is ChaCha8,
/// whose output for a given seed is fixed across releases and platforms.
#[derive(Debug, Clone)]
pub struct RandomStream {
    seed: i32,
    rng: ChaCha8Rng,
}

impl RandomStream {
    pub fn new(seed: i32) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed_bits(seed)),
        }
    }

    /// Resets the stream to the start of the sequence for `seed`.
    pub fn init(&mut self, seed: i32) {
        *self = Self::new(seed);
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_unit(&mut self) -> f32 {
        rand01(&mut self.rng)
    }

    /// Uniform float between `min` and `max`; returns `min` when the range is empty.
    pub fn next_float(&mut self, min: f32, max: f32) -> f32 {
        let u = self.next_unit();
        min + (max - min) * u
    }

    /// Uniform integer in `[min, max]` (inclusive); returns `min` when `max <= min`.
    pub fn next_int(&mut self, min: i32, max: i32) -> i32 {
        let u = self.next_unit();
        if max <= min {
            return min;
        }
        let span = (max as i64 - min as i64 + 1) as f64;
        let offset = ((u as f64) * span) as i64;
        (min as i64 + offset.min(span as i64 - 1)) as i32
    }
}

#[inline]
fn seed_bits(seed: i32) -> u64 {
    seed as u32 as u64
}
