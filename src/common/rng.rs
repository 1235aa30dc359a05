//! Seeded randomness for spawn offsets and target wander.

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Resource)]
pub struct GameRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Uniform point in the square `[-half_width, half_width]^2`.
    pub fn square_offset(&mut self, half_width: f32) -> Vec2 {
        if half_width <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            self.rng.random_range(-half_width..=half_width),
            self.rng.random_range(-half_width..=half_width),
        )
    }

    /// Uniform point inside a disc of the given radius.
    pub fn disc_point(&mut self, radius: f32) -> Vec2 {
        if radius <= 0.0 {
            return Vec2::ZERO;
        }
        let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
        let r = radius * self.rng.random_range(0.0f32..=1.0).sqrt();
        Vec2::new(angle.cos(), angle.sin()) * r
    }
}
