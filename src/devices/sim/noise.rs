//! Tracking imperfections for simulated devices: positional jitter and
//! momentary loss of tracking.

use crate::core::types::PoseMatrix;
use rand::prelude::*;
use rand::rngs::SmallRng;
use rand_distr::{Bernoulli, Distribution, Normal};

/// Seeded source of per-query tracking error. Seed 0 draws from entropy.
pub struct TrackingNoise {
    rng: SmallRng,
}

impl TrackingNoise {
    pub fn new(seed: u64) -> Self {
        let rng = if seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(seed)
        };
        Self { rng }
    }

    /// Whether this query loses tracking, at `rate` per query
    pub fn tracking_lost(&mut self, rate: f32) -> bool {
        if rate <= 0.0 {
            return false;
        }
        match Bernoulli::new(rate.min(1.0) as f64) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(_) => false,
        }
    }

    /// Offset the translation column by independent Gaussian jitter (meters).
    /// Rotation is left untouched.
    pub fn jitter_translation(&mut self, pose: &mut PoseMatrix, stddev: f32) {
        if stddev == 0.0 {
            return;
        }
        let Ok(normal) = Normal::new(0.0f32, stddev) else {
            return;
        };
        for row in pose.0.iter_mut() {
            row[3] += normal.sample(&mut self.rng);
        }
    }
}
