//! Importance-weight flooring by rejection sampling.
//!
//! Tiny importance weights are numerically awkward for the base learner's loss.
//! Instead of dropping them, a weight `w < epsilon` is kept with probability
//! `w / epsilon` and, when kept, raised to exactly `epsilon`. The expected
//! weight stays `w`.
//!
//! Each draw derives a fresh seed from the configured seed and a draw counter,
//! so a run with a fixed seed replays the same keep/reject sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::stable_hash64_u64;

/// Default flooring threshold.
pub const DEFAULT_WEIGHT_FLOOR: f64 = 1e-5;

/// Outcome of [`WeightFloor::apply`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FloorDecision {
    /// Train with this weight.
    Keep(f64),
    /// Skip this training opportunity.
    Reject,
}

/// Seeded weight-flooring sampler.
#[derive(Debug, Clone)]
pub struct WeightFloor {
    epsilon: f64,
    seed: u64,
    draws: u64,
}

impl WeightFloor {
    pub fn new(epsilon: f64, seed: u64) -> Self {
        Self {
            epsilon,
            seed,
            draws: 0,
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of random draws taken so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Uniform draw in `[0, epsilon)`.
    fn draw(&mut self) -> f64 {
        let fresh = stable_hash64_u64(self.seed, self.draws);
        self.draws = self.draws.wrapping_add(1);
        StdRng::seed_from_u64(fresh).random::<f64>() * self.epsilon
    }

    /// Floor `weight`. Weights at or above `epsilon` pass through untouched and
    /// consume no randomness.
    pub fn apply(&mut self, weight: f64) -> FloorDecision {
        if weight >= self.epsilon {
            return FloorDecision::Keep(weight);
        }
        if self.draw() < weight {
            FloorDecision::Keep(self.epsilon)
        } else {
            FloorDecision::Reject
        }
    }
}

impl Default for WeightFloor {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHT_FLOOR, 0)
    }
}
