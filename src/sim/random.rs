//! Injectable randomness
//!
//! Every random draw in the simulation goes through `RandomSource`, so a
//! seeded generator reproduces a match exactly.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniform random numbers
pub trait RandomSource {
    /// Uniform sample in [0, 1)
    fn unit(&mut self) -> f32;

    /// Fair coin flip
    fn coin(&mut self) -> bool {
        self.unit() < 0.5
    }

    /// +1.0 or -1.0 with equal probability
    fn sign(&mut self) -> f32 {
        if self.coin() { 1.0 } else { -1.0 }
    }

    /// Uniform sample in [-1, 1)
    fn signed(&mut self) -> f32 {
        self.unit() * 2.0 - 1.0
    }
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// The generator used by live sessions
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}
