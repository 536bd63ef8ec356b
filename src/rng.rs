//! # RandomNumberGenerator
//!
//! The `RandomNumberGenerator` struct provides a small interface over the `rand`
//! crate for everything the operators need: uniform positions, fair coins,
//! Gaussian samples, and independent child generators for parallel work.
//!
//! ## Example
//!
//! ```rust
//! use genmorph::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(7);
//! let position = rng.gen_index(10);
//! assert!(position < 10);
//!
//! let value = rng.uniform(-1.0, 1.0);
//! assert!((-1.0..1.0).contains(&value));
//! ```
//!
//! ## Parallel work
//!
//! Each parallel task should own its generator. [`RandomNumberGenerator::fork`]
//! derives one from the parent so a seeded run stays reproducible:
//!
//! ```rust
//! use genmorph::rng::RandomNumberGenerator;
//!
//! let mut parent = RandomNumberGenerator::from_seed(42);
//! let children: Vec<_> = (0..4).map(|_| parent.fork()).collect();
//! assert_eq!(children.len(), 4);
//! ```

use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;

/// A wrapper around the `rand` crate's `StdRng` that provides the sampling
/// primitives used by the genetic operators.
#[derive(Clone, Debug)]
pub struct RandomNumberGenerator {
    pub rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a new `RandomNumberGenerator` instance seeded from the system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new `RandomNumberGenerator` instance with a specific seed.
    ///
    /// This is useful for reproducible tests and benchmarks.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Derives an independent generator seeded from this one.
    pub fn fork(&mut self) -> Self {
        Self::from_seed(self.rng.gen())
    }

    /// Returns a uniform position in `[0, n)`. `n` must be non-zero.
    pub fn gen_index(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }

    /// Returns a uniform sample in `[from, to)`.
    pub fn uniform(&mut self, from: f64, to: f64) -> f64 {
        self.rng.gen_range(from..to)
    }

    /// Flips a fair coin.
    pub fn coin(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }

    /// Returns `true` with probability `p` (clamped to `[0, 1]`).
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Draws a sample from the standard normal distribution.
    pub fn standard_normal(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}
