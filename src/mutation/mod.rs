//! # Mutator
//!
//! The `Mutator` trait defines the interface for strategies that perturb a
//! single genome without reference to any other genome.
//!
//! Mutators return a perturbed copy and leave the source untouched, so a
//! driver can keep the parent alongside its offspring.
//!
//! ## Example
//!
//! ```rust
//! use genmorph::genome::IntGenome;
//! use genmorph::mutation::{CompositeMutator, Mutator, ShiftMutator, SwitchMutator};
//! use genmorph::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(1);
//! let genome = IntGenome::new(vec![1, 2, 3, 4], |g: &[i64]| g[0] as f64, 0, 9).unwrap();
//!
//! let mut mutator = CompositeMutator::new();
//! mutator.add(ShiftMutator);
//! mutator.add(SwitchMutator);
//!
//! let child = mutator.mutate(&genome, &mut rng).unwrap();
//! assert_eq!(child.len(), 4);
//! assert_eq!(genome.genes(), &[1, 2, 3, 4]);
//! ```
pub mod composite;
pub mod gaussian;
pub mod shift;
pub mod switch;

use std::fmt::Debug;

use crate::{
    error::Result,
    genome::{Gene, Genome},
    rng::RandomNumberGenerator,
};

/// Perturbs one genome.
pub trait Mutator<T: Gene>: Debug + Send + Sync {
    /// Returns a mutated copy of `genome`. The copy is unscored.
    ///
    /// ## Errors
    ///
    /// - `IndexOutOfRange` for an empty genome.
    /// - `UnsupportedOperator` if the mutator cannot handle the representation.
    fn mutate(&self, genome: &Genome<T>, rng: &mut RandomNumberGenerator) -> Result<Genome<T>>;

    /// Human-readable name for logs and reports.
    fn name(&self) -> &'static str;
}

pub use composite::CompositeMutator;
pub use gaussian::GaussianMutator;
pub use shift::ShiftMutator;
pub use switch::SwitchMutator;
