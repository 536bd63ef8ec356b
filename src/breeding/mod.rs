//! # Breeder
//!
//! The `Breeder` trait defines the interface for strategies that recombine two
//! parent genomes into two children.
//!
//! Every breeder follows the same contract:
//!
//! - parents are never modified,
//! - parents of different lengths fail fast with `LengthMismatch`,
//! - both children come back unscored.
pub mod random;
pub mod two_point;
pub mod uniform;

use std::fmt::Debug;

use crate::{
    error::Result,
    genome::{Gene, Genome},
    rng::RandomNumberGenerator,
};

/// # Breeder
///
/// Recombines two parents into two children.
pub trait Breeder<T: Gene>: Debug + Send + Sync {
    /// Breeds two children from `a` and `b`.
    ///
    /// ## Errors
    ///
    /// Returns `LengthMismatch` if the parents differ in length.
    fn breed(
        &self,
        a: &Genome<T>,
        b: &Genome<T>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<(Genome<T>, Genome<T>)>;

    /// Human-readable name for logs and reports.
    fn name(&self) -> &'static str;
}

pub use random::RandomBreeder;
pub use two_point::TwoPointBreeder;
pub use uniform::UniformBreeder;
