//! Learned perturbation.
//!
//! A [`Surrogate`] is trained on elite genomes drawn by a [`Selector`] and then
//! proposes new candidates by running a genome through what it learned
//! ("morphing"). [`FeedForwardEnsemble`] is a bank of small regression
//! networks trained concurrently on the rayon pool.
//!
//! ```
//! use genmorph::genome::Float64Genome;
//! use genmorph::neural::{FeedForwardEnsemble, NeuralOptions, Surrogate};
//! use genmorph::rng::RandomNumberGenerator;
//! use genmorph::selection::TournamentSelector;
//!
//! let mut rng = RandomNumberGenerator::from_seed(11);
//! let sum = |g: &[f64]| g.iter().sum::<f64>();
//! let mut seed = Float64Genome::new(vec![0.0; 6], sum, -1.0, 1.0).unwrap();
//! let population: Vec<_> = (0..10)
//!     .map(|_| {
//!         seed.randomize(&mut rng);
//!         seed.clone()
//!     })
//!     .collect();
//!
//! let options = NeuralOptions::builder().experts(3).build();
//! let mut ensemble = FeedForwardEnsemble::new(options, &mut rng).unwrap();
//! ensemble
//!     .train(&population, &TournamentSelector::default(), &mut rng)
//!     .unwrap();
//!
//! let child = ensemble.morph(&population[0], &mut rng).unwrap();
//! assert_eq!(child.len(), 6);
//! assert!(!child.is_scored());
//! ```

pub mod ensemble;
pub mod network;
pub mod options;

pub use ensemble::{Expert, FeedForwardEnsemble, MSE_CEILING, MSE_FLOOR};
pub use network::{FeedForward, Noise};
pub use options::{ExpertSelection, MorphPolicy, NeuralOptions, NeuralOptionsBuilder};

use std::fmt::Debug;

use crate::error::Result;
use crate::genome::{Gene, Genome};
use crate::rng::RandomNumberGenerator;
use crate::selection::Selector;

/// A trainable, learned alternative to a [`Mutator`](crate::mutation::Mutator).
pub trait Surrogate<T: Gene>: Debug + Send + Sync {
    /// Trains on genomes drawn from `population` by `selector`. Returns only
    /// after all training work has finished.
    fn train(
        &mut self,
        population: &[Genome<T>],
        selector: &dyn Selector<T>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<()>;

    /// Proposes a new genome derived from `genome`. The source is left
    /// untouched and the result is unscored.
    fn morph(&self, genome: &Genome<T>, rng: &mut RandomNumberGenerator) -> Result<Genome<T>>;

    fn name(&self) -> &'static str;
}
