use std::fmt::Debug;

use crate::error::Result;
use crate::genome::{Gene, Genome};
use crate::rng::RandomNumberGenerator;

/// Trait for selection strategies.
///
/// A selector picks one genome from a population. Its policy is opaque to the
/// operators that consume it; it may return the same genome repeatedly.
/// Selectors are shared across the ensemble's training tasks, so they must be
/// `Send + Sync` and keep any per-call state in the supplied generator.
///
/// # Examples
///
/// ```
/// use genmorph::error::Result;
/// use genmorph::genome::{Float64Genome, Gene, Genome};
/// use genmorph::rng::RandomNumberGenerator;
/// use genmorph::selection::Selector;
///
/// /// Always returns the best genome.
/// #[derive(Debug)]
/// struct Best;
///
/// impl<T: Gene> Selector<T> for Best {
///     fn select_one<'a>(
///         &self,
///         population: &'a [Genome<T>],
///         _rng: &mut RandomNumberGenerator,
///     ) -> Result<&'a Genome<T>> {
///         population
///             .iter()
///             .min_by(|a, b| a.score().total_cmp(&b.score()))
///             .ok_or(genmorph::error::GeneticError::EmptyPopulation)
///     }
///
///     fn name(&self) -> &'static str {
///         "Best"
///     }
/// }
///
/// let seed = Float64Genome::new(vec![3.0], |g: &[f64]| g[0].abs(), -5.0, 5.0).unwrap();
/// let population = vec![seed.clone(), seed.with_genes(vec![1.0]).unwrap()];
/// let mut rng = RandomNumberGenerator::from_seed(1);
///
/// assert_eq!(Best.select_one(&population, &mut rng).unwrap().genes(), &[1.0]);
/// ```
pub trait Selector<T: Gene>: Debug + Send + Sync {
    /// Selects one individual from the population.
    ///
    /// # Errors
    ///
    /// Returns `EmptyPopulation` if the population is empty.
    fn select_one<'a>(
        &self,
        population: &'a [Genome<T>],
        rng: &mut RandomNumberGenerator,
    ) -> Result<&'a Genome<T>>;

    /// Human-readable name for logs and reports.
    fn name(&self) -> &'static str;

    /// Selects `count` individuals, repeats allowed.
    fn select<'a>(
        &self,
        population: &'a [Genome<T>],
        count: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<&'a Genome<T>>> {
        (0..count)
            .map(|_| self.select_one(population, rng))
            .collect()
    }
}
