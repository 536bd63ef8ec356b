use rand_distr::{Distribution, Normal};

use super::Mutator;
use crate::{
    error::{ensure_index, GeneticError, Result},
    genome::{Gene, Genome},
    rng::RandomNumberGenerator,
};

/// Adds a Normal(mean, std_dev) sample to one uniformly chosen gene.
///
/// Only numeric representations are supported; bit genomes are rejected with
/// `UnsupportedOperator`. Integer genes receive the rounded sample.
#[derive(Debug, Clone, Copy)]
pub struct GaussianMutator {
    std_dev: f64,
    mean: f64,
    normal: Normal<f64>,
}

impl GaussianMutator {
    /// Creates a Gaussian mutator.
    ///
    /// A zero `std_dev` yields `Ok(None)`: the mutator is disabled and callers
    /// should skip it rather than apply a no-op.
    ///
    /// ```rust
    /// use genmorph::mutation::GaussianMutator;
    ///
    /// assert!(GaussianMutator::new(0.0, 0.0).unwrap().is_none());
    /// assert!(GaussianMutator::new(0.4, 0.0).unwrap().is_some());
    /// assert!(GaussianMutator::new(-1.0, 0.0).is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error for a negative or non-finite `std_dev`,
    /// or a non-finite `mean`.
    pub fn new(std_dev: f64, mean: f64) -> Result<Option<Self>> {
        if std_dev == 0.0 {
            return Ok(None);
        }
        if !std_dev.is_finite() || std_dev < 0.0 || !mean.is_finite() {
            return Err(GeneticError::Configuration(format!(
                "Gaussian mutator needs a positive finite std_dev and a finite mean, \
                 got std_dev={} mean={}",
                std_dev, mean
            )));
        }

        let normal = Normal::new(mean, std_dev)
            .map_err(|e| GeneticError::Configuration(format!("Gaussian mutator: {}", e)))?;

        Ok(Some(Self {
            std_dev,
            mean,
            normal,
        }))
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }
}

impl<T: Gene> Mutator<T> for GaussianMutator {
    fn mutate(&self, genome: &Genome<T>, rng: &mut RandomNumberGenerator) -> Result<Genome<T>> {
        ensure_index(0, genome.len())?;

        let position = rng.gen_index(genome.len());
        let delta = self.normal.sample(&mut rng.rng);
        let value = genome.genes()[position].perturb(delta).ok_or_else(|| {
            GeneticError::UnsupportedOperator(format!(
                "{} requires numeric genes",
                <Self as Mutator<T>>::name(self)
            ))
        })?;

        let mut child = genome.clone();
        child.set(position, value)?;
        Ok(child)
    }

    fn name(&self) -> &'static str {
        "GaussianMutator"
    }
}
