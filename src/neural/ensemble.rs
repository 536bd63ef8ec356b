use std::sync::atomic::{AtomicBool, Ordering};

use rand::distributions::{Distribution, WeightedIndex};
use rayon::prelude::*;
use tracing::{debug, warn};

use super::network::{FeedForward, Noise};
use super::options::{ExpertSelection, MorphPolicy, NeuralOptions};
use super::Surrogate;
use crate::error::{ensure_same_length, GeneticError, OptionExt, Result};
use crate::genome::{Gene, Genome};
use crate::rng::RandomNumberGenerator;
use crate::selection::Selector;

/// Smallest training error used when scaling morph noise.
pub const MSE_FLOOR: f64 = 1e-6;

/// Training error recorded for an expert whose training diverged. Also the
/// upper clamp when scaling morph noise.
pub const MSE_CEILING: f64 = 1e12;

/// One regression network of a [`FeedForwardEnsemble`] and the mean squared
/// error of its most recent training pass.
#[derive(Debug, Clone)]
pub struct Expert {
    network: FeedForward,
    mse: f64,
}

impl Expert {
    fn new(width: usize, options: &NeuralOptions, rng: &mut RandomNumberGenerator) -> Self {
        Self {
            network: FeedForward::new(
                width,
                (width / 2).max(1),
                width,
                options.regression(),
                options.dropout(),
                rng,
            ),
            mse: 0.0,
        }
    }

    pub fn network(&self) -> &FeedForward {
        &self.network
    }

    /// Error of the last completed training epoch, `0.0` before any training.
    pub fn mse(&self) -> f64 {
        self.mse
    }

    /// The error clamped to `[MSE_FLOOR, MSE_CEILING]`, non-finite values
    /// mapping to the ceiling.
    pub fn effective_mse(&self) -> f64 {
        if self.mse.is_finite() {
            self.mse.clamp(MSE_FLOOR, MSE_CEILING)
        } else {
            MSE_CEILING
        }
    }

    fn train<T: Gene>(
        &mut self,
        index: usize,
        population: &[Genome<T>],
        selector: &dyn Selector<T>,
        options: &NeuralOptions,
        rng: &mut RandomNumberGenerator,
        cancel: &AtomicBool,
    ) -> Result<()> {
        if cancel.load(Ordering::Relaxed) {
            return Err(GeneticError::Cancelled);
        }

        let width = self.network.inputs();
        let mut patterns = Vec::with_capacity(options.sample_size());
        for _ in 0..options.sample_size() {
            let genome = selector.select_one(population, rng)?;
            ensure_same_length(width, genome.len())?;
            let genes: Vec<f64> = genome.genes().iter().map(|g| g.to_f64()).collect();
            patterns.push((genes.clone(), genes));
        }

        for epoch in 0..options.epochs() {
            if epoch > 0 && cancel.load(Ordering::Relaxed) {
                return Err(GeneticError::Cancelled);
            }

            let mse = self.network.train_epoch(
                &patterns,
                options.learning_rate(),
                options.momentum(),
                rng,
            )?;

            if !mse.is_finite() || !self.network.is_finite() {
                warn!(
                    expert = index,
                    mse,
                    "Expert diverged, reinitialising its weights"
                );
                self.network.reinitialize(rng);
                self.mse = MSE_CEILING;
                break;
            }
            self.mse = mse;
        }

        Ok(())
    }
}

/// A bank of independently trained feed-forward experts.
///
/// Each expert learns the identity mapping on a few elite genomes. A morph
/// runs a genome through one expert with noise injected on the input and
/// output layers, scaled by `noise / mse` of that expert.
#[derive(Debug, Clone)]
pub struct FeedForwardEnsemble {
    options: NeuralOptions,
    experts: Vec<Expert>,
    width: Option<usize>,
}

impl FeedForwardEnsemble {
    /// Creates an ensemble, sizing the experts right away if the options
    /// carry a width.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if the options are invalid.
    pub fn new(options: NeuralOptions, rng: &mut RandomNumberGenerator) -> Result<Self> {
        options.validate()?;

        let mut ensemble = Self {
            width: None,
            experts: Vec::new(),
            options,
        };
        if let Some(width) = ensemble.options.width() {
            ensemble.size(width, rng);
        }

        Ok(ensemble)
    }

    pub fn options(&self) -> &NeuralOptions {
        &self.options
    }

    /// The experts, empty until the ensemble is sized.
    pub fn experts(&self) -> &[Expert] {
        &self.experts
    }

    /// Genome width the experts were built for.
    pub fn width(&self) -> Option<usize> {
        self.width
    }

    fn size(&mut self, width: usize, rng: &mut RandomNumberGenerator) {
        self.experts = (0..self.options.experts())
            .map(|_| Expert::new(width, &self.options, rng))
            .collect();
        self.width = Some(width);

        debug!(
            experts = self.experts.len(),
            width,
            hidden = (width / 2).max(1),
            "Sized neural ensemble"
        );
    }

    /// Trains every expert concurrently and waits for all of them.
    ///
    /// Each expert draws `sample_size` genomes through `selector` with its own
    /// generator forked from `rng`. The flag is checked before sampling and
    /// between epochs; an interrupted expert keeps the state of its last
    /// completed epoch.
    ///
    /// # Errors
    ///
    /// - `EmptyPopulation` if `population` is empty.
    /// - `Configuration` if the ensemble must be sized from zero-width genomes.
    /// - `LengthMismatch` if a genome's width differs from the experts'.
    /// - `Cancelled` if `cancel` was raised, checked after all experts stop.
    /// - The first error reported by the selector otherwise.
    pub fn train_until<T: Gene>(
        &mut self,
        population: &[Genome<T>],
        selector: &dyn Selector<T>,
        rng: &mut RandomNumberGenerator,
        cancel: &AtomicBool,
    ) -> Result<()> {
        let first = population
            .first()
            .ok_or_else_genetic(|| GeneticError::EmptyPopulation)?;

        match self.width {
            Some(width) => ensure_same_length(width, first.len())?,
            None if first.is_empty() => {
                return Err(GeneticError::Configuration(
                    "Cannot size experts for zero-width genomes".to_string(),
                ))
            }
            None => self.size(first.len(), rng),
        }

        let rngs: Vec<RandomNumberGenerator> = self.experts.iter().map(|_| rng.fork()).collect();
        let options = &self.options;

        let results: Vec<Result<()>> = self
            .experts
            .par_iter_mut()
            .zip(rngs)
            .enumerate()
            .map(|(index, (expert, mut rng))| {
                expert.train(index, population, selector, options, &mut rng, cancel)
            })
            .collect();

        if cancel.load(Ordering::Relaxed) {
            debug!(selector = selector.name(), "Ensemble training cancelled");
            return Err(GeneticError::Cancelled);
        }
        results.into_iter().collect::<Result<Vec<()>>>()?;

        debug!(
            selector = selector.name(),
            mse = ?self.experts.iter().map(Expert::mse).collect::<Vec<_>>(),
            "Trained neural ensemble"
        );
        Ok(())
    }

    fn pick_expert(&self, rng: &mut RandomNumberGenerator) -> Result<&Expert> {
        let index = match self.options.expert_selection() {
            ExpertSelection::Uniform => rng.gen_index(self.experts.len()),
            ExpertSelection::InverseError => {
                let weights = self.experts.iter().map(|e| 1.0 / e.effective_mse());
                WeightedIndex::new(weights)
                    .map_err(|e| GeneticError::Configuration(e.to_string()))?
                    .sample(&mut rng.rng)
            }
        };

        self.experts
            .get(index)
            .ok_or_else_genetic(|| GeneticError::IndexOutOfRange {
                index,
                length: self.experts.len(),
            })
    }
}

/// Gaussian noise for one morph through `expert`: input and output slots
/// drawn with deviation `amplitude / effective_mse`, hidden slots left at zero.
fn morph_noise(expert: &Expert, amplitude: f64, rng: &mut RandomNumberGenerator) -> Noise {
    let scale = amplitude / expert.effective_mse();
    let mut noise = Noise::zeros(&expert.network);
    for slot in noise.input.iter_mut().chain(noise.output.iter_mut()) {
        *slot = scale * rng.standard_normal();
    }
    noise
}

impl<T: Gene> Surrogate<T> for FeedForwardEnsemble {
    fn train(
        &mut self,
        population: &[Genome<T>],
        selector: &dyn Selector<T>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<()> {
        let never = AtomicBool::new(false);
        self.train_until(population, selector, rng, &never)
    }

    /// ## Errors
    ///
    /// Returns a `Configuration` error if the ensemble has not been sized yet
    /// and `LengthMismatch` if the genome's width differs from the experts'.
    fn morph(&self, genome: &Genome<T>, rng: &mut RandomNumberGenerator) -> Result<Genome<T>> {
        let width = self.width.ok_or_else_genetic(|| {
            GeneticError::Configuration(
                "Neural ensemble has no width yet; set one or train it first".to_string(),
            )
        })?;
        ensure_same_length(width, genome.len())?;

        let expert = self.pick_expert(rng)?;
        let noise = morph_noise(expert, self.options.noise(), rng);

        let input: Vec<f64> = genome.genes().iter().map(|g| g.to_f64()).collect();
        let output = expert.network.forward_with_noise(&input, &noise)?;

        let mut child = genome.clone();
        match self.options.policy() {
            MorphPolicy::Whole => {
                for (index, &value) in output.iter().enumerate() {
                    if value.is_finite() {
                        child.set(index, T::from_f64(value))?;
                    }
                }
            }
            MorphPolicy::Single => {
                let count = (rng.standard_normal().trunc() as i64 + 1).max(1);
                for _ in 0..count {
                    let index = rng.gen_index(width);
                    if output[index].is_finite() {
                        child.set(index, T::from_f64(output[index]))?;
                    }
                }
            }
        }
        child.invalidate();

        Ok(child)
    }

    fn name(&self) -> &'static str {
        "FeedForwardEnsemble"
    }
}
