use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::Mutator;
use crate::{
    error::{GeneticError, Result},
    genome::{Gene, Genome},
    rng::RandomNumberGenerator,
};

/// Delegates each call to one uniformly chosen sub-mutator and counts how
/// often each one was applied.
///
/// Counters live as long as the composite, so one composite per run gives
/// per-run statistics. [`CompositeMutator::reset_stats`] starts over.
#[derive(Debug)]
pub struct CompositeMutator<T: Gene> {
    mutators: Vec<Box<dyn Mutator<T>>>,
    counts: Vec<AtomicUsize>,
}

impl<T: Gene> CompositeMutator<T> {
    pub fn new() -> Self {
        Self {
            mutators: Vec::new(),
            counts: Vec::new(),
        }
    }

    /// Appends a sub-mutator.
    pub fn add<M>(&mut self, mutator: M)
    where
        M: Mutator<T> + 'static,
    {
        self.mutators.push(Box::new(mutator));
        self.counts.push(AtomicUsize::new(0));
    }

    pub fn len(&self) -> usize {
        self.mutators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutators.is_empty()
    }

    /// Returns `(name, invocations)` for every sub-mutator, in insertion order.
    pub fn stats(&self) -> Vec<(&'static str, usize)> {
        self.mutators
            .iter()
            .zip(&self.counts)
            .map(|(mutator, count)| (mutator.name(), count.load(Ordering::Relaxed)))
            .collect()
    }

    /// Total number of successful invocations across all sub-mutators.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| c.load(Ordering::Relaxed)).sum()
    }

    pub fn reset_stats(&mut self) {
        for count in self.counts.iter_mut() {
            *count.get_mut() = 0;
        }
    }
}

impl<T: Gene> Default for CompositeMutator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Gene> Mutator<T> for CompositeMutator<T> {
    /// ## Errors
    ///
    /// Returns a `Configuration` error if no sub-mutator was added, and
    /// propagates the chosen sub-mutator's error (which is then not counted).
    fn mutate(&self, genome: &Genome<T>, rng: &mut RandomNumberGenerator) -> Result<Genome<T>> {
        if self.mutators.is_empty() {
            return Err(GeneticError::Configuration(
                "Composite mutator has no sub-mutators".to_string(),
            ));
        }

        let index = rng.gen_index(self.mutators.len());
        let child = self.mutators[index].mutate(genome, rng)?;
        self.counts[index].fetch_add(1, Ordering::Relaxed);

        Ok(child)
    }

    fn name(&self) -> &'static str {
        "CompositeMutator"
    }
}

impl<T: Gene> fmt::Display for CompositeMutator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, count)) in self.stats().into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, count)?;
        }
        Ok(())
    }
}
