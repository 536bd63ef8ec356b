//! # Genome
//!
//! A [`Genome`] is one candidate solution: a fixed-length vector of genes, the
//! bounds used to randomize it, a shared reference to the scoring function and
//! a memoized score.
//!
//! The representation is chosen through the type parameter. The aliases
//! [`Float64Genome`], [`Float32Genome`], [`IntGenome`] and [`BitGenome`] cover
//! the supported encodings.
//!
//! ## Example
//!
//! ```rust
//! use genmorph::genome::Float64Genome;
//!
//! let sphere = |genes: &[f64]| genes.iter().map(|g| g * g).sum::<f64>();
//!
//! let a = Float64Genome::new(vec![1.0; 6], sphere, -1.0, 1.0).unwrap();
//! let b = a.with_genes(vec![0.0; 6]).unwrap();
//!
//! let (ca, cb) = a.crossover(&b, 2, 4).unwrap();
//! assert_eq!(ca.genes(), &[1.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
//! assert_eq!(cb.genes(), &[0.0, 0.0, 1.0, 1.0, 1.0, 0.0]);
//! assert_eq!(ca.score(), 3.0);
//! ```
//!
//! ## Scoring
//!
//! Scores are lower-is-better. [`Genome::score`] evaluates the challenge at most
//! once per gene content, even when many threads ask at the same time; every
//! operator that changes genes drops the memo.

pub mod gene;

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::caching::ScoreCell;
use crate::error::{ensure_index, ensure_same_length, GeneticError, Result};
use crate::rng::RandomNumberGenerator;

pub use gene::Gene;

/// A pure scoring function over gene values. Lower is better.
///
/// Implementations are shared by every genome of a lineage and may be called
/// from several threads at once. Any `Fn(&[T]) -> f64 + Send + Sync` closure
/// is a challenge.
pub trait Challenge<T>: Send + Sync {
    fn score(&self, genes: &[T]) -> f64;
}

impl<T, F> Challenge<T> for F
where
    F: Fn(&[T]) -> f64 + Send + Sync,
{
    fn score(&self, genes: &[T]) -> f64 {
        self(genes)
    }
}

/// A candidate solution with a lazily computed, memoized score.
#[derive(Clone)]
pub struct Genome<T: Gene> {
    genes: Vec<T>,
    min: T,
    max: T,
    challenge: Arc<dyn Challenge<T>>,
    score: ScoreCell,
}

pub type Float64Genome = Genome<f64>;
pub type Float32Genome = Genome<f32>;
pub type IntGenome = Genome<i64>;
pub type BitGenome = Genome<bool>;

impl<T: Gene> Genome<T> {
    /// Creates a genome owning `challenge`.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if `min > max` or either bound is not finite.
    pub fn new<C>(genes: Vec<T>, challenge: C, min: T, max: T) -> Result<Self>
    where
        C: Challenge<T> + 'static,
    {
        Self::with_shared_challenge(genes, Arc::new(challenge), min, max)
    }

    /// Creates a genome that shares an existing challenge.
    pub fn with_shared_challenge(
        genes: Vec<T>,
        challenge: Arc<dyn Challenge<T>>,
        min: T,
        max: T,
    ) -> Result<Self> {
        if !(min <= max) || !min.to_f64().is_finite() || !max.to_f64().is_finite() {
            return Err(GeneticError::Configuration(format!(
                "Invalid gene bounds [{:?}, {:?}]",
                min, max
            )));
        }

        Ok(Self {
            genes,
            min,
            max,
            challenge,
            score: ScoreCell::new(),
        })
    }

    /// Creates an unscored genome of the same lineage (challenge and bounds) carrying `genes`.
    pub fn with_genes(&self, genes: Vec<T>) -> Result<Self> {
        Self::with_shared_challenge(genes, Arc::clone(&self.challenge), self.min, self.max)
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn genes(&self) -> &[T] {
        &self.genes
    }

    /// Returns the `(min, max)` range used by [`Genome::randomize`].
    pub fn bounds(&self) -> (T, T) {
        (self.min, self.max)
    }

    pub fn challenge(&self) -> &Arc<dyn Challenge<T>> {
        &self.challenge
    }

    /// Two-point crossover over the inclusive range `[p1, p2]`.
    ///
    /// Returns a copy of `self` carrying `other`'s genes inside the range and a
    /// copy of `other` carrying `self`'s. Neither input is modified and both
    /// children are unscored.
    ///
    /// # Errors
    ///
    /// - `LengthMismatch` if the genomes differ in length.
    /// - `IndexOutOfRange` unless `p1 <= p2 < len`.
    pub fn crossover(&self, other: &Self, p1: usize, p2: usize) -> Result<(Self, Self)> {
        ensure_same_length(self.len(), other.len())?;
        ensure_index(p2, self.len())?;
        if p1 > p2 {
            return Err(GeneticError::IndexOutOfRange {
                index: p1,
                length: p2 + 1,
            });
        }

        let mut ca = self.clone();
        let mut cb = other.clone();
        ca.genes[p1..=p2].copy_from_slice(&other.genes[p1..=p2]);
        cb.genes[p1..=p2].copy_from_slice(&self.genes[p1..=p2]);
        ca.invalidate();
        cb.invalidate();

        Ok((ca, cb))
    }

    /// Copies `length` genes from `source[from..]` into `self[to..]`.
    ///
    /// # Errors
    ///
    /// - `LengthMismatch` if the genomes differ in length.
    /// - `IndexOutOfRange` if either range runs past the end.
    pub fn splice(&mut self, source: &Self, from: usize, to: usize, length: usize) -> Result<()> {
        ensure_same_length(self.len(), source.len())?;
        let from_end = range_end(from, length, source.len())?;
        let to_end = range_end(to, length, self.len())?;

        self.genes[to..to_end].copy_from_slice(&source.genes[from..from_end]);
        self.invalidate();
        Ok(())
    }

    /// Overwrites every gene with an independent uniform sample over the bounds.
    pub fn randomize(&mut self, rng: &mut RandomNumberGenerator) {
        let (min, max) = (self.min, self.max);
        for gene in self.genes.iter_mut() {
            *gene = T::sample(min, max, rng);
        }
        self.invalidate();
    }

    /// Exchanges the genes at `x` and `y`.
    pub fn swap(&mut self, x: usize, y: usize) -> Result<()> {
        ensure_index(x, self.len())?;
        ensure_index(y, self.len())?;
        self.genes.swap(x, y);
        self.invalidate();
        Ok(())
    }

    /// Replaces the gene at `index`.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        ensure_index(index, self.len())?;
        self.genes[index] = value;
        self.invalidate();
        Ok(())
    }

    /// Rotates the genes `offset` positions to the right.
    pub fn rotate(&mut self, offset: usize) {
        if !self.genes.is_empty() {
            let offset = offset % self.genes.len();
            self.genes.rotate_right(offset);
        }
        self.invalidate();
    }

    /// Returns the score, evaluating the challenge on first use.
    ///
    /// Concurrent callers on the same genome share one evaluation. A non-finite
    /// result is replaced by [`Gene::WORST_SCORE`].
    pub fn score(&self) -> f64 {
        self.score.get_or_compute(|| {
            let raw = self.challenge.score(&self.genes);
            if raw.is_finite() {
                raw
            } else {
                warn!(
                    score = raw,
                    "non-finite score replaced by the worst finite value"
                );
                T::WORST_SCORE
            }
        })
    }

    pub fn cached_score(&self) -> Option<f64> {
        self.score.get()
    }

    pub fn is_scored(&self) -> bool {
        self.score.is_set()
    }

    /// Drops the memoized score.
    pub fn invalidate(&mut self) {
        self.score.invalidate();
    }
}

impl<T: Gene> fmt::Debug for Genome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Genome")
            .field("genes", &self.genes)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("score", &self.score.get())
            .finish()
    }
}

fn range_end(start: usize, length: usize, total: usize) -> Result<usize> {
    match start.checked_add(length) {
        Some(end) if end <= total => Ok(end),
        _ => Err(GeneticError::IndexOutOfRange {
            index: start.saturating_add(length),
            length: total,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    fn counted(counter: &Arc<AtomicUsize>) -> impl Fn(&[f64]) -> f64 + Send + Sync + 'static {
        let counter = Arc::clone(counter);
        move |genes: &[f64]| {
            counter.fetch_add(1, Ordering::SeqCst);
            genes.iter().sum()
        }
    }

    fn pair(counter: &Arc<AtomicUsize>) -> (Float64Genome, Float64Genome) {
        let a = Genome::new(vec![1.0; 6], counted(counter), -1.0, 1.0).unwrap();
        let b = a.with_genes(vec![0.0; 6]).unwrap();
        (a, b)
    }

    #[test]
    fn test_crossover_scenario() {
        let counter = Arc::new(AtomicUsize::new(0));
        let (a, b) = pair(&counter);

        let (ca, cb) = a.crossover(&b, 2, 4).unwrap();

        assert_eq!(ca.genes(), &[1.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
        assert_eq!(cb.genes(), &[0.0, 0.0, 1.0, 1.0, 1.0, 0.0]);
        assert_eq!(a.genes(), &[1.0; 6]);
        assert_eq!(b.genes(), &[0.0; 6]);
        assert!(!ca.is_scored());
        assert!(!cb.is_scored());
    }

    #[test]
    fn test_crossover_single_point_and_full_range() {
        let counter = Arc::new(AtomicUsize::new(0));
        let (a, b) = pair(&counter);

        let (ca, _) = a.crossover(&b, 3, 3).unwrap();
        assert_eq!(ca.genes(), &[1.0, 1.0, 1.0, 0.0, 1.0, 1.0]);

        let (ca, cb) = a.crossover(&b, 0, 5).unwrap();
        assert_eq!(ca.genes(), b.genes());
        assert_eq!(cb.genes(), a.genes());
    }

    #[test]
    fn test_crossover_errors() {
        let counter = Arc::new(AtomicUsize::new(0));
        let (a, _) = pair(&counter);
        let short = a.with_genes(vec![0.0; 5]).unwrap();

        assert_eq!(
            a.crossover(&short, 0, 1).unwrap_err(),
            GeneticError::LengthMismatch {
                expected: 6,
                actual: 5
            }
        );

        let other = a.with_genes(vec![0.0; 6]).unwrap();
        assert!(matches!(
            a.crossover(&other, 0, 6),
            Err(GeneticError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            a.crossover(&other, 4, 2),
            Err(GeneticError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_splice() {
        let counter = Arc::new(AtomicUsize::new(0));
        let (mut a, b) = pair(&counter);

        a.splice(&b, 0, 4, 2).unwrap();
        assert_eq!(a.genes(), &[1.0, 1.0, 1.0, 1.0, 0.0, 0.0]);

        assert!(matches!(
            a.splice(&b, 5, 0, 2),
            Err(GeneticError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            a.splice(&b, 0, 5, 2),
            Err(GeneticError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            a.splice(&b, usize::MAX, 0, 2),
            Err(GeneticError::IndexOutOfRange { .. })
        ));

        // A failed splice leaves the genes untouched
        assert_eq!(a.genes(), &[1.0, 1.0, 1.0, 1.0, 0.0, 0.0]);

        let short = a.with_genes(vec![0.0; 3]).unwrap();
        assert!(matches!(
            a.splice(&short, 0, 0, 1),
            Err(GeneticError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_operators_invalidate_score() {
        let counter = Arc::new(AtomicUsize::new(0));
        let (mut a, b) = pair(&counter);
        let mut rng = RandomNumberGenerator::from_seed(1);

        a.score();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        a.score();
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        a.splice(&b, 0, 0, 1).unwrap();
        a.score();
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        a.swap(0, 1).unwrap();
        a.score();
        assert_eq!(counter.load(Ordering::SeqCst), 3);

        a.randomize(&mut rng);
        a.score();
        assert_eq!(counter.load(Ordering::SeqCst), 4);

        let (ca, _) = a.crossover(&b, 0, 0).unwrap();
        ca.score();
        assert_eq!(counter.load(Ordering::SeqCst), 5);

        a.set(2, 0.5).unwrap();
        a.score();
        assert_eq!(counter.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_concurrent_score_is_single_flight() {
        let counter = Arc::new(AtomicUsize::new(0));
        let slow = {
            let counter = Arc::clone(&counter);
            move |genes: &[f64]| {
                counter.fetch_add(1, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(20));
                genes.iter().sum::<f64>()
            }
        };
        let genome = Genome::new(vec![1.0, 2.0, 3.0], slow, 0.0, 10.0).unwrap();
        let threads = 16;
        let barrier = Barrier::new(threads);

        let scores: Vec<f64> = thread::scope(|scope| {
            let handles: Vec<_> = (0..threads)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        genome.score()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(scores.iter().all(|s| *s == 6.0));
    }

    #[test]
    fn test_clone_preserves_score_and_shares_challenge() {
        let counter = Arc::new(AtomicUsize::new(0));
        let (a, _) = pair(&counter);
        a.score();

        let copy = a.clone();
        assert_eq!(copy.cached_score(), Some(6.0));
        copy.score();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(a.challenge(), copy.challenge()));
    }

    #[test]
    fn test_non_finite_scores_become_worst() {
        let nan = Float64Genome::new(vec![1.0], |_: &[f64]| f64::NAN, 0.0, 1.0).unwrap();
        assert_eq!(nan.score(), f64::MAX);

        let inf = Float32Genome::new(vec![1.0], |_: &[f32]| f64::INFINITY, 0.0, 1.0).unwrap();
        assert_eq!(inf.score(), f32::MAX as f64);
    }

    #[test]
    fn test_invalid_bounds() {
        let score = |_: &[f64]| 0.0;
        assert!(matches!(
            Float64Genome::new(vec![0.0], score, 1.0, -1.0),
            Err(GeneticError::Configuration(_))
        ));
        assert!(Float64Genome::new(vec![0.0], score, f64::NAN, 1.0).is_err());
        assert!(Float64Genome::new(vec![0.0], score, 0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_randomize_respects_bounds() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let mut genome = IntGenome::new(vec![0; 100], |_: &[i64]| 0.0, -10, 10).unwrap();
        genome.randomize(&mut rng);
        assert!(genome.genes().iter().all(|g| (-10..=10).contains(g)));

        let mut bits = BitGenome::new(vec![false; 200], |_: &[bool]| 0.0, false, true).unwrap();
        bits.randomize(&mut rng);
        assert!(bits.genes().iter().any(|b| *b));
        assert!(bits.genes().iter().any(|b| !*b));
    }

    #[test]
    fn test_randomize_over_widest_float_bounds() {
        let mut rng = RandomNumberGenerator::from_seed(6);
        let mut wide =
            Float64Genome::new(vec![0.0; 16], |_: &[f64]| 0.0, -f64::MAX, f64::MAX).unwrap();
        wide.randomize(&mut rng);
        assert!(wide.genes().iter().all(|g| g.is_finite()));

        let mut narrow =
            Float32Genome::new(vec![0.0; 16], |_: &[f32]| 0.0, -f32::MAX, f32::MAX).unwrap();
        narrow.randomize(&mut rng);
        assert!(narrow.genes().iter().all(|g| g.is_finite()));
    }

    #[test]
    fn test_rotate() {
        let mut genome = IntGenome::new(vec![1, 2, 3, 4], |_: &[i64]| 0.0, 0, 9).unwrap();
        genome.rotate(1);
        assert_eq!(genome.genes(), &[4, 1, 2, 3]);
        genome.rotate(7);
        assert_eq!(genome.genes(), &[1, 2, 3, 4]);
    }
}
