//! # Caching Module
//!
//! This module provides the two caches used around fitness evaluation:
//!
//! - [`ScoreCell`] is the per-genome memo. It holds at most one score and
//!   guarantees that concurrent readers trigger a single computation.
//! - [`CachedChallenge`] wraps a scoring function with a cache keyed by gene
//!   content, so distinct genome instances carrying identical genes share one
//!   evaluation.

use std::collections::HashMap;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::genome::{Challenge, Gene};

/// A memoized score with a single-flight guarantee.
///
/// The first caller of [`ScoreCell::get_or_compute`] runs the computation while
/// every concurrent caller blocks on the same cell and observes the published
/// value. Invalidation needs `&mut self`, so a cell can never be reset while
/// a reader holds it.
///
/// ```rust
/// use genmorph::caching::ScoreCell;
///
/// let mut cell = ScoreCell::new();
/// assert_eq!(cell.get(), None);
/// assert_eq!(cell.get_or_compute(|| 1.5), 1.5);
/// assert_eq!(cell.get_or_compute(|| 9.0), 1.5);
///
/// cell.invalidate();
/// assert_eq!(cell.get(), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScoreCell {
    value: OnceLock<f64>,
}

impl ScoreCell {
    /// Creates an empty cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the published score, if any.
    pub fn get(&self) -> Option<f64> {
        self.value.get().copied()
    }

    /// Returns the published score, computing it with `compute` if the cell is empty.
    pub fn get_or_compute<F>(&self, compute: F) -> f64
    where
        F: FnOnce() -> f64,
    {
        *self.value.get_or_init(compute)
    }

    /// Clears the cell.
    pub fn invalidate(&mut self) {
        self.value.take();
    }

    /// Returns `true` if a score has been published.
    pub fn is_set(&self) -> bool {
        self.value.get().is_some()
    }
}

/// A wrapper around a challenge that caches fitness evaluations by gene content.
///
/// The cache is shared between clones of the wrapper. Two callers racing on the
/// same unseen content may both evaluate it; the first published value wins.
#[derive(Debug, Clone)]
pub struct CachedChallenge<T, C>
where
    T: Gene,
    C: Challenge<T>,
{
    /// The wrapped challenge
    challenge: C,
    /// The cache of fitness evaluations
    cache: Arc<Mutex<HashMap<Vec<u64>, f64>>>,
    _marker: PhantomData<T>,
}

impl<T, C> CachedChallenge<T, C>
where
    T: Gene,
    C: Challenge<T>,
{
    /// Creates a new cached challenge wrapping the given challenge.
    pub fn new(challenge: C) -> Self {
        Self {
            challenge,
            cache: Arc::new(Mutex::new(HashMap::new())),
            _marker: PhantomData,
        }
    }

    /// Returns a reference to the wrapped challenge.
    pub fn inner(&self) -> &C {
        &self.challenge
    }

    /// Returns the number of cached fitness evaluations.
    pub fn cache_size(&self) -> usize {
        self.lock().len()
    }

    /// Clears the cache.
    pub fn clear_cache(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Vec<u64>, f64>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T, C> Challenge<T> for CachedChallenge<T, C>
where
    T: Gene,
    C: Challenge<T>,
{
    fn score(&self, genes: &[T]) -> f64 {
        let key: Vec<u64> = genes.iter().map(|gene| gene.cache_bits()).collect();

        let cached = self.lock().get(&key).copied();
        if let Some(score) = cached {
            return score;
        }

        // Evaluate outside of the lock so unrelated contents score in parallel
        let score = self.challenge.score(genes);
        *self.lock().entry(key).or_insert(score)
    }
}

/// Extension trait for wrapping a challenge with a content cache.
pub trait CachingChallenge<T: Gene>: Challenge<T> + Sized {
    /// Wraps this challenge in a [`CachedChallenge`].
    fn with_cache(self) -> CachedChallenge<T, Self> {
        CachedChallenge::new(self)
    }
}

impl<T, C> CachingChallenge<T> for C
where
    T: Gene,
    C: Challenge<T>,
{
}
