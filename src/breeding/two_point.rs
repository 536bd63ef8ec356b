//! # TwoPointBreeder
//!
//! Exchanges one contiguous block between the parents.
//! Example: parent A = 111111, parent B = 000000, child A = 110001.
use super::Breeder;
use crate::{
    error::{ensure_same_length, Result},
    genome::{Gene, Genome},
    rng::RandomNumberGenerator,
};

/// Draws two cut points uniformly, orders them, and crosses the parents over
/// the inclusive block between them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoPointBreeder;

impl TwoPointBreeder {
    pub fn new() -> Self {
        Self
    }
}

impl<T: Gene> Breeder<T> for TwoPointBreeder {
    fn breed(
        &self,
        a: &Genome<T>,
        b: &Genome<T>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<(Genome<T>, Genome<T>)> {
        ensure_same_length(a.len(), b.len())?;

        if a.is_empty() {
            let (mut ca, mut cb) = (a.clone(), b.clone());
            ca.invalidate();
            cb.invalidate();
            return Ok((ca, cb));
        }

        let mut p1 = rng.gen_index(a.len());
        let mut p2 = rng.gen_index(b.len());
        if p1 > p2 {
            std::mem::swap(&mut p1, &mut p2);
        }

        a.crossover(b, p1, p2)
    }

    fn name(&self) -> &'static str {
        "TwoPointBreeder"
    }
}
