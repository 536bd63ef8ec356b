use super::Breeder;
use crate::{
    error::{ensure_same_length, Result},
    genome::{Gene, Genome},
    rng::RandomNumberGenerator,
};

/// Uniform crossover.
///
/// At every position a fair coin decides which parent child A inherits from;
/// child B takes the other parent's gene.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformBreeder;

impl UniformBreeder {
    pub fn new() -> Self {
        Self
    }
}

impl<T: Gene> Breeder<T> for UniformBreeder {
    fn breed(
        &self,
        a: &Genome<T>,
        b: &Genome<T>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<(Genome<T>, Genome<T>)> {
        ensure_same_length(a.len(), b.len())?;

        let mut ca = a.clone();
        let mut cb = b.clone();
        for i in 0..a.len() {
            if rng.coin() {
                ca.splice(b, i, i, 1)?;
                cb.splice(a, i, i, 1)?;
            }
        }
        ca.invalidate();
        cb.invalidate();

        Ok((ca, cb))
    }

    fn name(&self) -> &'static str {
        "UniformBreeder"
    }
}
