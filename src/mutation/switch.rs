use super::Mutator;
use crate::{
    error::{ensure_index, Result},
    genome::{Gene, Genome},
    rng::RandomNumberGenerator,
};

/// Swaps two randomly chosen positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwitchMutator;

impl<T: Gene> Mutator<T> for SwitchMutator {
    fn mutate(&self, genome: &Genome<T>, rng: &mut RandomNumberGenerator) -> Result<Genome<T>> {
        ensure_index(0, genome.len())?;

        let x = rng.gen_index(genome.len());
        let y = rng.gen_index(genome.len());

        let mut child = genome.clone();
        child.swap(x, y)?;
        Ok(child)
    }

    fn name(&self) -> &'static str {
        "SwitchMutator"
    }
}
