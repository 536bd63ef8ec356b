use super::Mutator;
use crate::{
    error::{ensure_index, Result},
    genome::{Gene, Genome},
    rng::RandomNumberGenerator,
};

/// Rotates the whole gene sequence right by a random offset in `[1, len)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShiftMutator;

impl<T: Gene> Mutator<T> for ShiftMutator {
    fn mutate(&self, genome: &Genome<T>, rng: &mut RandomNumberGenerator) -> Result<Genome<T>> {
        ensure_index(0, genome.len())?;

        let offset = if genome.len() > 1 {
            1 + rng.gen_index(genome.len() - 1)
        } else {
            0
        };

        let mut child = genome.clone();
        child.rotate(offset);
        Ok(child)
    }

    fn name(&self) -> &'static str {
        "ShiftMutator"
    }
}
