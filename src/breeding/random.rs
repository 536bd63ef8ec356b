use super::Breeder;
use crate::{
    error::{ensure_same_length, Result},
    genome::{Gene, Genome},
    rng::RandomNumberGenerator,
};

/// Baseline breeder for experiments: ignores recombination and returns a
/// randomized copy of each parent.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomBreeder;

impl RandomBreeder {
    pub fn new() -> Self {
        Self
    }
}

impl<T: Gene> Breeder<T> for RandomBreeder {
    fn breed(
        &self,
        a: &Genome<T>,
        b: &Genome<T>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<(Genome<T>, Genome<T>)> {
        ensure_same_length(a.len(), b.len())?;

        let mut ca = a.clone();
        ca.randomize(rng);
        let mut cb = b.clone();
        cb.randomize(rng);

        Ok((ca, cb))
    }

    fn name(&self) -> &'static str {
        "RandomBreeder"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::IntGenome;

    #[test]
    fn test_children_are_randomized_within_bounds() {
        let mut rng = RandomNumberGenerator::from_seed(8);
        let a = IntGenome::new(vec![100; 32], |_: &[i64]| 0.0, -5, 5).unwrap();
        let b = a.with_genes(vec![-100; 32]).unwrap();

        let (ca, cb) = RandomBreeder.breed(&a, &b, &mut rng).unwrap();

        assert!(ca.genes().iter().all(|g| (-5..=5).contains(g)));
        assert!(cb.genes().iter().all(|g| (-5..=5).contains(g)));
        assert_eq!(a.genes(), &[100; 32]);
        assert_eq!(b.genes(), &[-100; 32]);
    }
}
