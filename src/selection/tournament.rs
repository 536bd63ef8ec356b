use crate::error::{GeneticError, OptionExt, Result};
use crate::genome::{Gene, Genome};
use crate::rng::RandomNumberGenerator;
use crate::selection::selector::Selector;

/// A selection strategy that selects individuals through tournament selection.
///
/// Each call draws `contestants` genomes at random (with replacement) and
/// ranks them by score, lowest first. The best contestant wins with
/// probability `p_elite`; otherwise the next one gets the same chance, and so
/// on, with the last contestant taking whatever is left.
///
/// - Smaller `p_elite` or fewer contestants lead to more exploration
/// - Larger values lead to more exploitation
///
/// # Examples
///
/// ```
/// use genmorph::genome::Float64Genome;
/// use genmorph::rng::RandomNumberGenerator;
/// use genmorph::selection::{Selector, TournamentSelector};
///
/// let seed = Float64Genome::new(vec![0.0], |g: &[f64]| g[0], 0.0, 10.0).unwrap();
/// let population: Vec<_> = (0..10)
///     .map(|i| seed.with_genes(vec![i as f64]).unwrap())
///     .collect();
///
/// let selector = TournamentSelector::new(1.0, 10).unwrap();
/// let mut rng = RandomNumberGenerator::from_seed(3);
/// let winner = selector.select_one(&population, &mut rng).unwrap();
/// assert!(winner.genes()[0] < 10.0);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TournamentSelector {
    p_elite: f64,
    contestants: usize,
}

impl TournamentSelector {
    /// Creates a new tournament selector.
    ///
    /// # Arguments
    ///
    /// * `p_elite` - Probability that the best remaining contestant wins, in `(0, 1]`.
    /// * `contestants` - Number of individuals drawn per tournament. Must be at least 1.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if either argument is out of range.
    pub fn new(p_elite: f64, contestants: usize) -> Result<Self> {
        let selector = Self {
            p_elite,
            contestants,
        };
        selector.validate()?;
        Ok(selector)
    }

    /// Checks the parameters of a selector that did not come through
    /// [`TournamentSelector::new`], such as a deserialized one.
    pub fn validate(&self) -> Result<()> {
        if !(self.p_elite > 0.0 && self.p_elite <= 1.0) {
            return Err(GeneticError::Configuration(format!(
                "Tournament elite probability must be in (0, 1], got {}",
                self.p_elite
            )));
        }

        if self.contestants < 1 {
            return Err(GeneticError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn p_elite(&self) -> f64 {
        self.p_elite
    }

    pub fn contestants(&self) -> usize {
        self.contestants
    }
}

impl Default for TournamentSelector {
    fn default() -> Self {
        Self {
            p_elite: 0.7,
            contestants: 5,
        }
    }
}

impl<T: Gene> Selector<T> for TournamentSelector {
    fn select_one<'a>(
        &self,
        population: &'a [Genome<T>],
        rng: &mut RandomNumberGenerator,
    ) -> Result<&'a Genome<T>> {
        self.validate()?;
        if population.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }

        let mut participants: Vec<&'a Genome<T>> = (0..self.contestants)
            .map(|_| &population[rng.gen_index(population.len())])
            .collect();
        participants.sort_by(|a, b| a.score().total_cmp(&b.score()));

        let (last, leading) = participants
            .split_last()
            .ok_or_else_genetic(|| GeneticError::EmptyPopulation)?;

        for participant in leading {
            if rng.chance(self.p_elite) {
                return Ok(participant);
            }
        }

        Ok(last)
    }

    fn name(&self) -> &'static str {
        "TournamentSelector"
    }
}
