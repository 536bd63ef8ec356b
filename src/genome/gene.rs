use std::fmt::Debug;

use rand::Rng;

use crate::rng::RandomNumberGenerator;

/// Element type of a [`Genome`](super::Genome).
///
/// Each representation decides how it is sampled, perturbed and mapped to and
/// from the `f64` space the neural surrogate works in. Operators stay generic
/// over this trait, so picking a representation picks its operator behaviour
/// at compile time.
pub trait Gene: Copy + Debug + PartialEq + PartialOrd + Send + Sync + 'static {
    /// Largest finite score of this representation. Substituted for
    /// non-finite scores so ordering stays total.
    const WORST_SCORE: f64;

    /// Draws a uniform value over `[min, max]`.
    fn sample(min: Self, max: Self, rng: &mut RandomNumberGenerator) -> Self;

    /// Adds `delta` to the gene, or returns `None` if the representation is
    /// not numeric.
    fn perturb(self, delta: f64) -> Option<Self>;

    fn to_f64(self) -> f64;

    fn from_f64(value: f64) -> Self;

    /// Bit pattern used as a content key by [`CachedChallenge`](crate::caching::CachedChallenge).
    fn cache_bits(self) -> u64;
}

impl Gene for f64 {
    const WORST_SCORE: f64 = f64::MAX;

    fn sample(min: Self, max: Self, rng: &mut RandomNumberGenerator) -> Self {
        // `max - min` overflows when the bounds span more than MAX
        let u = rng.rng.gen::<f64>();
        (min * (1.0 - u) + max * u).clamp(min, max)
    }

    fn perturb(self, delta: f64) -> Option<Self> {
        Some(self + delta)
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(value: f64) -> Self {
        value
    }

    fn cache_bits(self) -> u64 {
        self.to_bits()
    }
}

impl Gene for f32 {
    const WORST_SCORE: f64 = f32::MAX as f64;

    fn sample(min: Self, max: Self, rng: &mut RandomNumberGenerator) -> Self {
        // `max - min` overflows when the bounds span more than MAX
        let u = rng.rng.gen::<f32>();
        (min * (1.0 - u) + max * u).clamp(min, max)
    }

    fn perturb(self, delta: f64) -> Option<Self> {
        Some(self + delta as f32)
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_f64(value: f64) -> Self {
        value.clamp(f32::MIN as f64, f32::MAX as f64) as f32
    }

    fn cache_bits(self) -> u64 {
        self.to_bits() as u64
    }
}

impl Gene for i64 {
    const WORST_SCORE: f64 = f64::MAX;

    fn sample(min: Self, max: Self, rng: &mut RandomNumberGenerator) -> Self {
        rng.rng.gen_range(min..=max)
    }

    /// Rounds the delta to the nearest integer and saturates at the type limits.
    fn perturb(self, delta: f64) -> Option<Self> {
        Some(self.saturating_add(delta.round() as i64))
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_f64(value: f64) -> Self {
        value.round() as i64
    }

    fn cache_bits(self) -> u64 {
        self as u64
    }
}

impl Gene for bool {
    const WORST_SCORE: f64 = f64::MAX;

    /// Bounds are ignored; every bit is a fair coin.
    fn sample(_min: Self, _max: Self, rng: &mut RandomNumberGenerator) -> Self {
        rng.coin()
    }

    fn perturb(self, _delta: f64) -> Option<Self> {
        None
    }

    fn to_f64(self) -> f64 {
        if self {
            1.0
        } else {
            0.0
        }
    }

    fn from_f64(value: f64) -> Self {
        value > 0.5
    }

    fn cache_bits(self) -> u64 {
        self as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_stays_in_bounds() {
        let mut rng = RandomNumberGenerator::from_seed(3);
        for _ in 0..200 {
            let f = f64::sample(-2.0, 3.0, &mut rng);
            assert!((-2.0..=3.0).contains(&f));

            let s = f32::sample(0.0, 1.0, &mut rng);
            assert!((0.0..=1.0).contains(&s));

            let i = i64::sample(-10, 10, &mut rng);
            assert!((-10..=10).contains(&i));
        }
    }

    #[test]
    fn test_sample_over_full_float_range_is_finite() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let mut signs = (false, false);
        for _ in 0..200 {
            let f = f64::sample(-f64::MAX, f64::MAX, &mut rng);
            assert!(f.is_finite());
            signs.0 |= f < 0.0;
            signs.1 |= f > 0.0;

            let s = f32::sample(-f32::MAX, f32::MAX, &mut rng);
            assert!(s.is_finite());
        }
        assert!(signs.0 && signs.1);
    }

    #[test]
    fn test_integer_sample_hits_both_ends() {
        let mut rng = RandomNumberGenerator::from_seed(11);
        let draws: Vec<i64> = (0..500).map(|_| i64::sample(0, 1, &mut rng)).collect();
        assert!(draws.contains(&0));
        assert!(draws.contains(&1));
    }

    #[test]
    fn test_perturb() {
        assert_eq!(1.5f64.perturb(0.25), Some(1.75));
        assert_eq!(1.0f32.perturb(0.5), Some(1.5));
        assert_eq!(4i64.perturb(1.6), Some(6));
        assert_eq!(i64::MAX.perturb(10.0), Some(i64::MAX));
        assert_eq!(true.perturb(1.0), None);
    }

    #[test]
    fn test_f64_round_trip_conversions() {
        assert_eq!(i64::from_f64(2.6), 3);
        assert!(bool::from_f64(0.9));
        assert!(!bool::from_f64(0.1));
        assert_eq!(true.to_f64(), 1.0);
        assert_eq!(f32::from_f64(1e300), f32::MAX);
    }
}
