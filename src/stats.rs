//! Online summary statistics for drivers that report on a run.

/// Running mean and variance of a stream of values.
///
/// ```
/// use genmorph::stats::Sketch;
///
/// let mut sketch = Sketch::new();
/// for score in [1.0, 2.0, 3.0, 4.0] {
///     sketch.add(score);
/// }
/// assert_eq!(sketch.average(), 2.5);
/// assert_eq!(sketch.variance(), 1.25);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sketch {
    sum: f64,
    squared: f64,
    count: u64,
}

impl Sketch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, x: f64) {
        self.sum += x;
        self.squared += x * x;
        self.count += 1;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean of the values added so far, `0.0` when empty.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }

    /// Population variance `E[x²] - E[x]²`, `0.0` when empty.
    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let average = self.average();
        self.squared / self.count as f64 - average * average
    }
}

impl Extend<f64> for Sketch {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            self.add(x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sketch() {
        let sketch = Sketch::new();
        assert_eq!(sketch.count(), 0);
        assert_eq!(sketch.average(), 0.0);
        assert_eq!(sketch.variance(), 0.0);
    }

    #[test]
    fn test_constant_stream_has_no_variance() {
        let mut sketch = Sketch::new();
        sketch.extend([3.0; 10]);
        assert_eq!(sketch.count(), 10);
        assert_eq!(sketch.average(), 3.0);
        assert!(sketch.variance().abs() < 1e-12);
    }

    #[test]
    fn test_mean_and_variance() {
        let mut sketch = Sketch::new();
        sketch.extend([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(sketch.average(), 5.0);
        assert!((sketch.variance() - 4.0).abs() < 1e-12);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let mut sketch = Sketch::new();
        sketch.extend([1.0, 2.0]);
        let json = serde_json::to_string(&sketch).unwrap();
        let restored: Sketch = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, sketch);
    }
}
