use crate::error::{ensure_same_length, Result};
use crate::rng::RandomNumberGenerator;

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn dsigmoid(y: f64) -> f64 {
    y * (1.0 - y)
}

/// Additive noise for each layer of a [`FeedForward`] pass.
///
/// Slots are added to the activations of the matching layer, bias units
/// excluded.
#[derive(Debug, Clone, PartialEq)]
pub struct Noise {
    pub input: Vec<f64>,
    pub hidden: Vec<f64>,
    pub output: Vec<f64>,
}

impl Noise {
    /// All-zero noise shaped for `network`.
    pub fn zeros(network: &FeedForward) -> Self {
        Self {
            input: vec![0.0; network.inputs()],
            hidden: vec![0.0; network.hidden()],
            output: vec![0.0; network.outputs()],
        }
    }
}

#[derive(Debug)]
struct Activations {
    input: Vec<f64>,
    hidden: Vec<f64>,
    /// d(hidden)/d(net input), dropout scaling included.
    hidden_slope: Vec<f64>,
    output: Vec<f64>,
}

/// Three-layer perceptron with bias units on the input and hidden layers,
/// sigmoid hidden units and a linear (regression) or sigmoid output layer.
///
/// Trained by per-pattern backpropagation with momentum.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedForward {
    inputs: usize,
    hidden: usize,
    outputs: usize,
    regression: bool,
    dropout: f64,
    /// `(inputs + 1) x hidden`, row-major.
    input_weights: Vec<f64>,
    /// `(hidden + 1) x outputs`, row-major.
    output_weights: Vec<f64>,
    input_changes: Vec<f64>,
    output_changes: Vec<f64>,
}

impl FeedForward {
    /// Creates a network with weights drawn uniformly from `[-1, 1)`.
    ///
    /// Layer sizes exclude the bias units, which are added internally.
    pub fn new(
        inputs: usize,
        hidden: usize,
        outputs: usize,
        regression: bool,
        dropout: f64,
        rng: &mut RandomNumberGenerator,
    ) -> Self {
        let mut network = Self {
            inputs,
            hidden,
            outputs,
            regression,
            dropout,
            input_weights: vec![0.0; (inputs + 1) * hidden],
            output_weights: vec![0.0; (hidden + 1) * outputs],
            input_changes: vec![0.0; (inputs + 1) * hidden],
            output_changes: vec![0.0; (hidden + 1) * outputs],
        };
        network.reinitialize(rng);
        network
    }

    pub fn inputs(&self) -> usize {
        self.inputs
    }

    pub fn hidden(&self) -> usize {
        self.hidden
    }

    pub fn outputs(&self) -> usize {
        self.outputs
    }

    /// Draws fresh weights and forgets the momentum history.
    pub fn reinitialize(&mut self, rng: &mut RandomNumberGenerator) {
        for weight in self
            .input_weights
            .iter_mut()
            .chain(self.output_weights.iter_mut())
        {
            *weight = rng.uniform(-1.0, 1.0);
        }
        self.input_changes.fill(0.0);
        self.output_changes.fill(0.0);
    }

    /// Returns `true` if every weight is finite.
    pub fn is_finite(&self) -> bool {
        self.input_weights
            .iter()
            .chain(&self.output_weights)
            .all(|w| w.is_finite())
    }

    /// Runs a forward pass.
    ///
    /// # Errors
    ///
    /// Returns `LengthMismatch` if `input` does not match the input layer.
    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        ensure_same_length(self.inputs, input.len())?;
        Ok(self.activate(input, None, None).output)
    }

    /// Runs a forward pass with `noise` added to each layer's activations.
    ///
    /// # Errors
    ///
    /// Returns `LengthMismatch` if `input` or any noise slot is mis-shaped.
    pub fn forward_with_noise(&self, input: &[f64], noise: &Noise) -> Result<Vec<f64>> {
        ensure_same_length(self.inputs, input.len())?;
        ensure_same_length(self.inputs, noise.input.len())?;
        ensure_same_length(self.hidden, noise.hidden.len())?;
        ensure_same_length(self.outputs, noise.output.len())?;
        Ok(self.activate(input, Some(noise), None).output)
    }

    /// Runs one backpropagation pass over `patterns` and returns the mean
    /// squared error observed during the pass.
    ///
    /// # Errors
    ///
    /// Returns `LengthMismatch` if a pattern does not fit the network. The
    /// patterns are checked before any weight changes.
    pub fn train_epoch(
        &mut self,
        patterns: &[(Vec<f64>, Vec<f64>)],
        learning_rate: f64,
        momentum: f64,
        rng: &mut RandomNumberGenerator,
    ) -> Result<f64> {
        for (input, target) in patterns {
            ensure_same_length(self.inputs, input.len())?;
            ensure_same_length(self.outputs, target.len())?;
        }
        if patterns.is_empty() || self.outputs == 0 {
            return Ok(0.0);
        }

        let mut total = 0.0;
        for (input, target) in patterns {
            let mask = self.dropout_mask(rng);
            let activations = self.activate(input, None, mask.as_deref());
            total += self.backpropagate(&activations, target, learning_rate, momentum);
        }

        Ok(total / (patterns.len() * self.outputs) as f64)
    }

    fn dropout_mask(&self, rng: &mut RandomNumberGenerator) -> Option<Vec<f64>> {
        if self.dropout <= 0.0 {
            return None;
        }
        let keep = 1.0 - self.dropout;
        Some(
            (0..self.hidden)
                .map(|_| if rng.chance(keep) { 1.0 / keep } else { 0.0 })
                .collect(),
        )
    }

    fn activate(&self, input: &[f64], noise: Option<&Noise>, mask: Option<&[f64]>) -> Activations {
        let mut ai = Vec::with_capacity(self.inputs + 1);
        for (i, &x) in input.iter().enumerate() {
            ai.push(x + noise.map_or(0.0, |n| n.input[i]));
        }
        ai.push(1.0);

        let mut ah = Vec::with_capacity(self.hidden + 1);
        let mut slope = Vec::with_capacity(self.hidden);
        for j in 0..self.hidden {
            let sum: f64 = ai
                .iter()
                .enumerate()
                .map(|(i, a)| a * self.input_weights[i * self.hidden + j])
                .sum();
            let y = sigmoid(sum);
            let scale = mask.map_or(1.0, |m| m[j]);
            ah.push(y * scale + noise.map_or(0.0, |n| n.hidden[j]));
            slope.push(dsigmoid(y) * scale);
        }
        ah.push(1.0);

        let mut ao = Vec::with_capacity(self.outputs);
        for k in 0..self.outputs {
            let sum: f64 = ah
                .iter()
                .enumerate()
                .map(|(j, a)| a * self.output_weights[j * self.outputs + k])
                .sum();
            let y = if self.regression { sum } else { sigmoid(sum) };
            ao.push(y + noise.map_or(0.0, |n| n.output[k]));
        }

        Activations {
            input: ai,
            hidden: ah,
            hidden_slope: slope,
            output: ao,
        }
    }

    fn backpropagate(
        &mut self,
        activations: &Activations,
        target: &[f64],
        learning_rate: f64,
        momentum: f64,
    ) -> f64 {
        let output_deltas: Vec<f64> = activations
            .output
            .iter()
            .zip(target)
            .map(|(&o, &t)| {
                let error = t - o;
                if self.regression {
                    error
                } else {
                    dsigmoid(o) * error
                }
            })
            .collect();

        let hidden_deltas: Vec<f64> = (0..self.hidden)
            .map(|j| {
                let error: f64 = output_deltas
                    .iter()
                    .enumerate()
                    .map(|(k, d)| d * self.output_weights[j * self.outputs + k])
                    .sum();
                activations.hidden_slope[j] * error
            })
            .collect();

        for (j, &a) in activations.hidden.iter().enumerate() {
            for (k, &delta) in output_deltas.iter().enumerate() {
                let index = j * self.outputs + k;
                let change = delta * a;
                self.output_weights[index] +=
                    learning_rate * change + momentum * self.output_changes[index];
                self.output_changes[index] = change;
            }
        }

        for (i, &a) in activations.input.iter().enumerate() {
            for (j, &delta) in hidden_deltas.iter().enumerate() {
                let index = i * self.hidden + j;
                let change = delta * a;
                self.input_weights[index] +=
                    learning_rate * change + momentum * self.input_changes[index];
                self.input_changes[index] = change;
            }
        }

        activations
            .output
            .iter()
            .zip(target)
            .map(|(o, t)| (t - o) * (t - o))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeneticError;

    fn identity(rows: &[[f64; 3]]) -> Vec<(Vec<f64>, Vec<f64>)> {
        rows.iter().map(|r| (r.to_vec(), r.to_vec())).collect()
    }

    #[test]
    fn test_shapes_and_initial_weights() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let network = FeedForward::new(4, 2, 4, true, 0.0, &mut rng);

        assert_eq!(network.input_weights.len(), 5 * 2);
        assert_eq!(network.output_weights.len(), 3 * 4);
        assert!(network
            .input_weights
            .iter()
            .chain(&network.output_weights)
            .all(|w| (-1.0..1.0).contains(w)));
        assert!(network.is_finite());
    }

    #[test]
    fn test_training_reduces_error() {
        let mut rng = RandomNumberGenerator::from_seed(2);
        let mut network = FeedForward::new(3, 2, 3, true, 0.0, &mut rng);
        let patterns = identity(&[[0.1, 0.5, 0.9], [0.2, 0.4, 0.6], [0.9, 0.5, 0.1]]);

        let first = network.train_epoch(&patterns, 0.05, 0.1, &mut rng).unwrap();
        let mut last = first;
        for _ in 0..500 {
            last = network.train_epoch(&patterns, 0.05, 0.1, &mut rng).unwrap();
        }

        assert!(last < first, "error went from {} to {}", first, last);
        assert!(network.is_finite());
    }

    #[test]
    fn test_output_noise_is_additive() {
        let mut rng = RandomNumberGenerator::from_seed(3);
        let network = FeedForward::new(3, 1, 3, true, 0.0, &mut rng);
        let input = [0.3, -0.2, 0.7];

        let clean = network.forward(&input).unwrap();
        let mut noise = Noise::zeros(&network);
        assert_eq!(network.forward_with_noise(&input, &noise).unwrap(), clean);

        noise.output = vec![1.0, -1.0, 0.5];
        let noisy = network.forward_with_noise(&input, &noise).unwrap();
        for k in 0..3 {
            assert!((noisy[k] - clean[k] - noise.output[k]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_sigmoid_output_stays_in_unit_interval() {
        let mut rng = RandomNumberGenerator::from_seed(4);
        let network = FeedForward::new(2, 2, 2, false, 0.0, &mut rng);
        let output = network.forward(&[5.0, -5.0]).unwrap();
        assert!(output.iter().all(|&o| o > 0.0 && o < 1.0));
    }

    #[test]
    fn test_dropout_training_stays_finite() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let mut network = FeedForward::new(3, 4, 3, true, 0.5, &mut rng);
        let patterns = identity(&[[0.1, 0.2, 0.3]]);

        for _ in 0..50 {
            let mse = network.train_epoch(&patterns, 0.1, 0.1, &mut rng).unwrap();
            assert!(mse.is_finite());
        }
    }

    #[test]
    fn test_shape_mismatch() {
        let mut rng = RandomNumberGenerator::from_seed(6);
        let mut network = FeedForward::new(3, 1, 3, true, 0.0, &mut rng);
        let before = network.clone();

        assert_eq!(
            network.forward(&[1.0]).unwrap_err(),
            GeneticError::LengthMismatch {
                expected: 3,
                actual: 1
            }
        );

        let patterns = vec![(vec![0.0; 3], vec![0.0; 3]), (vec![0.0; 2], vec![0.0; 3])];
        assert!(network.train_epoch(&patterns, 0.5, 0.5, &mut rng).is_err());
        assert_eq!(network, before);
    }
}
