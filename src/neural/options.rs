//! # NeuralOptions
//!
//! The `NeuralOptions` struct holds the configuration of a
//! [`FeedForwardEnsemble`](super::FeedForwardEnsemble): how many experts it
//! owns, how they are sized and trained, and how a morph applies their output.
//!
//! ## Example
//!
//! ```rust
//! use genmorph::neural::{MorphPolicy, NeuralOptions};
//!
//! let defaults = NeuralOptions::default();
//! assert_eq!(defaults.experts(), 8);
//!
//! let options = NeuralOptions::builder()
//!     .experts(4)
//!     .width(16)
//!     .noise(0.01)
//!     .policy(MorphPolicy::Single)
//!     .build();
//! assert_eq!(options.width(), Some(16));
//! ```
//!
//! Values are validated when the ensemble is created, not when the options
//! are built.

use crate::error::{GeneticError, Result};

/// How a morph writes the network's output into the copy of the source genome.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MorphPolicy {
    /// Every position takes the network's output.
    #[default]
    Whole,
    /// A small random subset of positions takes the output.
    Single,
}

/// How a morph chooses the expert it runs.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpertSelection {
    /// Every expert is equally likely.
    #[default]
    Uniform,
    /// Experts are weighted by the inverse of their last training error.
    InverseError,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct NeuralOptions {
    experts: usize,
    width: Option<usize>,
    noise: f64,
    dropout: f64,
    regression: bool,
    learning_rate: f64,
    momentum: f64,
    epochs: usize,
    sample_size: usize,
    policy: MorphPolicy,
    expert_selection: ExpertSelection,
}

impl NeuralOptions {
    /// Number of experts in the ensemble.
    pub fn experts(&self) -> usize {
        self.experts
    }

    /// Genome width the experts are built for, or `None` to size them on the
    /// first training call.
    pub fn width(&self) -> Option<usize> {
        self.width
    }

    /// Noise amplitude injected by a morph before scaling by the expert's error.
    pub fn noise(&self) -> f64 {
        self.noise
    }

    /// Probability of dropping a hidden unit during training.
    pub fn dropout(&self) -> f64 {
        self.dropout
    }

    /// Linear output layer when `true`, sigmoid otherwise.
    pub fn regression(&self) -> bool {
        self.regression
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn momentum(&self) -> f64 {
        self.momentum
    }

    /// Backpropagation passes per expert and training call.
    pub fn epochs(&self) -> usize {
        self.epochs
    }

    /// Elite genomes drawn per expert and training call.
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn policy(&self) -> MorphPolicy {
        self.policy
    }

    pub fn expert_selection(&self) -> ExpertSelection {
        self.expert_selection
    }

    /// Returns a builder for creating a `NeuralOptions` instance.
    pub fn builder() -> NeuralOptionsBuilder {
        NeuralOptionsBuilder::default()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.experts == 0 {
            return Err(GeneticError::Configuration(
                "Ensemble needs at least one expert".to_string(),
            ));
        }
        if self.width == Some(0) {
            return Err(GeneticError::Configuration(
                "Expert width must be positive".to_string(),
            ));
        }
        if !self.noise.is_finite() || self.noise < 0.0 {
            return Err(GeneticError::Configuration(format!(
                "Noise amplitude must be finite and non-negative, got {}",
                self.noise
            )));
        }
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(GeneticError::Configuration(format!(
                "Dropout must be in [0, 1), got {}",
                self.dropout
            )));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(GeneticError::Configuration(format!(
                "Learning rate must be finite and positive, got {}",
                self.learning_rate
            )));
        }
        if !self.momentum.is_finite() || self.momentum < 0.0 {
            return Err(GeneticError::Configuration(format!(
                "Momentum must be finite and non-negative, got {}",
                self.momentum
            )));
        }
        if self.epochs == 0 {
            return Err(GeneticError::Configuration(
                "At least one training epoch is required".to_string(),
            ));
        }
        if self.sample_size == 0 {
            return Err(GeneticError::Configuration(
                "Sample size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for NeuralOptions {
    fn default() -> Self {
        NeuralOptionsBuilder::default().build()
    }
}

/// Builder for `NeuralOptions`.
///
/// Unset fields fall back to the defaults: 8 experts, lazy width, noise
/// `1e-3`, no dropout, regression output, learning rate `0.6`, momentum `0.4`,
/// one epoch, five samples, [`MorphPolicy::Whole`] and
/// [`ExpertSelection::Uniform`].
#[derive(Debug, Clone, Default)]
pub struct NeuralOptionsBuilder {
    experts: Option<usize>,
    width: Option<usize>,
    noise: Option<f64>,
    dropout: Option<f64>,
    regression: Option<bool>,
    learning_rate: Option<f64>,
    momentum: Option<f64>,
    epochs: Option<usize>,
    sample_size: Option<usize>,
    policy: Option<MorphPolicy>,
    expert_selection: Option<ExpertSelection>,
}

impl NeuralOptionsBuilder {
    pub fn experts(mut self, value: usize) -> Self {
        self.experts = Some(value);
        self
    }

    pub fn width(mut self, value: usize) -> Self {
        self.width = Some(value);
        self
    }

    pub fn noise(mut self, value: f64) -> Self {
        self.noise = Some(value);
        self
    }

    pub fn dropout(mut self, value: f64) -> Self {
        self.dropout = Some(value);
        self
    }

    pub fn regression(mut self, value: bool) -> Self {
        self.regression = Some(value);
        self
    }

    pub fn learning_rate(mut self, value: f64) -> Self {
        self.learning_rate = Some(value);
        self
    }

    pub fn momentum(mut self, value: f64) -> Self {
        self.momentum = Some(value);
        self
    }

    pub fn epochs(mut self, value: usize) -> Self {
        self.epochs = Some(value);
        self
    }

    pub fn sample_size(mut self, value: usize) -> Self {
        self.sample_size = Some(value);
        self
    }

    pub fn policy(mut self, value: MorphPolicy) -> Self {
        self.policy = Some(value);
        self
    }

    pub fn expert_selection(mut self, value: ExpertSelection) -> Self {
        self.expert_selection = Some(value);
        self
    }

    /// Builds the `NeuralOptions` instance.
    pub fn build(self) -> NeuralOptions {
        NeuralOptions {
            experts: self.experts.unwrap_or(8),
            width: self.width,
            noise: self.noise.unwrap_or(1e-3),
            dropout: self.dropout.unwrap_or(0.0),
            regression: self.regression.unwrap_or(true),
            learning_rate: self.learning_rate.unwrap_or(0.6),
            momentum: self.momentum.unwrap_or(0.4),
            epochs: self.epochs.unwrap_or(1),
            sample_size: self.sample_size.unwrap_or(5),
            policy: self.policy.unwrap_or_default(),
            expert_selection: self.expert_selection.unwrap_or_default(),
        }
    }
}
