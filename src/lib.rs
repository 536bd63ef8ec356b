pub mod breeding;
pub mod caching;
pub mod error;
pub mod genome;
pub mod mutation;
pub mod neural;
pub mod rng;
pub mod selection;
pub mod stats;

// Re-export commonly used types for convenience
pub use error::{GeneticError, OptionExt, Result};
