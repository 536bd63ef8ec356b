//! # Error Types
//!
//! This module defines the error type shared by every operator in the crate.
//! Structural problems (mismatched lengths, bad indices, operators applied to
//! the wrong representation) abort the triggering call and are reported
//! through [`GeneticError`]. Numeric instabilities are not errors: they are
//! absorbed by sentinel values where they occur and only logged.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use genmorph::error::{GeneticError, Result};
//!
//! fn check_width(expected: usize, actual: usize) -> Result<()> {
//!     if expected != actual {
//!         return Err(GeneticError::LengthMismatch { expected, actual });
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_width(4, 4).is_ok());
//! assert!(check_width(4, 5).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use genmorph::error::{GeneticError, OptionExt};
//!
//! fn first_candidate(candidates: &[i32]) -> genmorph::error::Result<i32> {
//!     candidates.first().copied().ok_or_else_genetic(|| GeneticError::EmptyPopulation)
//! }
//!
//! assert!(first_candidate(&[]).is_err());
//! ```

use thiserror::Error;

/// Represents errors that can occur while breeding, mutating or morphing genomes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneticError {
    /// Two genomes that must share a width do not.
    #[error("Length mismatch: expected {expected} genes, found {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A position or range falls outside of the genome.
    #[error("Index {index} is out of range for a genome of length {length}")]
    IndexOutOfRange { index: usize, length: usize },

    /// An operator was applied to a representation it cannot handle.
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// A training round was aborted through its cancellation flag.
    #[error("Training round was cancelled")]
    Cancelled,
}

/// A specialized Result type for genetic operations.
///
/// ```rust
/// use genmorph::error::Result;
///
/// fn may_fail() -> Result<i32> {
///     Ok(42)
/// }
/// ```
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, GeneticError>` using
    /// a closure to generate the error.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}

/// Fails with [`GeneticError::LengthMismatch`] unless both widths agree.
pub(crate) fn ensure_same_length(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(GeneticError::LengthMismatch { expected, actual });
    }
    Ok(())
}

/// Fails with [`GeneticError::IndexOutOfRange`] unless `index < length`.
pub(crate) fn ensure_index(index: usize, length: usize) -> Result<()> {
    if index >= length {
        return Err(GeneticError::IndexOutOfRange { index, length });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GeneticError::LengthMismatch {
            expected: 3,
            actual: 4,
        };
        assert_eq!(
            err.to_string(),
            "Length mismatch: expected 3 genes, found 4"
        );

        let err = GeneticError::IndexOutOfRange {
            index: 7,
            length: 5,
        };
        assert!(err.to_string().contains("Index 7"));
    }

    #[test]
    fn test_guards() {
        assert!(ensure_same_length(2, 2).is_ok());
        assert_eq!(
            ensure_same_length(2, 3),
            Err(GeneticError::LengthMismatch {
                expected: 2,
                actual: 3
            })
        );
        assert!(ensure_index(0, 1).is_ok());
        assert!(ensure_index(1, 1).is_err());
    }

    #[test]
    fn test_option_ext() {
        let none: Option<u8> = None;
        assert_eq!(
            none.ok_or_else_genetic(|| GeneticError::EmptyPopulation),
            Err(GeneticError::EmptyPopulation)
        );
        assert_eq!(
            Some(1).ok_or_else_genetic(|| GeneticError::Cancelled),
            Ok(1)
        );
    }
}
