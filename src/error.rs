//! Construction errors.
//!
//! Every failure is detected before any table is filled, so a returned error
//! never leaves a partially built tree behind.

use std::fmt;

use thiserror::Error;

/// Which probability vector an invalid entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbabilityKind {
    /// Access probability of a key.
    Key,
    /// Probability of an unsuccessful search ending in a gap.
    Gap,
}

impl fmt::Display for ProbabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbabilityKind::Key => f.write_str("key"),
            ProbabilityKind::Gap => f.write_str("gap"),
        }
    }
}

/// Errors reported while validating the input of an [`OptimalBst`](crate::OptimalBst).
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ObstError {
    /// The key and key-probability sequences differ in length.
    #[error("got {keys} keys but {probabilities} key probabilities")]
    KeyProbabilityLength {
        /// Number of keys supplied.
        keys: usize,
        /// Number of key probabilities supplied.
        probabilities: usize,
    },

    /// Gap probabilities must number exactly one more than the keys.
    #[error("expected {expected} gap probabilities, got {actual}")]
    GapProbabilityLength {
        /// `keys + 1`.
        expected: usize,
        /// Number of gap probabilities supplied.
        actual: usize,
    },

    /// A probability is negative, NaN or infinite.
    #[error("{kind} probability at index {index} must be finite and non-negative, got {value}")]
    InvalidProbability {
        /// Vector the entry belongs to.
        kind: ProbabilityKind,
        /// Position of the entry within its vector.
        index: usize,
        /// Offending value.
        value: f64,
    },

    /// The same key appears twice.
    #[error("key at position {second} duplicates the key at position {first}")]
    DuplicateKey {
        /// Position of the first occurrence.
        first: usize,
        /// Position of the repeated occurrence.
        second: usize,
    },
}
