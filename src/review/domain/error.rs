//! Error types for review identifier validation.

use thiserror::Error;

/// Errors returned while constructing review domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReviewDomainError {
    /// The target number is zero or too large to persist.
    #[error("invalid target number {0}, expected a positive integer")]
    InvalidTargetNumber(u64),

    /// The target storage key does not follow the `PR-<n>` format.
    #[error("invalid target key '{0}', expected PR-<number>")]
    InvalidTargetKey(String),
}
