//! Identifier types for review targets, reviews, and comments.

use super::ReviewDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix used for target storage keys.
const TARGET_KEY_PREFIX: &str = "PR-";

/// Review target, typically a pull request number.
///
/// # Examples
///
///     use reviewtask::review::domain::TargetId;
///
///     let target = TargetId::new(42).expect("valid target");
///     assert_eq!(target.storage_key(), "PR-42");
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct TargetId(u64);

impl TargetId {
    /// Largest target number that round-trips through JSON integers safely.
    const MAX_VALUE: u64 = i64::MAX as u64;

    /// Creates a validated target identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::InvalidTargetNumber`] when the value is
    /// zero or exceeds `i64::MAX`.
    pub const fn new(value: u64) -> Result<Self, ReviewDomainError> {
        if value == 0 || value > Self::MAX_VALUE {
            return Err(ReviewDomainError::InvalidTargetNumber(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns the directory-safe key used by storage adapters.
    #[must_use]
    pub fn storage_key(self) -> String {
        format!("{TARGET_KEY_PREFIX}{}", self.0)
    }

    /// Parses a storage key produced by [`Self::storage_key`].
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::InvalidTargetKey`] when the key has the
    /// wrong prefix or a non-numeric suffix.
    pub fn parse_storage_key(key: &str) -> Result<Self, ReviewDomainError> {
        let number = key
            .strip_prefix(TARGET_KEY_PREFIX)
            .and_then(|suffix| suffix.parse::<u64>().ok())
            .ok_or_else(|| ReviewDomainError::InvalidTargetKey(key.to_owned()))?;
        Self::new(number).map_err(|_| ReviewDomainError::InvalidTargetKey(key.to_owned()))
    }
}

impl TryFrom<u64> for TargetId {
    type Error = ReviewDomainError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TargetId> for u64 {
    fn from(target: TargetId) -> Self {
        target.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a review submitted on a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(u64);

impl ReviewId {
    /// Wraps a platform review identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a single review comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(u64);

impl CommentId {
    /// Wraps a platform comment identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
