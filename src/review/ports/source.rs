//! Review source port.

use crate::review::domain::{ReviewComment, TargetId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for review source operations.
pub type ReviewSourceResult<T> = Result<T, ReviewSourceError>;

/// Read-only supplier of review comments for a target.
///
/// Implementations must return comments in the same order on every call for
/// an unchanged target. Extraction checkpoints count progress over that
/// ordering.
#[async_trait]
pub trait ReviewSource: Send + Sync {
    /// Returns every review comment on the target in a stable order.
    async fn comments(&self, target: TargetId) -> ReviewSourceResult<Vec<ReviewComment>>;
}

/// Errors returned by review source adapters.
#[derive(Debug, Clone, Error)]
pub enum ReviewSourceError {
    /// The target does not exist on the platform.
    #[error("review target {0} not found")]
    TargetNotFound(TargetId),

    /// Platform or transport failure.
    #[error("review source error: {0}")]
    Platform(Arc<dyn std::error::Error + Send + Sync>),
}

impl ReviewSourceError {
    /// Wraps a platform error.
    pub fn platform(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Platform(Arc::new(err))
    }
}
