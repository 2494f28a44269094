//! Error types for the extraction context.

use crate::review::domain::CommentId;
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;

/// Batch-level failure reported by an analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The service could not be reached or returned an unusable reply.
    #[error("analysis service unavailable: {0}")]
    Unavailable(String),
    /// The service asked the caller to slow down.
    #[error("analysis service rate limited the request")]
    RateLimited {
        /// Delay suggested by the service, when it sent one.
        retry_after: Option<Duration>,
    },
    /// The call did not finish within the per-call timeout.
    #[error("analysis call timed out after {0:?}")]
    TimedOut(Duration),
    /// The service refused the request; retrying will not help.
    #[error("analysis request rejected: {0}")]
    Rejected(String),
}

impl AnalysisError {
    /// Returns whether a retry may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

/// Per-comment analysis output that could not be turned into drafts.
///
/// Malformed comments are skipped for the run and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed extraction for comment {comment_id}: {reason}")]
pub struct MalformedExtraction {
    /// Comment whose result was unusable.
    pub comment_id: CommentId,
    /// Diagnostic describing the defect.
    pub reason: String,
}

impl MalformedExtraction {
    /// Creates a malformed-result record.
    #[must_use]
    pub fn new(comment_id: CommentId, reason: impl Into<String>) -> Self {
        Self {
            comment_id,
            reason: reason.into(),
        }
    }
}

/// Reason an extraction run stopped before every comment was processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionInterruption {
    /// A batch failed on every permitted attempt, or failed permanently.
    #[error("analysis failed after {attempts} attempt(s): {error}")]
    AnalysisFailed {
        /// Attempts made for the failing batch.
        attempts: u32,
        /// Last error returned by the service.
        #[source]
        error: AnalysisError,
    },
    /// The run's wall-clock budget expired.
    #[error("run deadline {deadline} exceeded")]
    DeadlineExceeded {
        /// Instant the run had to finish by.
        deadline: DateTime<Utc>,
    },
}
