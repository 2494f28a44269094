//! Analysis service port.

use crate::extraction::domain::{AnalysisError, MalformedExtraction};
use crate::review::domain::{CommentId, ReviewComment, TargetId};
use crate::task::domain::TaskDraft;
use async_trait::async_trait;

/// Result type for analysis calls.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Per-comment outcome within a successful batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentAnalysis {
    /// The comment yielded zero or more drafts.
    Extracted {
        /// Comment the drafts belong to.
        comment_id: CommentId,
        /// Drafts in the order the service produced them.
        drafts: Vec<TaskDraft>,
    },
    /// The comment's output could not be used.
    Malformed(MalformedExtraction),
}

impl CommentAnalysis {
    /// Returns the comment this outcome is attributed to.
    #[must_use]
    pub const fn comment_id(&self) -> CommentId {
        match self {
            Self::Extracted { comment_id, .. } => *comment_id,
            Self::Malformed(malformed) => malformed.comment_id,
        }
    }
}

/// Turns a batch of review comments into task drafts.
///
/// Implementations may be slow, rate limited, or unavailable. A batch-level
/// `Err` means nothing in the batch was processed; per-comment defects are
/// reported as [`CommentAnalysis::Malformed`] inside an `Ok` reply.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Analyses `comments`, returning one outcome per comment it handled.
    async fn analyze(
        &self,
        target: TargetId,
        comments: &[ReviewComment],
    ) -> AnalysisResult<Vec<CommentAnalysis>>;
}
