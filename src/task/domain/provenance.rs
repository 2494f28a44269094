//! Provenance keys tying tasks back to the review comment they came from.

use crate::review::domain::{CommentId, ReviewId, TargetId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Origin of a task: `(target, review, comment, task index)`.
///
/// At most one task exists per provenance key. The key is the unit of
/// idempotence when merging a fresh extraction into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProvenanceKey {
    /// Review target the comment belongs to.
    pub target: TargetId,
    /// Review containing the comment.
    pub review_id: ReviewId,
    /// Source comment.
    pub comment_id: CommentId,
    /// Zero-based ordinal among the tasks extracted from the comment.
    pub task_index: u32,
}

impl ProvenanceKey {
    /// Creates a provenance key.
    #[must_use]
    pub const fn new(
        target: TargetId,
        review_id: ReviewId,
        comment_id: CommentId,
        task_index: u32,
    ) -> Self {
        Self {
            target,
            review_id,
            comment_id,
            task_index,
        }
    }

    /// Returns the comment thread this key belongs to.
    #[must_use]
    pub const fn thread(&self) -> ThreadKey {
        ThreadKey::new(self.review_id, self.comment_id)
    }
}

impl fmt::Display for ProvenanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/review-{}/comment-{}/{}",
            self.target, self.review_id, self.comment_id, self.task_index
        )
    }
}

/// Source comment thread shared by every task extracted from one comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadKey {
    /// Review containing the comment.
    pub review_id: ReviewId,
    /// Comment that opened the thread.
    pub comment_id: CommentId,
}

impl ThreadKey {
    /// Creates a thread key.
    #[must_use]
    pub const fn new(review_id: ReviewId, comment_id: CommentId) -> Self {
        Self {
            review_id,
            comment_id,
        }
    }
}

impl fmt::Display for ThreadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "review-{}/comment-{}", self.review_id, self.comment_id)
    }
}
