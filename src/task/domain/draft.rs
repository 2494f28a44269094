//! Task drafts produced by extraction, before they are merged into the store.

use super::{Priority, ProvenanceKey, TaskDomainError};
use crate::review::domain::{CommentLocation, ReviewComment, TargetId};
use serde::{Deserialize, Serialize};

/// One work item proposed by the analysis service for a comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskDraft {
    description: String,
    priority: Priority,
}

impl TaskDraft {
    /// Creates a validated draft.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyDescription`] when the description is
    /// blank.
    pub fn new(description: impl Into<String>, priority: Priority) -> Result<Self, TaskDomainError> {
        let raw = description.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyDescription);
        }
        Ok(Self {
            description: trimmed.to_owned(),
            priority,
        })
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the task priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }
}

/// A draft bound to its source comment, ready to merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTask {
    provenance: ProvenanceKey,
    draft: TaskDraft,
    origin_text: String,
    location: Option<CommentLocation>,
}

impl ExtractedTask {
    /// Binds the `task_index`-th draft of `comment` to its provenance.
    #[must_use]
    pub fn from_comment(
        target: TargetId,
        comment: &ReviewComment,
        task_index: u32,
        draft: TaskDraft,
    ) -> Self {
        Self {
            provenance: ProvenanceKey::new(target, comment.review_id(), comment.id(), task_index),
            draft,
            origin_text: comment.body().to_owned(),
            location: comment.location().cloned(),
        }
    }

    /// Binds every draft extracted from `comment`, numbering them in order.
    #[must_use]
    pub fn all_from_comment(
        target: TargetId,
        comment: &ReviewComment,
        drafts: &[TaskDraft],
    ) -> Vec<Self> {
        (0_u32..)
            .zip(drafts)
            .map(|(index, draft)| Self::from_comment(target, comment, index, draft.clone()))
            .collect()
    }

    /// Returns the provenance key.
    #[must_use]
    pub const fn provenance(&self) -> &ProvenanceKey {
        &self.provenance
    }

    /// Returns the draft content.
    #[must_use]
    pub const fn draft(&self) -> &TaskDraft {
        &self.draft
    }

    /// Returns the verbatim source comment body.
    #[must_use]
    pub fn origin_text(&self) -> &str {
        &self.origin_text
    }

    /// Returns the source comment's file/line anchor.
    #[must_use]
    pub const fn location(&self) -> Option<&CommentLocation> {
        self.location.as_ref()
    }
}
