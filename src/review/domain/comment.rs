//! Review comment records as supplied by the hosting platform.

use super::{CommentId, ReviewId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File and line a review comment is anchored to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentLocation {
    /// Repository-relative file path.
    pub file: String,
    /// One-based line number, when the comment targets a specific line.
    pub line: Option<u32>,
}

impl CommentLocation {
    /// Creates a location for a file and optional line.
    #[must_use]
    pub fn new(file: impl Into<String>, line: Option<u32>) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

/// Read-only review comment fetched from the review source.
///
/// # Examples
///
///     use reviewtask::review::domain::{CommentId, ReviewComment, ReviewId};
///
///     let comment = ReviewComment::new(
///         CommentId::new(7),
///         ReviewId::new(3),
///         "octocat",
///         "Please handle the empty case.",
///     )
///     .with_location("src/lib.rs", Some(12));
///     assert_eq!(comment.location().map(|loc| loc.line), Some(Some(12)));
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewComment {
    id: CommentId,
    review_id: ReviewId,
    author: String,
    body: String,
    location: Option<CommentLocation>,
    thread_resolved: bool,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl ReviewComment {
    /// Creates a comment with its identity, author, and body.
    #[must_use]
    pub fn new(
        id: CommentId,
        review_id: ReviewId,
        author: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id,
            review_id,
            author: author.into(),
            body: body.into(),
            location: None,
            thread_resolved: false,
            created_at: None,
            updated_at: None,
        }
    }

    /// Anchors the comment to a file and optional line.
    #[must_use]
    pub fn with_location(mut self, file: impl Into<String>, line: Option<u32>) -> Self {
        self.location = Some(CommentLocation::new(file, line));
        self
    }

    /// Marks whether the source thread is already resolved.
    #[must_use]
    pub const fn with_thread_resolved(mut self, resolved: bool) -> Self {
        self.thread_resolved = resolved;
        self
    }

    /// Sets the platform timestamps.
    #[must_use]
    pub const fn with_timestamps(
        mut self,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        self.created_at = Some(created_at);
        self.updated_at = Some(updated_at);
        self
    }

    /// Returns the comment identifier.
    #[must_use]
    pub const fn id(&self) -> CommentId {
        self.id
    }

    /// Returns the identifier of the review containing this comment.
    #[must_use]
    pub const fn review_id(&self) -> ReviewId {
        self.review_id
    }

    /// Returns the comment author login.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the verbatim comment body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the file/line anchor, if any.
    #[must_use]
    pub const fn location(&self) -> Option<&CommentLocation> {
        self.location.as_ref()
    }

    /// Returns whether the thread is resolved on the platform.
    #[must_use]
    pub const fn thread_resolved(&self) -> bool {
        self.thread_resolved
    }

    /// Returns the platform creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Returns the platform update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}
