//! In-memory review source for tests and offline runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::review::{
    domain::{ReviewComment, TargetId},
    ports::{ReviewSource, ReviewSourceError, ReviewSourceResult},
};

/// Thread-safe in-memory review source.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReviewSource {
    comments: Arc<RwLock<HashMap<TargetId, Vec<ReviewComment>>>>,
}

impl InMemoryReviewSource {
    /// Creates an empty review source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the comments published for a target.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewSourceError::Platform`] when lock acquisition fails.
    pub fn publish(
        &self,
        target: TargetId,
        comments: Vec<ReviewComment>,
    ) -> ReviewSourceResult<()> {
        let mut state = self
            .comments
            .write()
            .map_err(|err| ReviewSourceError::platform(std::io::Error::other(err.to_string())))?;
        state.insert(target, comments);
        Ok(())
    }
}

#[async_trait]
impl ReviewSource for InMemoryReviewSource {
    async fn comments(&self, target: TargetId) -> ReviewSourceResult<Vec<ReviewComment>> {
        let state = self
            .comments
            .read()
            .map_err(|err| ReviewSourceError::platform(std::io::Error::other(err.to_string())))?;
        state
            .get(&target)
            .cloned()
            .ok_or(ReviewSourceError::TargetNotFound(target))
    }
}
