//! Thread-completion queries correlating tasks with source threads.

use crate::review::domain::{CommentId, ReviewId, TargetId};
use crate::task::{
    domain::{ThreadCompletion, ThreadKey, resolvable_threads},
    ports::{TaskRepository, TaskRepositoryResult},
};
use std::sync::Arc;

/// Reports whether source comment threads can be resolved.
///
/// The service only answers the question; resolving the thread on the
/// hosting platform is the caller's job and should happen only when
/// [`ThreadCompletion::is_resolved_eligible`] holds.
#[derive(Clone)]
pub struct ThreadStatusService<R>
where
    R: TaskRepository,
{
    repository: Arc<R>,
}

impl<R> ThreadStatusService<R>
where
    R: TaskRepository,
{
    /// Creates a thread status service.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Returns completion counts for one thread.
    ///
    /// # Errors
    ///
    /// Returns repository errors when the collection cannot be loaded.
    pub async fn thread_status(
        &self,
        target: TargetId,
        review_id: ReviewId,
        comment_id: CommentId,
    ) -> TaskRepositoryResult<ThreadCompletion> {
        let tasks = self.repository.load(target).await?;
        Ok(ThreadCompletion::for_thread(
            &tasks,
            ThreadKey::new(review_id, comment_id),
        ))
    }

    /// Returns every thread on the target that is eligible for resolution.
    ///
    /// # Errors
    ///
    /// Returns repository errors when the collection cannot be loaded.
    pub async fn resolvable(&self, target: TargetId) -> TaskRepositoryResult<Vec<ThreadKey>> {
        let tasks = self.repository.load(target).await?;
        Ok(resolvable_threads(&tasks))
    }
}
