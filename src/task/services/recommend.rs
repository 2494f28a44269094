//! Read-only recommendation queries over the task store.

use crate::review::domain::TargetId;
use crate::task::{
    domain::{Recommendation, Task, todo_queue},
    ports::{TaskRepository, TaskRepositoryResult},
};
use std::sync::Arc;

/// Answers "what am I working on" and "what should I do next".
#[derive(Clone)]
pub struct RecommendationService<R>
where
    R: TaskRepository,
{
    repository: Arc<R>,
}

impl<R> RecommendationService<R>
where
    R: TaskRepository,
{
    /// Creates a recommendation service.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Returns the current task, the next task, and status counts.
    ///
    /// # Errors
    ///
    /// Returns repository errors when the collection cannot be loaded.
    pub async fn recommend(&self, target: TargetId) -> TaskRepositoryResult<Recommendation> {
        let tasks = self.repository.load(target).await?;
        Ok(Recommendation::from_tasks(&tasks))
    }

    /// Returns every `todo` task in recommended order.
    ///
    /// # Errors
    ///
    /// Returns repository errors when the collection cannot be loaded.
    pub async fn queue(&self, target: TargetId) -> TaskRepositoryResult<Vec<Task>> {
        let tasks = self.repository.load(target).await?;
        Ok(todo_queue(&tasks).into_iter().cloned().collect())
    }
}
