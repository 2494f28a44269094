//! Service layer for task merging and operator-driven status changes.

use crate::review::domain::TargetId;
use crate::task::{
    domain::{
        ExtractedTask, ImplementationStatus, MergeOutcome, ParseTaskFieldError, StaleTaskPolicy,
        Task, TaskDomainError, TaskId, TaskStatus, VerificationResult, reconcile,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for an operator status change.
///
/// The status arrives as text from the calling surface and is parsed
/// before the transition table is consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTaskRequest {
    target: TargetId,
    task_id: TaskId,
    status: String,
}

impl TransitionTaskRequest {
    /// Creates a transition request.
    #[must_use]
    pub fn new(target: TargetId, task_id: TaskId, status: impl Into<String>) -> Self {
        Self {
            target,
            task_id,
            status: status.into(),
        }
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The requested status string is not a known status.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskFieldError),
    /// No task with the identifier exists on the target.
    #[error("task {task_id} not found on target {target}")]
    NotFound {
        /// Target searched.
        target: TargetId,
        /// Missing task.
        task_id: TaskId,
    },
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Returns the tasks of a target in store order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when loading fails.
    pub async fn list(&self, target: TargetId) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.load(target).await?)
    }

    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when loading fails.
    pub async fn find(&self, target: TargetId, task_id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        let tasks = self.repository.load(target).await?;
        Ok(tasks.into_iter().find(|task| task.id() == task_id))
    }

    /// Merges extracted drafts into the target's collection and persists
    /// the result as one unit of work.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when loading or saving
    /// fails; the stored collection is unchanged in that case.
    pub async fn merge(
        &self,
        target: TargetId,
        extracted: &[ExtractedTask],
        policy: StaleTaskPolicy,
    ) -> TaskLifecycleResult<MergeOutcome> {
        let existing = self.repository.load(target).await?;
        let outcome = reconcile(existing, extracted, policy, &*self.clock);
        self.repository.save(target, &outcome.tasks).await?;
        tracing::info!(
            review_target = %target,
            created = outcome.created,
            updated = outcome.updated,
            stale = outcome.stale,
            total = outcome.tasks.len(),
            "merged extracted tasks"
        );
        Ok(outcome)
    }

    /// Applies an operator status change.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::InvalidStatus`] for unknown status
    /// strings, [`TaskLifecycleError::Domain`] for transitions the table
    /// forbids, [`TaskLifecycleError::NotFound`] for unknown tasks, and
    /// repository errors.
    pub async fn transition(&self, request: TransitionTaskRequest) -> TaskLifecycleResult<Task> {
        let status = TaskStatus::try_from(request.status.as_str())?;
        self.modify(request.target, request.task_id, |task, clock| {
            task.transition_to(status, clock)?;
            Ok(())
        })
        .await
    }

    /// Records the implementation status of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for unknown tasks and
    /// repository errors.
    pub async fn set_implementation_status(
        &self,
        target: TargetId,
        task_id: TaskId,
        status: ImplementationStatus,
    ) -> TaskLifecycleResult<Task> {
        self.modify(target, task_id, |task, clock| {
            task.set_implementation_status(status, clock);
            Ok(())
        })
        .await
    }

    /// Appends a verification result to a task's history.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for unknown tasks and
    /// repository errors.
    pub async fn record_verification(
        &self,
        target: TargetId,
        task_id: TaskId,
        result: VerificationResult,
    ) -> TaskLifecycleResult<Task> {
        self.modify(target, task_id, move |task, clock| {
            task.record_verification(result, clock);
            Ok(())
        })
        .await
    }

    async fn modify<F>(&self, target: TargetId, task_id: TaskId, apply: F) -> TaskLifecycleResult<Task>
    where
        F: FnOnce(&mut Task, &C) -> TaskLifecycleResult<()> + Send,
    {
        let mut tasks = self.repository.load(target).await?;
        let task = tasks
            .iter_mut()
            .find(|candidate| candidate.id() == task_id)
            .ok_or(TaskLifecycleError::NotFound { target, task_id })?;
        apply(task, &*self.clock)?;
        let updated = task.clone();
        self.repository.save(target, &tasks).await?;
        Ok(updated)
    }
}
