//! Repository port for per-target task collections.

use crate::review::domain::TargetId;
use crate::task::domain::{ProvenanceKey, Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Collections are read and written whole, per target, so a merge or status
/// change is a single durable unit of work.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Loads the ordered task collection for a target.
    ///
    /// Returns an empty collection when nothing has been stored yet.
    async fn load(&self, target: TargetId) -> TaskRepositoryResult<Vec<Task>>;

    /// Replaces the task collection for a target.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] or
    /// [`TaskRepositoryError::DuplicateProvenance`] when the collection
    /// violates identity invariants; nothing is written in that case.
    async fn save(&self, target: TargetId, tasks: &[Task]) -> TaskRepositoryResult<()>;

    /// Lists targets with a stored task collection.
    async fn targets(&self) -> TaskRepositoryResult<Vec<TargetId>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// Two tasks in one collection share an identifier.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// Two tasks in one collection share a provenance key.
    #[error("duplicate provenance key: {0}")]
    DuplicateProvenance(ProvenanceKey),

    /// A task was saved under a different target than its provenance.
    #[error("task {task_id} belongs to target {actual}, not {expected}")]
    TargetMismatch {
        /// Offending task.
        task_id: TaskId,
        /// Target the collection is saved under.
        expected: TargetId,
        /// Target recorded in the task's provenance.
        actual: TargetId,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
