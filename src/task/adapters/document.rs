//! Task repository backed by a document store.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

use crate::review::domain::TargetId;
use crate::storage::{
    domain::DocumentKey,
    ports::{DocumentStore, read_json, write_json},
};
use crate::task::{
    domain::Task,
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Stores each target's tasks as an ordered JSON array.
#[derive(Debug)]
pub struct DocumentTaskRepository<S> {
    store: Arc<S>,
}

impl<S> DocumentTaskRepository<S>
where
    S: DocumentStore,
{
    /// Creates a repository on top of `store`.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S> Clone for DocumentTaskRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

/// Checks identity invariants before a collection is written.
fn validate_collection(target: TargetId, tasks: &[Task]) -> TaskRepositoryResult<()> {
    let mut ids = HashSet::with_capacity(tasks.len());
    let mut keys = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if task.source().target != target {
            return Err(TaskRepositoryError::TargetMismatch {
                task_id: task.id(),
                expected: target,
                actual: task.source().target,
            });
        }
        if !ids.insert(task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        if !keys.insert(*task.source()) {
            return Err(TaskRepositoryError::DuplicateProvenance(*task.source()));
        }
    }
    Ok(())
}

#[async_trait]
impl<S> TaskRepository for DocumentTaskRepository<S>
where
    S: DocumentStore,
{
    async fn load(&self, target: TargetId) -> TaskRepositoryResult<Vec<Task>> {
        let tasks: Option<Vec<Task>> = read_json(&*self.store, DocumentKey::Tasks(target))
            .await
            .map_err(TaskRepositoryError::persistence)?;
        Ok(tasks.unwrap_or_default())
    }

    async fn save(&self, target: TargetId, tasks: &[Task]) -> TaskRepositoryResult<()> {
        validate_collection(target, tasks)?;
        write_json(&*self.store, DocumentKey::Tasks(target), tasks)
            .await
            .map_err(TaskRepositoryError::persistence)
    }

    async fn targets(&self) -> TaskRepositoryResult<Vec<TargetId>> {
        let candidates = self
            .store
            .list_targets()
            .await
            .map_err(TaskRepositoryError::persistence)?;
        let mut targets = Vec::with_capacity(candidates.len());
        for target in candidates {
            let stored = self
                .store
                .get(DocumentKey::Tasks(target))
                .await
                .map_err(TaskRepositoryError::persistence)?;
            if stored.is_some() {
                targets.push(target);
            }
        }
        Ok(targets)
    }
}
