//! Checkpoint store port.

use crate::extraction::domain::Checkpoint;
use crate::review::domain::TargetId;
use crate::storage::ports::StorageResult;
use async_trait::async_trait;

/// Durable per-target run progress.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Loads the target's checkpoint, if a run left one behind.
    async fn load(&self, target: TargetId) -> StorageResult<Option<Checkpoint>>;

    /// Replaces the target's checkpoint.
    async fn save(&self, checkpoint: &Checkpoint) -> StorageResult<()>;

    /// Removes the target's checkpoint, returning whether one existed.
    async fn clear(&self, target: TargetId) -> StorageResult<bool>;
}
