//! Update-check state store port.

use crate::storage::ports::StorageResult;
use crate::update_check::domain::UpdateCheckState;
use async_trait::async_trait;

/// Durable home of the last successful check time.
#[async_trait]
pub trait UpdateStateStore: Send + Sync {
    /// Loads the state, defaulting when none was saved.
    async fn load(&self) -> StorageResult<UpdateCheckState>;

    /// Replaces the state.
    async fn save(&self, state: &UpdateCheckState) -> StorageResult<()>;
}
