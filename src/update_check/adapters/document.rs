//! Update-check state backed by the document store.

use crate::storage::{
    domain::DocumentKey,
    ports::{DocumentStore, StorageResult, read_json, write_json},
};
use crate::update_check::{domain::UpdateCheckState, ports::UpdateStateStore};
use async_trait::async_trait;
use std::sync::Arc;

/// Stores [`UpdateCheckState`] as a single JSON document.
#[derive(Debug)]
pub struct DocumentUpdateStateStore<S> {
    store: Arc<S>,
}

impl<S> Clone for DocumentUpdateStateStore<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: DocumentStore> DocumentUpdateStateStore<S> {
    /// Creates a state store over `store`.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: DocumentStore> UpdateStateStore for DocumentUpdateStateStore<S> {
    async fn load(&self) -> StorageResult<UpdateCheckState> {
        Ok(read_json(&*self.store, DocumentKey::UpdateCheckState)
            .await?
            .unwrap_or_default())
    }

    async fn save(&self, state: &UpdateCheckState) -> StorageResult<()> {
        write_json(&*self.store, DocumentKey::UpdateCheckState, state).await
    }
}
