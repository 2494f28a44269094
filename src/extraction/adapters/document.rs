//! Cache and checkpoint stores backed by the document store.

use crate::extraction::{
    domain::{CacheEntry, Checkpoint, Fingerprint},
    ports::{CacheStore, CheckpointStore},
};
use crate::review::domain::TargetId;
use crate::storage::{
    domain::DocumentKey,
    ports::{DocumentStore, StorageResult, read_json, write_json},
};
use crate::task::domain::TaskDraft;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Persisted form of a target's cache.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheDocument {
    #[serde(default)]
    entries: BTreeMap<Fingerprint, CacheEntry>,
}

/// Extraction cache stored as one JSON document per target.
#[derive(Debug)]
pub struct DocumentCacheStore<S> {
    store: Arc<S>,
}

impl<S> Clone for DocumentCacheStore<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: DocumentStore> DocumentCacheStore<S> {
    /// Creates a cache over `store`.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    async fn load(&self, target: TargetId) -> StorageResult<CacheDocument> {
        Ok(read_json(&*self.store, DocumentKey::Cache(target))
            .await?
            .unwrap_or_default())
    }
}

#[async_trait]
impl<S: DocumentStore> CacheStore for DocumentCacheStore<S> {
    async fn lookup(
        &self,
        target: TargetId,
        fingerprint: &Fingerprint,
    ) -> StorageResult<Option<Vec<TaskDraft>>> {
        let mut document = self.load(target).await?;
        Ok(document
            .entries
            .remove(fingerprint)
            .map(|entry| entry.drafts))
    }

    async fn lookup_many(
        &self,
        target: TargetId,
        fingerprints: &[Fingerprint],
    ) -> StorageResult<HashMap<Fingerprint, Vec<TaskDraft>>> {
        let mut document = self.load(target).await?;
        Ok(fingerprints
            .iter()
            .filter_map(|fingerprint| {
                document
                    .entries
                    .remove(fingerprint)
                    .map(|entry| (fingerprint.clone(), entry.drafts))
            })
            .collect())
    }

    async fn store(&self, target: TargetId, entries: Vec<CacheEntry>) -> StorageResult<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut document = self.load(target).await?;
        for entry in entries {
            document.entries.insert(entry.fingerprint.clone(), entry);
        }
        write_json(&*self.store, DocumentKey::Cache(target), &document).await
    }

    async fn clear(&self, target: TargetId) -> StorageResult<bool> {
        self.store.delete(DocumentKey::Cache(target)).await
    }
}

/// Checkpoints stored as one JSON document per target.
#[derive(Debug)]
pub struct DocumentCheckpointStore<S> {
    store: Arc<S>,
}

impl<S> Clone for DocumentCheckpointStore<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: DocumentStore> DocumentCheckpointStore<S> {
    /// Creates a checkpoint store over `store`.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: DocumentStore> CheckpointStore for DocumentCheckpointStore<S> {
    async fn load(&self, target: TargetId) -> StorageResult<Option<Checkpoint>> {
        read_json(&*self.store, DocumentKey::Checkpoint(target)).await
    }

    async fn save(&self, checkpoint: &Checkpoint) -> StorageResult<()> {
        write_json(
            &*self.store,
            DocumentKey::Checkpoint(checkpoint.target()),
            checkpoint,
        )
        .await
    }

    async fn clear(&self, target: TargetId) -> StorageResult<bool> {
        self.store.delete(DocumentKey::Checkpoint(target)).await
    }
}
