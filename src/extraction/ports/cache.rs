//! Extraction cache port.

use crate::extraction::domain::{CacheEntry, Fingerprint};
use crate::review::domain::TargetId;
use crate::storage::ports::StorageResult;
use crate::task::domain::TaskDraft;
use async_trait::async_trait;
use std::collections::HashMap;

/// Fingerprint-keyed store of extraction results, scoped per target.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the cached drafts for `fingerprint`, if any.
    async fn lookup(
        &self,
        target: TargetId,
        fingerprint: &Fingerprint,
    ) -> StorageResult<Option<Vec<TaskDraft>>>;

    /// Returns every cached result among `fingerprints`.
    async fn lookup_many(
        &self,
        target: TargetId,
        fingerprints: &[Fingerprint],
    ) -> StorageResult<HashMap<Fingerprint, Vec<TaskDraft>>> {
        let mut found = HashMap::new();
        for fingerprint in fingerprints {
            if let Some(drafts) = self.lookup(target, fingerprint).await? {
                found.insert(fingerprint.clone(), drafts);
            }
        }
        Ok(found)
    }

    /// Durably records `entries`, replacing results with the same fingerprint.
    async fn store(&self, target: TargetId, entries: Vec<CacheEntry>) -> StorageResult<()>;

    /// Drops every cached result for `target`, returning whether any existed.
    async fn clear(&self, target: TargetId) -> StorageResult<bool>;
}
