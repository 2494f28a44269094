//! In-memory document store for tests.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::review::domain::TargetId;
use crate::storage::{
    domain::DocumentKey,
    ports::{DocumentStore, StorageError, StorageResult},
};

/// Thread-safe in-memory document store.
///
/// Writes to keys registered with [`Self::fail_writes_to`] return a
/// persistence error without modifying the stored document, which lets
/// tests exercise storage failures at precise points.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    state: Arc<RwLock<InMemoryDocumentState>>,
}

#[derive(Debug, Default)]
struct InMemoryDocumentState {
    documents: HashMap<DocumentKey, Vec<u8>>,
    failing_keys: HashSet<DocumentKey>,
    write_counts: HashMap<DocumentKey, usize>,
}

impl InMemoryDocumentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write to `key` fail.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Persistence`] when lock acquisition fails.
    pub fn fail_writes_to(&self, key: DocumentKey) -> StorageResult<()> {
        self.write()?.failing_keys.insert(key);
        Ok(())
    }

    /// Removes every injected write failure.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Persistence`] when lock acquisition fails.
    pub fn clear_failures(&self) -> StorageResult<()> {
        self.write()?.failing_keys.clear();
        Ok(())
    }

    /// Returns how many successful writes (puts and deletes) hit `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Persistence`] when lock acquisition fails.
    pub fn write_count(&self, key: DocumentKey) -> StorageResult<usize> {
        Ok(self.read()?.write_counts.get(&key).copied().unwrap_or_default())
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, InMemoryDocumentState>> {
        self.state
            .read()
            .map_err(|err| StorageError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, InMemoryDocumentState>> {
        self.state
            .write()
            .map_err(|err| StorageError::persistence(std::io::Error::other(err.to_string())))
    }
}

fn injected_failure(key: DocumentKey) -> StorageError {
    StorageError::persistence(std::io::Error::other(format!(
        "injected write failure for {key}"
    )))
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, key: DocumentKey) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.read()?.documents.get(&key).cloned())
    }

    async fn put(&self, key: DocumentKey, contents: Vec<u8>) -> StorageResult<()> {
        let mut state = self.write()?;
        if state.failing_keys.contains(&key) {
            return Err(injected_failure(key));
        }
        state.documents.insert(key, contents);
        *state.write_counts.entry(key).or_default() += 1;
        Ok(())
    }

    async fn delete(&self, key: DocumentKey) -> StorageResult<bool> {
        let mut state = self.write()?;
        if state.failing_keys.contains(&key) {
            return Err(injected_failure(key));
        }
        let existed = state.documents.remove(&key).is_some();
        if existed {
            *state.write_counts.entry(key).or_default() += 1;
        }
        Ok(existed)
    }

    async fn list_targets(&self) -> StorageResult<Vec<TargetId>> {
        let state = self.read()?;
        let targets: BTreeSet<TargetId> = state
            .documents
            .keys()
            .filter_map(|key| key.target())
            .collect();
        Ok(targets.into_iter().collect())
    }
}
