//! Document store port and JSON codec helpers.

use crate::review::domain::TargetId;
use crate::storage::domain::DocumentKey;
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable, independently addressable document storage.
///
/// A successful `put` or `delete` must be durable before it returns: a
/// crash afterwards leaves the document in the written state, and a crash
/// during the call leaves the previous contents intact.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads a document, returning `None` when it does not exist.
    async fn get(&self, key: DocumentKey) -> StorageResult<Option<Vec<u8>>>;

    /// Replaces a document atomically.
    async fn put(&self, key: DocumentKey, contents: Vec<u8>) -> StorageResult<()>;

    /// Removes a document, returning whether it existed.
    async fn delete(&self, key: DocumentKey) -> StorageResult<bool>;

    /// Lists targets that have at least one persisted document.
    async fn list_targets(&self) -> StorageResult<Vec<TargetId>>;
}

/// Errors returned by storage adapters.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// A document exists but could not be decoded.
    #[error("document {key} is corrupt: {reason}")]
    Corrupt {
        /// Relative path of the document.
        key: String,
        /// Decoder diagnostic.
        reason: String,
    },

    /// A value could not be encoded for storage.
    #[error("failed to encode document {key}: {reason}")]
    Encode {
        /// Relative path of the document.
        key: String,
        /// Encoder diagnostic.
        reason: String,
    },

    /// Underlying I/O failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StorageError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Reads and decodes a JSON document.
///
/// # Errors
///
/// Returns [`StorageError::Corrupt`] when the stored bytes are not valid JSON
/// for `T`, or any error from the underlying store.
pub async fn read_json<T, S>(store: &S, key: DocumentKey) -> StorageResult<Option<T>>
where
    T: DeserializeOwned,
    S: DocumentStore + ?Sized,
{
    let Some(bytes) = store.get(key).await? else {
        return Ok(None);
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|err| StorageError::Corrupt {
            key: key.relative_path(),
            reason: err.to_string(),
        })
}

/// Encodes and writes a JSON document.
///
/// # Errors
///
/// Returns [`StorageError::Encode`] when serialization fails, or any error
/// from the underlying store.
pub async fn write_json<T, S>(store: &S, key: DocumentKey, value: &T) -> StorageResult<()>
where
    T: Serialize + Sync + ?Sized,
    S: DocumentStore + ?Sized,
{
    let bytes = serde_json::to_vec_pretty(value).map_err(|err| StorageError::Encode {
        key: key.relative_path(),
        reason: err.to_string(),
    })?;
    store.put(key, bytes).await
}
