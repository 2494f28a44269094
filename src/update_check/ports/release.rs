//! Release source port.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by release sources.
#[derive(Debug, Clone, Error)]
pub enum ReleaseSourceError {
    /// No release has been published.
    #[error("no published release")]
    NoRelease,
    /// The release feed could not be queried.
    #[error("release lookup failed: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl ReleaseSourceError {
    /// Wraps a transport error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}

/// Supplies the latest published version.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Returns the latest release's version string.
    async fn latest_version(&self) -> Result<String, ReleaseSourceError>;
}
