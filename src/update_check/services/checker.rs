//! Timeout-bounded, cancellable release check.

use crate::storage::ports::StorageError;
use crate::update_check::{
    domain::{ParseVersionError, UpdateCheckConfig, UpdateCheckState, UpdateNotice, Version},
    ports::{ReleaseSource, ReleaseSourceError, UpdateStateStore},
};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

/// Reasons a release check produced no answer.
///
/// These never reach callers of [`UpdateChecker::check`]; they are logged.
#[derive(Debug, Error)]
pub enum UpdateCheckError {
    /// The release lookup failed.
    #[error(transparent)]
    Release(#[from] ReleaseSourceError),
    /// The release lookup exceeded its timeout.
    #[error("release lookup timed out after {0:?}")]
    TimedOut(Duration),
    /// A version string could not be compared.
    #[error(transparent)]
    Version(#[from] ParseVersionError),
    /// The last-checked timestamp could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Checks for newer releases at most once per configured interval.
#[derive(Clone)]
pub struct UpdateChecker<R, S, C>
where
    R: ReleaseSource,
    S: UpdateStateStore,
    C: Clock + Send + Sync,
{
    releases: Arc<R>,
    state: Arc<S>,
    clock: Arc<C>,
    config: UpdateCheckConfig,
}

impl<R, S, C> UpdateChecker<R, S, C>
where
    R: ReleaseSource,
    S: UpdateStateStore,
    C: Clock + Send + Sync,
{
    /// Creates a checker.
    #[must_use]
    pub const fn new(
        releases: Arc<R>,
        state: Arc<S>,
        clock: Arc<C>,
        config: UpdateCheckConfig,
    ) -> Self {
        Self {
            releases,
            state,
            clock,
            config,
        }
    }

    /// Runs one check if enabled and due.
    ///
    /// Returns a notice when a newer release exists. Every failure is
    /// logged and reported as `None`; the last-checked time is only
    /// written after a successful lookup.
    pub async fn check(&self) -> Option<UpdateNotice> {
        if !self.config.enabled {
            tracing::debug!("update check disabled");
            return None;
        }
        self.try_check().await.unwrap_or_else(|error| {
            tracing::warn!(error = %error, "update check failed");
            None
        })
    }

    async fn try_check(&self) -> Result<Option<UpdateNotice>, UpdateCheckError> {
        let now = self.clock.utc();
        let state = self.state.load().await?;
        if !state.is_due(now, self.config.interval) {
            tracing::debug!("update check not due yet");
            return Ok(None);
        }
        let lookup = self.releases.latest_version();
        let latest_text = tokio::time::timeout(self.config.timeout, lookup)
            .await
            .map_err(|_| UpdateCheckError::TimedOut(self.config.timeout))??;
        self.state
            .save(&UpdateCheckState {
                last_checked: Some(now),
            })
            .await?;
        let current: Version = self.config.current_version.parse()?;
        let latest: Version = latest_text.parse()?;
        if latest > current {
            tracing::info!(
                current = %current,
                latest = %latest,
                "a newer release is available"
            );
            return Ok(Some(UpdateNotice { current, latest }));
        }
        tracing::debug!(current = %current, "running the latest release");
        Ok(None)
    }
}

impl<R, S, C> UpdateChecker<R, S, C>
where
    R: ReleaseSource + 'static,
    S: UpdateStateStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Starts the check on the runtime without waiting for it.
    #[must_use]
    pub fn spawn(self) -> BackgroundCheck {
        BackgroundCheck {
            handle: tokio::spawn(async move { self.check().await }),
        }
    }
}

/// Handle to a release check running beside the main work.
#[derive(Debug)]
pub struct BackgroundCheck {
    handle: JoinHandle<Option<UpdateNotice>>,
}

impl BackgroundCheck {
    /// Abandons the check.
    pub fn cancel(self) {
        self.handle.abort();
    }

    /// Returns whether the check has completed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the check, returning `None` if it failed, was cancelled,
    /// or found nothing newer.
    pub async fn finish(self) -> Option<UpdateNotice> {
        self.handle.await.unwrap_or_else(|error| {
            tracing::debug!(error = %error, "update check did not complete");
            None
        })
    }
}
