//! Release source with a configurable answer.

use crate::update_check::ports::{ReleaseSource, ReleaseSourceError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Answer {
    Version(String),
    Failure(ReleaseSourceError),
}

/// Release source that returns a preset answer, optionally after a delay.
///
/// Useful offline and in tests; lookups are counted.
#[derive(Debug, Clone)]
pub struct FixedReleaseSource {
    answer: Arc<RwLock<Answer>>,
    delay: Duration,
    lookups: Arc<AtomicUsize>,
}

impl FixedReleaseSource {
    /// Creates a source reporting `version` as the latest release.
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            answer: Arc::new(RwLock::new(Answer::Version(version.into()))),
            delay: Duration::ZERO,
            lookups: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Creates a source whose lookups fail with `error`.
    #[must_use]
    pub fn failing(error: ReleaseSourceError) -> Self {
        Self {
            answer: Arc::new(RwLock::new(Answer::Failure(error))),
            ..Self::new(String::new())
        }
    }

    /// Delays every lookup by `delay`.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Changes the reported latest version.
    pub fn publish(&self, version: impl Into<String>) {
        let mut answer = self
            .answer
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *answer = Answer::Version(version.into());
    }

    /// Returns how many lookups were started.
    #[must_use]
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReleaseSource for FixedReleaseSource {
    async fn latest_version(&self) -> Result<String, ReleaseSourceError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let answer = self
            .answer
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        match answer {
            Answer::Version(version) => Ok(version),
            Answer::Failure(error) => Err(error),
        }
    }
}
