//! Tunables for batch extraction runs.

use crate::task::domain::StaleTaskPolicy;
use std::time::Duration;

/// Settings that shape an extraction run.
///
/// # Examples
///
///     use reviewtask::extraction::domain::ExtractionConfig;
///
///     let config = ExtractionConfig::default().with_batch_size(10);
///     assert_eq!(config.batch_size, 10);
///     assert_eq!(config.max_attempts, 3);
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionConfig {
    /// Comments sent to the analysis service per call.
    pub batch_size: usize,
    /// Runs with at most this many uncached comments use one batch.
    pub single_batch_limit: usize,
    /// Attempts per batch, including the first.
    pub max_attempts: u32,
    /// Base delay between attempts; the n-th retry waits n times this.
    pub retry_backoff: Duration,
    /// Upper bound on a single analysis call.
    pub call_timeout: Duration,
    /// Wall-clock budget for the whole run, checked before each batch.
    pub run_deadline: Duration,
    /// Treatment of stored tasks that a complete run no longer produces.
    pub stale_policy: StaleTaskPolicy,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            batch_size: 3,
            single_batch_limit: 5,
            max_attempts: 3,
            retry_backoff: Duration::from_secs(2),
            call_timeout: Duration::from_secs(120),
            run_deadline: Duration::from_secs(600),
            stale_policy: StaleTaskPolicy::Retain,
        }
    }
}

impl ExtractionConfig {
    /// Returns the defaults without retry delays, for tests and tools that
    /// drive in-process analysis fakes.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            retry_backoff: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Overrides the batch size; zero is treated as one.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Overrides the single-batch threshold.
    #[must_use]
    pub const fn with_single_batch_limit(mut self, limit: usize) -> Self {
        self.single_batch_limit = limit;
        self
    }

    /// Overrides the attempt budget; zero is treated as one.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Overrides the run deadline.
    #[must_use]
    pub const fn with_run_deadline(mut self, deadline: Duration) -> Self {
        self.run_deadline = deadline;
        self
    }

    /// Overrides the per-call timeout.
    #[must_use]
    pub const fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Overrides the stale-task policy.
    #[must_use]
    pub const fn with_stale_policy(mut self, policy: StaleTaskPolicy) -> Self {
        self.stale_policy = policy;
        self
    }

    /// Delay before retry number `retry` (1-based).
    #[must_use]
    pub fn backoff_for(&self, retry: u32) -> Duration {
        self.retry_backoff.saturating_mul(retry)
    }
}
