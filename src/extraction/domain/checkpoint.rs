//! Durable extraction progress markers.

use crate::review::domain::TargetId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Progress snapshot reported after each completed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractionProgress {
    /// Comments the run is finished with: cached, analysed, or skipped.
    pub processed: usize,
    /// Comments in the run.
    pub total: usize,
}

impl ExtractionProgress {
    /// Returns whether every comment has been processed.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        self.processed >= self.total
    }
}

/// Resumable record of how far a target's extraction run got.
///
/// A checkpoint only exists while a run is incomplete; a run that finishes
/// removes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    target: TargetId,
    processed: usize,
    total: usize,
    last_processed_at: DateTime<Utc>,
}

impl Checkpoint {
    /// Creates a checkpoint for `target`.
    #[must_use]
    pub const fn new(
        target: TargetId,
        processed: usize,
        total: usize,
        last_processed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            target,
            processed,
            total,
            last_processed_at,
        }
    }

    /// Returns the owning target.
    #[must_use]
    pub const fn target(&self) -> TargetId {
        self.target
    }

    /// Returns how many comments were processed when it was written.
    #[must_use]
    pub const fn processed(&self) -> usize {
        self.processed
    }

    /// Returns the comment count of the run that wrote it.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Returns when the last batch finished.
    #[must_use]
    pub const fn last_processed_at(&self) -> DateTime<Utc> {
        self.last_processed_at
    }

    /// Returns whether the checkpoint describes a run over `total` comments
    /// on `target`.
    #[must_use]
    pub fn applies_to(&self, target: TargetId, total: usize) -> bool {
        self.target == target && self.total == total && self.processed <= total
    }

    /// Returns the progress the checkpoint records.
    #[must_use]
    pub const fn progress(&self) -> ExtractionProgress {
        ExtractionProgress {
            processed: self.processed,
            total: self.total,
        }
    }
}
