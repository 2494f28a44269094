//! Pure planning of which comments a run must analyse.

use super::{Checkpoint, ExtractionConfig, ExtractionProgress, Fingerprint};
use crate::review::domain::TargetId;
use crate::task::domain::TaskDraft;
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::ops::Range;

/// Split of a run's comments into cached results and pending work.
///
/// Positions index into the run's comment list, so results can be
/// reassembled in comment order however the work was batched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResumePlan {
    /// Positions with a cached result, paired with the cached drafts.
    pub cached: Vec<(usize, Vec<TaskDraft>)>,
    /// Positions that still need analysis, in comment order.
    pub pending: Vec<usize>,
    /// Progress recorded by a checkpoint that matches this run.
    pub resumed_from: Option<ExtractionProgress>,
    /// A checkpoint existed but described a different comment set.
    pub discarded_checkpoint: bool,
}

impl ResumePlan {
    /// Partitions comments by cache membership and validates the
    /// checkpoint against the run.
    #[must_use]
    pub fn partition<S: BuildHasher>(
        target: TargetId,
        fingerprints: &[Fingerprint],
        cached: &HashMap<Fingerprint, Vec<TaskDraft>, S>,
        checkpoint: Option<&Checkpoint>,
    ) -> Self {
        let mut plan = Self::default();
        for (position, fingerprint) in fingerprints.iter().enumerate() {
            if let Some(drafts) = cached.get(fingerprint) {
                plan.cached.push((position, drafts.clone()));
                continue;
            }
            plan.pending.push(position);
        }
        if let Some(found) = checkpoint {
            if found.applies_to(target, fingerprints.len()) {
                plan.resumed_from = Some(found.progress());
            } else {
                plan.discarded_checkpoint = true;
            }
        }
        plan
    }

    /// Total comments in the run.
    #[must_use]
    pub fn total(&self) -> usize {
        self.cached.len().saturating_add(self.pending.len())
    }

    /// Progress before any analysis call is made.
    #[must_use]
    pub fn initial_progress(&self) -> ExtractionProgress {
        ExtractionProgress {
            processed: self.cached.len(),
            total: self.total(),
        }
    }
}

/// Splits `pending` comments into batch ranges.
///
/// Small runs go out as a single batch; larger ones are chunked by the
/// configured batch size.
///
/// # Examples
///
///     use reviewtask::extraction::domain::{ExtractionConfig, batch_ranges};
///
///     let config = ExtractionConfig::default();
///     assert_eq!(batch_ranges(4, &config), vec![0..4]);
///     assert_eq!(batch_ranges(7, &config), vec![0..3, 3..6, 6..7]);
#[must_use]
pub fn batch_ranges(pending: usize, config: &ExtractionConfig) -> Vec<Range<usize>> {
    if pending == 0 {
        return Vec::new();
    }
    if pending <= config.single_batch_limit {
        return vec![0..pending];
    }
    let size = config.batch_size.max(1);
    (0..pending)
        .step_by(size)
        .map(|start| start..start.saturating_add(size).min(pending))
        .collect()
}
