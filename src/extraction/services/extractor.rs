//! Batched, cached, resumable extraction runs.

use crate::extraction::{
    domain::{
        AnalysisError, CacheEntry, Checkpoint, ExtractionConfig, ExtractionInterruption,
        ExtractionProgress, Fingerprint, MalformedExtraction, ResumePlan, batch_ranges,
    },
    ports::{AnalysisService, CacheStore, CheckpointStore, CommentAnalysis},
};
use crate::review::domain::{CommentId, ReviewComment, TargetId};
use crate::storage::ports::StorageResult;
use crate::task::domain::TaskDraft;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Drafts available for one comment of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDrafts {
    /// Position of the comment in the run's input.
    pub position: usize,
    /// Comment the drafts came from.
    pub comment_id: CommentId,
    /// Drafts in extraction order; empty when the comment asked for nothing.
    pub drafts: Vec<TaskDraft>,
    /// Whether the drafts were served from the cache.
    pub from_cache: bool,
}

/// Result of one extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractionOutcome {
    /// Drafts per comment, in input order, for every comment with a result.
    pub results: Vec<CommentDrafts>,
    /// Comments whose analysis output was unusable.
    pub skipped: Vec<MalformedExtraction>,
    /// Final progress of the run.
    pub progress: ExtractionProgress,
    /// Number of analysis calls that succeeded.
    pub batches: usize,
    /// Why the run stopped early, if it did.
    pub interruption: Option<ExtractionInterruption>,
}

impl ExtractionOutcome {
    /// Returns whether every comment was processed.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.interruption.is_none()
    }

    /// Number of comments served from the cache.
    #[must_use]
    pub fn cache_hits(&self) -> usize {
        self.results.iter().filter(|result| result.from_cache).count()
    }
}

/// One pending comment paired with its cache key.
struct PendingItem {
    position: usize,
    fingerprint: Fingerprint,
}

/// Runs extraction over a target's comments in bounded batches.
///
/// Each completed batch durably writes its cache entries and then advances
/// the checkpoint, so an interrupted run loses at most the batch in flight.
#[derive(Clone)]
pub struct BatchExtractor<A, K, P, C>
where
    A: AnalysisService,
    K: CacheStore,
    P: CheckpointStore,
    C: Clock + Send + Sync,
{
    analysis: Arc<A>,
    cache: Arc<K>,
    checkpoints: Arc<P>,
    clock: Arc<C>,
    config: ExtractionConfig,
}

impl<A, K, P, C> BatchExtractor<A, K, P, C>
where
    A: AnalysisService,
    K: CacheStore,
    P: CheckpointStore,
    C: Clock + Send + Sync,
{
    /// Creates an extractor.
    #[must_use]
    pub const fn new(
        analysis: Arc<A>,
        cache: Arc<K>,
        checkpoints: Arc<P>,
        clock: Arc<C>,
        config: ExtractionConfig,
    ) -> Self {
        Self {
            analysis,
            cache,
            checkpoints,
            clock,
            config,
        }
    }

    /// Returns the run settings.
    #[must_use]
    pub const fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extracts drafts for `comments`, reusing cached results.
    ///
    /// `on_progress` is called after every completed batch. Analysis
    /// failures and deadline expiry end the run early and are reported in
    /// [`ExtractionOutcome::interruption`]; everything finished before that
    /// point stays cached and checkpointed.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the cache or checkpoint cannot be read
    /// or written.
    pub async fn extract<F>(
        &self,
        target: TargetId,
        comments: &[ReviewComment],
        mut on_progress: F,
    ) -> StorageResult<ExtractionOutcome>
    where
        F: FnMut(ExtractionProgress) + Send,
    {
        let fingerprints: Vec<Fingerprint> = comments
            .iter()
            .map(|comment| Fingerprint::of(target, comment))
            .collect();
        let cached = self.cache.lookup_many(target, &fingerprints).await?;
        let checkpoint = self.checkpoints.load(target).await?;
        let plan = ResumePlan::partition(target, &fingerprints, &cached, checkpoint.as_ref());
        self.log_plan(target, &plan);

        let mut outcome = ExtractionOutcome {
            progress: plan.initial_progress(),
            ..ExtractionOutcome::default()
        };
        let pending: Vec<PendingItem> = plan
            .pending
            .iter()
            .filter_map(|position| {
                fingerprints.get(*position).map(|fingerprint| PendingItem {
                    position: *position,
                    fingerprint: fingerprint.clone(),
                })
            })
            .collect();
        outcome.results = plan
            .cached
            .into_iter()
            .filter_map(|(position, drafts)| {
                comments.get(position).map(|comment| CommentDrafts {
                    position,
                    comment_id: comment.id(),
                    drafts,
                    from_cache: true,
                })
            })
            .collect();

        let deadline = self.deadline_from_now();
        for range in batch_ranges(pending.len(), &self.config) {
            let Some(items) = pending.get(range) else {
                continue;
            };
            if let Err(expired) = self.time_left(deadline) {
                tracing::warn!(
                    review_target = %target,
                    processed = outcome.progress.processed,
                    total = outcome.progress.total,
                    "extraction deadline exceeded; stopping at batch boundary"
                );
                outcome.interruption = Some(expired);
                break;
            }
            let batch: Vec<ReviewComment> = items
                .iter()
                .filter_map(|item| comments.get(item.position).cloned())
                .collect();
            match self.analyze_with_retry(target, &batch, deadline).await {
                Ok(results) => {
                    self.commit_batch(target, items, &batch, results, &mut outcome)
                        .await?;
                    on_progress(outcome.progress);
                }
                Err(interruption) => {
                    tracing::warn!(
                        review_target = %target,
                        processed = outcome.progress.processed,
                        total = outcome.progress.total,
                        error = %interruption,
                        "extraction interrupted"
                    );
                    outcome.interruption = Some(interruption);
                    break;
                }
            }
        }

        if outcome.is_complete() && (checkpoint.is_some() || !pending.is_empty()) {
            self.checkpoints.clear(target).await?;
        }
        outcome.results.sort_by_key(|result| result.position);
        tracing::info!(
            review_target = %target,
            processed = outcome.progress.processed,
            total = outcome.progress.total,
            cache_hits = outcome.cache_hits(),
            skipped = outcome.skipped.len(),
            complete = outcome.is_complete(),
            "extraction run finished"
        );
        Ok(outcome)
    }

    fn log_plan(&self, target: TargetId, plan: &ResumePlan) {
        if plan.discarded_checkpoint {
            tracing::warn!(
                review_target = %target,
                "ignoring checkpoint written for a different comment set"
            );
        }
        if let Some(resumed) = plan.resumed_from {
            tracing::info!(
                review_target = %target,
                processed = resumed.processed,
                total = resumed.total,
                "resuming interrupted extraction"
            );
        }
        tracing::info!(
            review_target = %target,
            total = plan.total(),
            cached = plan.cached.len(),
            pending = plan.pending.len(),
            batch_size = self.config.batch_size,
            "starting extraction run"
        );
    }

    fn deadline_from_now(&self) -> DateTime<Utc> {
        let started = self.clock.utc();
        TimeDelta::from_std(self.config.run_deadline)
            .ok()
            .and_then(|budget| started.checked_add_signed(budget))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Returns the time left before `deadline`, or the interruption once it
    /// has passed.
    fn time_left(&self, deadline: DateTime<Utc>) -> Result<Duration, ExtractionInterruption> {
        deadline
            .signed_duration_since(self.clock.utc())
            .to_std()
            .ok()
            .filter(|left| !left.is_zero())
            .ok_or(ExtractionInterruption::DeadlineExceeded { deadline })
    }

    /// Calls the analysis service until it succeeds, fails permanently, runs
    /// out of attempts, or the run deadline passes.
    ///
    /// Each call is bounded by the smaller of the call timeout and the time
    /// left in the run; a retry that could not start before the deadline is
    /// not attempted.
    async fn analyze_with_retry(
        &self,
        target: TargetId,
        batch: &[ReviewComment],
        deadline: DateTime<Utc>,
    ) -> Result<Vec<CommentAnalysis>, ExtractionInterruption> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);
            let left = self.time_left(deadline)?;
            let limit = self.config.call_timeout.min(left);
            let call = self.analysis.analyze(target, batch);
            let error = match tokio::time::timeout(limit, call).await {
                Ok(Ok(results)) => return Ok(results),
                Ok(Err(error)) => error,
                Err(_) if limit < self.config.call_timeout => {
                    return Err(ExtractionInterruption::DeadlineExceeded { deadline });
                }
                Err(_) => AnalysisError::TimedOut(self.config.call_timeout),
            };
            if !error.is_transient() {
                return Err(ExtractionInterruption::AnalysisFailed {
                    attempts: attempt,
                    error,
                });
            }
            let remaining = self.time_left(deadline)?;
            if attempt >= max_attempts {
                return Err(ExtractionInterruption::AnalysisFailed {
                    attempts: attempt,
                    error,
                });
            }
            let delay = self.retry_delay(attempt, &error);
            if delay >= remaining {
                return Err(ExtractionInterruption::DeadlineExceeded { deadline });
            }
            tracing::warn!(
                review_target = %target,
                attempt,
                max_attempts,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %error,
                "analysis call failed; retrying"
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    fn retry_delay(&self, attempt: u32, error: &AnalysisError) -> Duration {
        let backoff = self.config.backoff_for(attempt);
        match error {
            AnalysisError::RateLimited {
                retry_after: Some(requested),
            } => backoff.max(*requested),
            _ => backoff,
        }
    }

    async fn commit_batch(
        &self,
        target: TargetId,
        items: &[PendingItem],
        batch: &[ReviewComment],
        results: Vec<CommentAnalysis>,
        outcome: &mut ExtractionOutcome,
    ) -> StorageResult<()> {
        let now = self.clock.utc();
        let mut by_comment = attribute_results(target, batch, results);
        let mut entries = Vec::new();
        for (item, comment) in items.iter().zip(batch) {
            match by_comment.remove(&comment.id()) {
                Some(CommentAnalysis::Extracted { comment_id, drafts }) => {
                    entries.push(CacheEntry {
                        fingerprint: item.fingerprint.clone(),
                        comment_id,
                        drafts: drafts.clone(),
                        cached_at: now,
                    });
                    outcome.results.push(CommentDrafts {
                        position: item.position,
                        comment_id,
                        drafts,
                        from_cache: false,
                    });
                }
                Some(CommentAnalysis::Malformed(malformed)) => {
                    tracing::warn!(
                        review_target = %target,
                        comment_id = %malformed.comment_id,
                        reason = %malformed.reason,
                        "skipping comment with malformed extraction"
                    );
                    outcome.skipped.push(malformed);
                }
                None => {
                    tracing::warn!(
                        review_target = %target,
                        comment_id = %comment.id(),
                        "analysis returned no result for comment"
                    );
                    outcome.skipped.push(MalformedExtraction::new(
                        comment.id(),
                        "analysis returned no result for this comment",
                    ));
                }
            }
        }
        self.cache.store(target, entries).await?;
        outcome.batches = outcome.batches.saturating_add(1);
        outcome.progress.processed = outcome.progress.processed.saturating_add(items.len());
        let checkpoint = Checkpoint::new(
            target,
            outcome.progress.processed,
            outcome.progress.total,
            now,
        );
        self.checkpoints.save(&checkpoint).await?;
        tracing::debug!(
            review_target = %target,
            processed = outcome.progress.processed,
            total = outcome.progress.total,
            "batch committed"
        );
        Ok(())
    }
}

/// Indexes batch results by comment, dropping entries the batch did not ask
/// for and any repeated entry for the same comment.
fn attribute_results(
    target: TargetId,
    batch: &[ReviewComment],
    results: Vec<CommentAnalysis>,
) -> HashMap<CommentId, CommentAnalysis> {
    let mut by_comment = HashMap::with_capacity(results.len());
    for result in results {
        let comment_id = result.comment_id();
        if !batch.iter().any(|comment| comment.id() == comment_id) {
            tracing::warn!(
                review_target = %target,
                comment_id = %comment_id,
                "ignoring analysis result for a comment outside the batch"
            );
            continue;
        }
        if by_comment.contains_key(&comment_id) {
            tracing::warn!(
                review_target = %target,
                comment_id = %comment_id,
                "ignoring repeated analysis result"
            );
            continue;
        }
        by_comment.insert(comment_id, result);
    }
    by_comment
}
