//! End-to-end extraction: fetch, extract, and merge into the task store.

use super::extractor::{BatchExtractor, ExtractionOutcome};
use crate::extraction::{
    domain::{ExtractionConfig, ExtractionInterruption, ExtractionProgress, MalformedExtraction},
    ports::{AnalysisService, CacheStore, CheckpointStore},
};
use crate::review::{
    domain::{CommentId, ReviewComment, TargetId},
    ports::{ReviewSource, ReviewSourceError},
};
use crate::storage::ports::StorageError;
use crate::task::{
    domain::{ExtractedTask, MergeOutcome, StaleTaskPolicy},
    ports::TaskRepository,
    services::{TaskLifecycleError, TaskLifecycleService},
};
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Summary of an extract-and-merge run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    /// Result of merging the extracted drafts into the store.
    pub merge: MergeOutcome,
    /// Comments skipped because their analysis output was unusable.
    pub skipped: Vec<MalformedExtraction>,
    /// Final extraction progress.
    pub progress: ExtractionProgress,
    /// Comments served from the cache.
    pub cache_hits: usize,
    /// Successful analysis calls made by the run.
    pub batches: usize,
}

/// Errors returned by [`ExtractionPipeline`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Cache or checkpoint storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Merging into the task store failed; the stored collection is unchanged.
    #[error(transparent)]
    Tasks(#[from] TaskLifecycleError),
    /// Review comments could not be fetched.
    #[error(transparent)]
    Source(#[from] ReviewSourceError),
    /// The run stopped early; partial results were merged and persisted.
    #[error(
        "extraction stopped after {processed} of {total} comments: {interruption}; run again to resume",
        processed = .outcome.progress.processed,
        total = .outcome.progress.total
    )]
    Incomplete {
        /// What was merged before the run stopped.
        outcome: Box<PipelineOutcome>,
        /// Why the run stopped.
        interruption: ExtractionInterruption,
    },
}

/// Result type for pipeline runs.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Composes batch extraction with idempotent task merging.
#[derive(Clone)]
pub struct ExtractionPipeline<A, K, P, R, C>
where
    A: AnalysisService,
    K: CacheStore,
    P: CheckpointStore,
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    extractor: BatchExtractor<A, K, P, C>,
    tasks: TaskLifecycleService<R, C>,
    cache: Arc<K>,
    checkpoints: Arc<P>,
}

impl<A, K, P, R, C> ExtractionPipeline<A, K, P, R, C>
where
    A: AnalysisService,
    K: CacheStore,
    P: CheckpointStore,
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Wires a pipeline from its collaborators.
    #[must_use]
    pub fn new(
        analysis: Arc<A>,
        cache: Arc<K>,
        checkpoints: Arc<P>,
        repository: Arc<R>,
        clock: Arc<C>,
        config: ExtractionConfig,
    ) -> Self {
        Self {
            extractor: BatchExtractor::new(
                analysis,
                Arc::clone(&cache),
                Arc::clone(&checkpoints),
                Arc::clone(&clock),
                config,
            ),
            tasks: TaskLifecycleService::new(repository, clock),
            cache,
            checkpoints,
        }
    }

    /// Returns the task lifecycle service sharing this pipeline's store.
    #[must_use]
    pub const fn tasks(&self) -> &TaskLifecycleService<R, C> {
        &self.tasks
    }

    /// Extracts tasks from `comments` and merges them into the target's
    /// store.
    ///
    /// With `force_refresh` the target's cache and checkpoint are dropped
    /// first, so every comment is analysed again.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Incomplete`] when extraction stopped early;
    /// the partial merge is already persisted. Storage and merge failures
    /// are returned as their own variants.
    pub async fn extract_and_merge(
        &self,
        target: TargetId,
        comments: &[ReviewComment],
        force_refresh: bool,
    ) -> PipelineResult<PipelineOutcome> {
        self.extract_and_merge_with_progress(target, comments, force_refresh, |_| {})
            .await
    }

    /// Like [`Self::extract_and_merge`], reporting progress after each
    /// batch.
    ///
    /// # Errors
    ///
    /// See [`Self::extract_and_merge`].
    pub async fn extract_and_merge_with_progress<F>(
        &self,
        target: TargetId,
        comments: &[ReviewComment],
        force_refresh: bool,
        on_progress: F,
    ) -> PipelineResult<PipelineOutcome>
    where
        F: FnMut(ExtractionProgress) + Send,
    {
        if force_refresh {
            self.reset(target).await?;
        }
        let distinct = distinct_comments(target, comments);
        let extraction = self.extractor.extract(target, &distinct, on_progress).await?;
        let extracted = bind_drafts(target, &distinct, &extraction);
        let policy = if extraction.is_complete() && extraction.skipped.is_empty() {
            self.extractor.config().stale_policy
        } else {
            StaleTaskPolicy::Retain
        };
        let merge = self.tasks.merge(target, &extracted, policy).await?;
        let cache_hits = extraction.cache_hits();
        let outcome = PipelineOutcome {
            merge,
            skipped: extraction.skipped,
            progress: extraction.progress,
            cache_hits,
            batches: extraction.batches,
        };
        if let Some(interruption) = extraction.interruption {
            return Err(PipelineError::Incomplete {
                outcome: Box::new(outcome),
                interruption,
            });
        }
        Ok(outcome)
    }

    /// Fetches the target's comments from `source` and runs
    /// [`Self::extract_and_merge`] over them.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Source`] when fetching fails, otherwise as
    /// [`Self::extract_and_merge`].
    pub async fn extract_from_source<S>(
        &self,
        source: &S,
        target: TargetId,
        force_refresh: bool,
    ) -> PipelineResult<PipelineOutcome>
    where
        S: ReviewSource + ?Sized,
    {
        let comments = source.comments(target).await?;
        self.extract_and_merge(target, &comments, force_refresh)
            .await
    }

    /// Drops the target's cache and checkpoint.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Storage`] when either document cannot be
    /// removed.
    pub async fn reset(&self, target: TargetId) -> PipelineResult<()> {
        let cache_cleared = self.cache.clear(target).await?;
        let checkpoint_cleared = self.checkpoints.clear(target).await?;
        tracing::info!(
            review_target = %target,
            cache_cleared,
            checkpoint_cleared,
            "cleared extraction state"
        );
        Ok(())
    }
}

/// Keeps the first occurrence of each comment id.
fn distinct_comments(target: TargetId, comments: &[ReviewComment]) -> Vec<ReviewComment> {
    let mut seen: HashSet<CommentId> = HashSet::with_capacity(comments.len());
    comments
        .iter()
        .filter(|comment| {
            let first = seen.insert(comment.id());
            if !first {
                tracing::warn!(
                    review_target = %target,
                    comment_id = %comment.id(),
                    "ignoring repeated comment"
                );
            }
            first
        })
        .cloned()
        .collect()
}

fn bind_drafts(
    target: TargetId,
    comments: &[ReviewComment],
    extraction: &ExtractionOutcome,
) -> Vec<ExtractedTask> {
    extraction
        .results
        .iter()
        .filter_map(|result| comments.get(result.position).map(|comment| (comment, result)))
        .flat_map(|(comment, result)| {
            ExtractedTask::all_from_comment(target, comment, &result.drafts)
        })
        .collect()
}
