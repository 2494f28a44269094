//! Programmable analysis service for tests and offline runs.

use crate::extraction::{
    domain::{AnalysisError, MalformedExtraction},
    ports::{AnalysisResult, AnalysisService, CommentAnalysis},
};
use crate::review::domain::{CommentId, ReviewComment, TargetId};
use crate::task::domain::{Priority, TaskDraft};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
enum ScriptedReply {
    Drafts(Vec<TaskDraft>),
    Malformed(String),
    Omitted,
}

#[derive(Debug, Default)]
struct ScriptState {
    replies: HashMap<CommentId, ScriptedReply>,
    queued_failures: VecDeque<AnalysisError>,
    failure_after: Option<(usize, AnalysisError)>,
    invocations: usize,
    analyzed: Vec<CommentId>,
}

/// Analysis service whose replies are scripted per comment.
///
/// Unscripted comments echo their body as a single medium-priority draft
/// (or no draft when the body is blank). Every call is counted, so tests
/// can assert exactly which comments reached the service.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAnalysisService {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedAnalysisService {
    /// Creates a service with no scripted replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the drafts returned for `comment_id`.
    pub fn respond(&self, comment_id: CommentId, drafts: Vec<TaskDraft>) {
        self.with_state(|state| {
            state
                .replies
                .insert(comment_id, ScriptedReply::Drafts(drafts));
        });
    }

    /// Scripts a malformed result for `comment_id`.
    pub fn malformed(&self, comment_id: CommentId, reason: impl Into<String>) {
        let reply = ScriptedReply::Malformed(reason.into());
        self.with_state(|state| {
            state.replies.insert(comment_id, reply);
        });
    }

    /// Leaves `comment_id` out of every reply.
    pub fn omit(&self, comment_id: CommentId) {
        self.with_state(|state| {
            state.replies.insert(comment_id, ScriptedReply::Omitted);
        });
    }

    /// Fails the next call with `error`; queued failures apply in order.
    pub fn fail_next(&self, error: AnalysisError) {
        self.with_state(|state| state.queued_failures.push_back(error));
    }

    /// Lets `successes` more calls through, then fails every call with
    /// `error` until [`Self::recover`] is called.
    pub fn fail_after(&self, successes: usize, error: AnalysisError) {
        self.with_state(|state| state.failure_after = Some((successes, error)));
    }

    /// Removes every scripted failure.
    pub fn recover(&self) {
        self.with_state(|state| {
            state.queued_failures.clear();
            state.failure_after = None;
        });
    }

    /// Returns how many calls were made, including failed ones.
    #[must_use]
    pub fn invocations(&self) -> usize {
        self.with_state(|state| state.invocations)
    }

    /// Returns the comments sent in calls that succeeded, in call order.
    #[must_use]
    pub fn analyzed_comments(&self) -> Vec<CommentId> {
        self.with_state(|state| state.analyzed.clone())
    }

    fn with_state<T>(&self, action: impl FnOnce(&mut ScriptState) -> T) -> T {
        let mut guard = lock(&self.state);
        action(&mut guard)
    }
}

fn lock(state: &Mutex<ScriptState>) -> MutexGuard<'_, ScriptState> {
    state
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn next_failure(state: &mut ScriptState) -> Option<AnalysisError> {
    if let Some(error) = state.queued_failures.pop_front() {
        return Some(error);
    }
    match state.failure_after.as_mut() {
        Some((0, error)) => Some(error.clone()),
        Some((remaining, _)) => {
            *remaining = remaining.saturating_sub(1);
            None
        }
        None => None,
    }
}

fn echo(comment: &ReviewComment) -> Vec<TaskDraft> {
    TaskDraft::new(comment.body(), Priority::Medium)
        .map(|draft| vec![draft])
        .unwrap_or_default()
}

#[async_trait]
impl AnalysisService for ScriptedAnalysisService {
    async fn analyze(
        &self,
        _target: TargetId,
        comments: &[ReviewComment],
    ) -> AnalysisResult<Vec<CommentAnalysis>> {
        let mut state = lock(&self.state);
        state.invocations = state.invocations.saturating_add(1);
        if let Some(error) = next_failure(&mut state) {
            return Err(error);
        }
        state
            .analyzed
            .extend(comments.iter().map(ReviewComment::id));
        Ok(comments
            .iter()
            .filter_map(|comment| {
                let comment_id = comment.id();
                match state.replies.get(&comment_id) {
                    Some(ScriptedReply::Drafts(drafts)) => Some(CommentAnalysis::Extracted {
                        comment_id,
                        drafts: drafts.clone(),
                    }),
                    Some(ScriptedReply::Malformed(reason)) => Some(CommentAnalysis::Malformed(
                        MalformedExtraction::new(comment_id, reason.clone()),
                    )),
                    Some(ScriptedReply::Omitted) => None,
                    None => Some(CommentAnalysis::Extracted {
                        comment_id,
                        drafts: echo(comment),
                    }),
                }
            })
            .collect())
    }
}
