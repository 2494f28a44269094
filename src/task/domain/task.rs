//! Task aggregate root and verification history.

use super::{
    ExtractedTask, ImplementationStatus, Priority, ProvenanceKey, TaskDomainError, TaskId,
    TaskStatus, VerificationStatus,
};
use crate::review::domain::CommentLocation;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// One verification run recorded against a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// When the verification ran.
    pub verified_at: DateTime<Utc>,
    /// Whether every check passed.
    pub success: bool,
    /// Names of the checks that ran (build, test, lint, ...).
    pub checks: Vec<String>,
    /// Reason for failure, when `success` is false.
    pub failure_reason: Option<String>,
}

impl VerificationResult {
    /// Creates a passing result.
    #[must_use]
    pub fn passed(verified_at: DateTime<Utc>, checks: impl IntoIterator<Item = String>) -> Self {
        Self {
            verified_at,
            success: true,
            checks: checks.into_iter().collect(),
            failure_reason: None,
        }
    }

    /// Creates a failing result.
    #[must_use]
    pub fn failed(
        verified_at: DateTime<Utc>,
        checks: impl IntoIterator<Item = String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            verified_at,
            success: false,
            checks: checks.into_iter().collect(),
            failure_reason: Some(reason.into()),
        }
    }
}

/// Task aggregate root.
///
/// Fields split into two ownership classes. Content-owned fields
/// (description, priority, origin text, location) are refreshed by every
/// extraction. Operator-owned fields (status, implementation status,
/// verification status and history) change only through explicit operator
/// actions and are never touched by a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    description: String,
    priority: Priority,
    status: TaskStatus,
    implementation_status: ImplementationStatus,
    verification_status: VerificationStatus,
    origin_text: String,
    source: ProvenanceKey,
    location: Option<CommentLocation>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_verified_at: Option<DateTime<Utc>>,
    verification_history: Vec<VerificationResult>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted description.
    pub description: String,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted workflow status.
    pub status: TaskStatus,
    /// Persisted implementation status.
    pub implementation_status: ImplementationStatus,
    /// Persisted verification status.
    pub verification_status: VerificationStatus,
    /// Persisted source comment body.
    pub origin_text: String,
    /// Persisted provenance key.
    pub source: ProvenanceKey,
    /// Persisted file/line anchor.
    pub location: Option<CommentLocation>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted latest verification timestamp.
    pub last_verified_at: Option<DateTime<Utc>>,
    /// Persisted verification history, oldest first.
    pub verification_history: Vec<VerificationResult>,
}

impl Task {
    /// Creates a new `todo` task from an extracted draft.
    #[must_use]
    pub fn new_from_extraction(extracted: &ExtractedTask, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            description: extracted.draft().description().to_owned(),
            priority: extracted.draft().priority(),
            status: TaskStatus::Todo,
            implementation_status: ImplementationStatus::Unknown,
            verification_status: VerificationStatus::Unknown,
            origin_text: extracted.origin_text().to_owned(),
            source: *extracted.provenance(),
            location: extracted.location().cloned(),
            created_at: timestamp,
            updated_at: timestamp,
            last_verified_at: None,
            verification_history: Vec::new(),
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            description: data.description,
            priority: data.priority,
            status: data.status,
            implementation_status: data.implementation_status,
            verification_status: data.verification_status,
            origin_text: data.origin_text,
            source: data.source,
            location: data.location,
            created_at: data.created_at,
            updated_at: data.updated_at,
            last_verified_at: data.last_verified_at,
            verification_history: data.verification_history,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the task priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the implementation status.
    #[must_use]
    pub const fn implementation_status(&self) -> ImplementationStatus {
        self.implementation_status
    }

    /// Returns the verification status.
    #[must_use]
    pub const fn verification_status(&self) -> VerificationStatus {
        self.verification_status
    }

    /// Returns the verbatim source comment body.
    #[must_use]
    pub fn origin_text(&self) -> &str {
        &self.origin_text
    }

    /// Returns the provenance key.
    #[must_use]
    pub const fn source(&self) -> &ProvenanceKey {
        &self.source
    }

    /// Returns the file/line anchor, if any.
    #[must_use]
    pub const fn location(&self) -> Option<&CommentLocation> {
        self.location.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the timestamp of the latest verification, if any.
    #[must_use]
    pub const fn last_verified_at(&self) -> Option<DateTime<Utc>> {
        self.last_verified_at
    }

    /// Returns the verification history, oldest first.
    #[must_use]
    pub fn verification_history(&self) -> &[VerificationResult] {
        &self.verification_history
    }

    /// Replaces content-owned fields with those of a fresh extraction.
    ///
    /// Operator-owned fields are left untouched. The update timestamp only
    /// moves when something actually changed, so re-merging identical
    /// content is a no-op. Returns whether the task changed.
    pub fn refresh_content(&mut self, extracted: &ExtractedTask, clock: &impl Clock) -> bool {
        let draft = extracted.draft();
        let location = extracted.location();
        let unchanged = self.description == draft.description()
            && self.priority == draft.priority()
            && self.origin_text == extracted.origin_text()
            && self.location.as_ref() == location;
        if unchanged {
            return false;
        }

        draft.description().clone_into(&mut self.description);
        self.priority = draft.priority();
        extracted.origin_text().clone_into(&mut self.origin_text);
        self.location = location.cloned();
        self.touch(clock);
        true
    }

    /// Moves the task to `target` if the transition table allows it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when the
    /// transition is not permitted; the task is left unchanged.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(TaskDomainError::InvalidStatusTransition {
                task_id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.touch(clock);
        Ok(())
    }

    /// Cancels a non-terminal task whose source comment no longer yields it.
    ///
    /// This is a reconciliation action rather than an operator transition,
    /// so it bypasses the transition table. Returns whether the task changed.
    pub fn cancel_as_stale(&mut self, clock: &impl Clock) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = TaskStatus::Cancel;
        self.touch(clock);
        true
    }

    /// Records the implementation status reported by an operator or tool.
    pub fn set_implementation_status(&mut self, status: ImplementationStatus, clock: &impl Clock) {
        self.implementation_status = status;
        self.touch(clock);
    }

    /// Appends a verification run and updates the verification status.
    pub fn record_verification(&mut self, result: VerificationResult, clock: &impl Clock) {
        self.verification_status = if result.success {
            VerificationStatus::Verified
        } else {
            VerificationStatus::Failed
        };
        self.last_verified_at = Some(result.verified_at);
        self.verification_history.push(result);
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
