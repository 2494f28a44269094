//! Unit tests for the task module.

mod service_tests;

use crate::review::domain::{CommentId, ReviewComment, ReviewId, TargetId};
use crate::task::domain::{
    ExtractedTask, ImplementationStatus, PersistedTaskData, Priority, ProvenanceKey, Task,
    TaskDraft, TaskId, TaskStatus, VerificationStatus,
};
use chrono::{TimeZone, Utc};

pub(super) fn target() -> TargetId {
    TargetId::new(42).expect("valid target")
}

pub(super) fn comment(id: u64, body: &str) -> ReviewComment {
    ReviewComment::new(CommentId::new(id), ReviewId::new(7), "reviewer", body)
        .with_location("src/lib.rs", Some(10))
}

pub(super) fn draft(description: &str, priority: Priority) -> TaskDraft {
    TaskDraft::new(description, priority).expect("valid draft")
}

pub(super) fn extracted(comment: &ReviewComment, drafts: &[TaskDraft]) -> Vec<ExtractedTask> {
    ExtractedTask::all_from_comment(target(), comment, drafts)
}

/// Builds a stored task directly, bypassing the transition table.
pub(super) fn stored_task(
    comment_id: u64,
    task_index: u32,
    priority: Priority,
    status: TaskStatus,
) -> Task {
    let timestamp = Utc
        .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
        .single()
        .expect("valid timestamp");
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        description: format!("task {comment_id}/{task_index}"),
        priority,
        status,
        implementation_status: ImplementationStatus::Unknown,
        verification_status: VerificationStatus::Unknown,
        origin_text: format!("comment {comment_id}"),
        source: ProvenanceKey::new(
            target(),
            ReviewId::new(7),
            CommentId::new(comment_id),
            task_index,
        ),
        location: None,
        created_at: timestamp,
        updated_at: timestamp,
        last_verified_at: None,
        verification_history: Vec::new(),
    })
}
