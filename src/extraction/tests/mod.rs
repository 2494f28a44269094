//! Unit tests for the extraction context.


use crate::review::domain::{CommentId, ReviewComment, ReviewId, TargetId};
use crate::task::domain::{Priority, TaskDraft};
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use std::sync::{Arc, Mutex, PoisonError};

pub(super) fn target() -> TargetId {
    TargetId::new(17).expect("valid target")
}

pub(super) fn comment(id: u64, body: &str) -> ReviewComment {
    ReviewComment::new(CommentId::new(id), ReviewId::new(3), "reviewer", body)
        .with_location("src/lib.rs", u32::try_from(id).ok())
}

pub(super) fn comments(count: u64) -> Vec<ReviewComment> {
    (1..=count)
        .map(|id| comment(id, &format!("Address point {id}")))
        .collect()
}

pub(super) fn draft(description: &str, priority: Priority) -> TaskDraft {
    TaskDraft::new(description, priority).expect("valid draft")
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub(super) struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub(super) fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub(super) fn advance(&self, step: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += step;
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
