//! Cached extraction results.

use super::Fingerprint;
use crate::review::domain::CommentId;
use crate::task::domain::TaskDraft;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Drafts extracted from one comment version.
///
/// An empty draft list is a valid result: the comment asked for nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Fingerprint of the comment version the drafts came from.
    pub fingerprint: Fingerprint,
    /// Comment the drafts came from.
    pub comment_id: CommentId,
    /// Drafts in extraction order.
    pub drafts: Vec<TaskDraft>,
    /// When the result was produced.
    pub cached_at: DateTime<Utc>,
}
