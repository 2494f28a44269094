//! Keys identifying persisted documents.

use crate::review::domain::TargetId;
use std::fmt;

/// Address of one independently persisted document.
///
/// Per-target documents live under the target's storage key; the
/// update-check state is process-scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKey {
    /// Ordered task collection for a target.
    Tasks(TargetId),
    /// In-progress extraction checkpoint for a target.
    Checkpoint(TargetId),
    /// Fingerprint-to-drafts extraction cache for a target.
    Cache(TargetId),
    /// Last successful release check.
    UpdateCheckState,
}

impl DocumentKey {
    /// Returns the owning target for per-target documents.
    #[must_use]
    pub const fn target(self) -> Option<TargetId> {
        match self {
            Self::Tasks(target) | Self::Checkpoint(target) | Self::Cache(target) => Some(target),
            Self::UpdateCheckState => None,
        }
    }

    /// Returns the document file name.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Tasks(_) => "tasks.json",
            Self::Checkpoint(_) => "checkpoint.json",
            Self::Cache(_) => "cache.json",
            Self::UpdateCheckState => "update_check.json",
        }
    }

    /// Returns the path of the document relative to the storage root.
    #[must_use]
    pub fn relative_path(self) -> String {
        self.target().map_or_else(
            || self.file_name().to_owned(),
            |target| format!("{}/{}", target.storage_key(), self.file_name()),
        )
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relative_path())
    }
}
