//! Status, priority, and progress enums carried by every task.

use super::ParseTaskFieldError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operator-facing workflow status of a task.
///
/// New tasks start as [`TaskStatus::Todo`]. Allowed transitions:
///
/// | from      | to                          |
/// |-----------|-----------------------------|
/// | `todo`    | `doing`                     |
/// | `doing`   | `done`, `pending`, `cancel` |
/// | `pending` | `doing`, `cancel`           |
///
/// `done` and `cancel` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has not started.
    Todo,
    /// Work is in progress.
    Doing,
    /// Work is blocked or deferred.
    Pending,
    /// Work is complete.
    Done,
    /// Work will not be done.
    Cancel,
}

impl TaskStatus {
    /// Every status, in workflow order.
    pub const ALL: [Self; 5] = [
        Self::Todo,
        Self::Doing,
        Self::Pending,
        Self::Done,
        Self::Cancel,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Doing => "doing",
            Self::Pending => "pending",
            Self::Done => "done",
            Self::Cancel => "cancel",
        }
    }

    /// Returns whether no further transitions are allowed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Cancel)
    }

    /// Returns whether the transition table permits moving to `target`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Todo, Self::Doing)
                | (Self::Doing, Self::Done | Self::Pending | Self::Cancel)
                | (Self::Pending, Self::Doing | Self::Cancel)
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskFieldError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Self::Todo),
            "doing" => Ok(Self::Doing),
            "pending" => Ok(Self::Pending),
            "done" => Ok(Self::Done),
            "cancel" => Ok(Self::Cancel),
            _ => Err(ParseTaskFieldError::new("task status", value)),
        }
    }
}

/// Urgency of a task as judged by the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Must be addressed before anything else.
    Critical,
    /// Should be addressed soon.
    High,
    /// Normal priority.
    Medium,
    /// Nice to have.
    Low,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Returns the sort rank; lower ranks are more urgent.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParseTaskFieldError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(ParseTaskFieldError::new("priority", value)),
        }
    }
}

/// Whether the change requested by a task has been implemented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplementationStatus {
    /// Not yet assessed.
    #[default]
    Unknown,
    /// The change is in place.
    Implemented,
    /// The change is missing.
    NotImplemented,
}

impl ImplementationStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Implemented => "implemented",
            Self::NotImplemented => "not_implemented",
        }
    }
}

impl TryFrom<&str> for ImplementationStatus {
    type Error = ParseTaskFieldError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "unknown" => Ok(Self::Unknown),
            "implemented" => Ok(Self::Implemented),
            "not_implemented" => Ok(Self::NotImplemented),
            _ => Err(ParseTaskFieldError::new("implementation status", value)),
        }
    }
}

/// Outcome of the most recent verification run for a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Never verified.
    #[default]
    Unknown,
    /// Verification was requested but has not run.
    NotVerified,
    /// Last verification passed.
    Verified,
    /// Last verification failed.
    Failed,
}

impl VerificationStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::NotVerified => "not_verified",
            Self::Verified => "verified",
            Self::Failed => "failed",
        }
    }
}

impl TryFrom<&str> for VerificationStatus {
    type Error = ParseTaskFieldError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "unknown" => Ok(Self::Unknown),
            "not_verified" => Ok(Self::NotVerified),
            "verified" => Ok(Self::Verified),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseTaskFieldError::new("verification status", value)),
        }
    }
}
