//! Persisted release check state.

use super::Version;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Process-scoped record of the last successful release check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateCheckState {
    /// When the last check succeeded; `None` before the first one.
    pub last_checked: Option<DateTime<Utc>>,
}

impl UpdateCheckState {
    /// Returns whether a check is due at `now`.
    ///
    /// A timestamp in the future (clock skew) counts as due.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>, interval: Duration) -> bool {
        let Some(last) = self.last_checked else {
            return true;
        };
        if last > now {
            return true;
        }
        TimeDelta::from_std(interval)
            .ok()
            .and_then(|spacing| last.checked_add_signed(spacing))
            .is_none_or(|next| now >= next)
    }
}

/// A newer release than the running build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateNotice {
    /// Running version.
    pub current: Version,
    /// Latest published version.
    pub latest: Version,
}
