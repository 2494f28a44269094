//! Release check settings.

use std::time::Duration;

/// Settings for the background release check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCheckConfig {
    /// Whether checks run at all.
    pub enabled: bool,
    /// Minimum time between successful checks.
    pub interval: Duration,
    /// Upper bound on one release lookup.
    pub timeout: Duration,
    /// Version of the running build.
    pub current_version: String,
}

impl Default for UpdateCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(24 * 60 * 60),
            timeout: Duration::from_secs(3),
            current_version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

impl UpdateCheckConfig {
    /// Returns the defaults with checks switched off.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Overrides the running version.
    #[must_use]
    pub fn with_current_version(mut self, version: impl Into<String>) -> Self {
        self.current_version = version.into();
        self
    }

    /// Overrides the check interval.
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Overrides the lookup timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
