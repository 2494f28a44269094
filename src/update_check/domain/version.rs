//! Dotted numeric release versions.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a version string is not dotted numeric.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid version: {0}")]
pub struct ParseVersionError(pub String);

/// Release version such as `1.4.0` or `v2.0`.
///
/// A leading `v` and any pre-release or build suffix (`-rc.1`, `+sha`) are
/// ignored. Missing components compare as zero, so `1.2` equals `1.2.0`.
///
/// # Examples
///
///     use reviewtask::update_check::domain::Version;
///
///     let current: Version = "1.2.0".parse().expect("valid version");
///     let latest: Version = "v1.10".parse().expect("valid version");
///     assert!(latest > current);
#[derive(Debug, Clone, Eq)]
pub struct Version {
    components: Vec<u64>,
}

impl Version {
    /// Returns the numeric components.
    #[must_use]
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    fn component(&self, position: usize) -> u64 {
        self.components.get(position).copied().unwrap_or_default()
    }
}

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        let unprefixed = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        let core = unprefixed
            .split(['-', '+'])
            .next()
            .unwrap_or_default();
        let components = core
            .split('.')
            .map(str::parse::<u64>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ParseVersionError(text.to_owned()))?;
        if components.is_empty() {
            return Err(ParseVersionError(text.to_owned()));
        }
        Ok(Self { components })
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let width = self.components.len().max(other.components.len());
        (0..width)
            .map(|position| self.component(position).cmp(&other.component(position)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.components.iter().map(u64::to_string).collect();
        f.write_str(&rendered.join("."))
    }
}
