//! Content fingerprints used as extraction cache keys.

use crate::review::domain::{ReviewComment, TargetId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Bumped whenever the hashed fields change, so old cache entries miss.
const FINGERPRINT_VERSION: &[u8] = b"reviewtask-fingerprint-v1";

/// Field separator fed to the hasher between variable-length fields.
const FIELD_SEPARATOR: [u8; 1] = [0x1f];

/// Stable SHA-256 fingerprint of a comment's identity, content, and anchor.
///
/// Any edit to the body or anchor yields a new fingerprint, so edited
/// comments miss the cache instead of returning stale drafts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Computes the fingerprint of `comment` on `target`.
    #[must_use]
    pub fn of(target: TargetId, comment: &ReviewComment) -> Self {
        let mut hasher = Sha256::new();
        let location = comment.location();
        let line = location
            .and_then(|loc| loc.line)
            .map(|value| value.to_string())
            .unwrap_or_default();
        let target_key = target.storage_key();
        let review = comment.review_id().value().to_string();
        let id = comment.id().value().to_string();
        let fields: [&[u8]; 8] = [
            FINGERPRINT_VERSION,
            target_key.as_bytes(),
            review.as_bytes(),
            id.as_bytes(),
            comment.author().as_bytes(),
            comment.body().as_bytes(),
            location.map(|loc| loc.file.as_str()).unwrap_or_default().as_bytes(),
            line.as_bytes(),
        ];
        for field in fields {
            hasher.update(field);
            hasher.update(FIELD_SEPARATOR);
        }
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Returns the lowercase hexadecimal digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
