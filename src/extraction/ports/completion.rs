//! Text completion port used by prompt-driven analysis.

use crate::extraction::domain::AnalysisError;
use async_trait::async_trait;

/// Backend that answers a rendered prompt with free text.
///
/// Transport failures map onto [`AnalysisError`] so retry policy stays in
/// the extractor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// Sends `prompt` and returns the raw reply.
    async fn complete(&self, prompt: String) -> Result<String, AnalysisError>;
}
