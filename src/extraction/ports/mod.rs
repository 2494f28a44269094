//! Port contracts for the extraction context.

pub mod analysis;
pub mod cache;
pub mod checkpoint;
pub mod completion;

pub use analysis::{AnalysisResult, AnalysisService, CommentAnalysis};
pub use cache::CacheStore;
pub use checkpoint::CheckpointStore;
pub use completion::TextCompletion;

#[cfg(test)]
pub use completion::MockTextCompletion;
