//! Application services for the extraction context.

pub mod extractor;
pub mod pipeline;

pub use extractor::{BatchExtractor, CommentDrafts, ExtractionOutcome};
pub use pipeline::{ExtractionPipeline, PipelineError, PipelineOutcome, PipelineResult};
