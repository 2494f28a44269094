//! Domain model for cached, resumable task extraction.
//!
//! Everything here is pure: fingerprints, checkpoints, run planning, and
//! the error vocabulary shared by ports and services.

mod cache;
mod checkpoint;
mod config;
mod error;
mod fingerprint;
mod plan;

pub use cache::CacheEntry;
pub use checkpoint::{Checkpoint, ExtractionProgress};
pub use config::ExtractionConfig;
pub use error::{AnalysisError, ExtractionInterruption, MalformedExtraction};
pub use fingerprint::Fingerprint;
pub use plan::{ResumePlan, batch_ranges};
