//! Domain model for review-derived tasks.
//!
//! Covers the task aggregate and its status enums, provenance keys,
//! reconciliation of extracted drafts into the store, and the read-only
//! recommendation and thread-completion queries. Nothing here performs I/O.

mod draft;
mod error;
mod ids;
mod merge;
mod provenance;
mod recommendation;
mod status;
mod task;
mod thread;

pub use draft::{ExtractedTask, TaskDraft};
pub use error::{ParseTaskFieldError, TaskDomainError};
pub use ids::TaskId;
pub use merge::{MergeOutcome, StaleTaskPolicy, reconcile};
pub use provenance::{ProvenanceKey, ThreadKey};
pub use recommendation::{Recommendation, TaskStats, todo_queue};
pub use status::{ImplementationStatus, Priority, TaskStatus, VerificationStatus};
pub use task::{PersistedTaskData, Task, VerificationResult};
pub use thread::{ThreadCompletion, resolvable_threads};
