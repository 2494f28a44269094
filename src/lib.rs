//! Reviewtask: turn code review comments into a tracked task list.
//!
//! The crate extracts actionable tasks from review comments through an
//! analysis service, caches results by comment fingerprint, checkpoints
//! batch progress so interrupted runs resume, and merges results into a
//! per-target task store without disturbing operator-owned state.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (files, memory, backends)
//! - **Services**: Orchestration over ports
//!
//! # Modules
//!
//! - [`review`]: Review targets, comments, and the review source port
//! - [`storage`]: Durable per-target document storage
//! - [`task`]: Task model, reconciliation, recommendation, and thread tracking
//! - [`extraction`]: Cached, resumable batch extraction and the pipeline
//! - [`update_check`]: Best-effort background release check

pub mod extraction;
pub mod review;
pub mod storage;
pub mod task;
pub mod update_check;
