//! Task store for review-derived work items.
//!
//! Tasks are extracted from review comments and reconciled into a durable,
//! per-target collection. Repeated merges are idempotent: each task is keyed
//! by its provenance (target, review, comment, task index), content-owned
//! fields follow the latest extraction, and operator-owned status fields are
//! never overwritten. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
