//! Persistent storage substrate shared by every store in the crate.
//!
//! Task collections, extraction checkpoints, extraction caches, and the
//! update-check state are all persisted as independent JSON documents
//! addressed by a [`domain::DocumentKey`]. Keeping the substrate behind the
//! [`ports::DocumentStore`] port lets reconciliation and extraction logic run
//! against [`adapters::memory::InMemoryDocumentStore`] in tests while
//! production uses [`adapters::filesystem::FileDocumentStore`].

pub mod adapters;
pub mod domain;
pub mod ports;
