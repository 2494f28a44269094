//! Persistence adapters for the task module.
//!
//! [`document::DocumentTaskRepository`] stores each target's task collection
//! as one JSON document on any [`DocumentStore`] substrate. Tests pair it
//! with the in-memory store; production pairs it with the filesystem store.
//!
//! [`DocumentStore`]: crate::storage::ports::DocumentStore

pub mod document;

pub use document::DocumentTaskRepository;
