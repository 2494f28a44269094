//! Adapter implementations for the document store port.

pub mod filesystem;
pub mod memory;

pub use filesystem::FileDocumentStore;
pub use memory::InMemoryDocumentStore;
