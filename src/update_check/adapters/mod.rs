//! Adapter implementations for release check ports.

pub mod document;
pub mod fixed;

pub use document::DocumentUpdateStateStore;
pub use fixed::FixedReleaseSource;
