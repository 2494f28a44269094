//! Port contracts for fetching review comments.

pub mod source;

pub use source::{ReviewSource, ReviewSourceError, ReviewSourceResult};
