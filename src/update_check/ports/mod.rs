//! Port contracts for release checks.

pub mod release;
pub mod state;

pub use release::{ReleaseSource, ReleaseSourceError};
pub use state::UpdateStateStore;
