//! Application services for release checks.

pub mod checker;

pub use checker::{BackgroundCheck, UpdateCheckError, UpdateChecker};
