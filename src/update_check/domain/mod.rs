//! Domain model for release checks.

mod config;
mod state;
mod version;

pub use config::UpdateCheckConfig;
pub use state::{UpdateCheckState, UpdateNotice};
pub use version::{ParseVersionError, Version};
