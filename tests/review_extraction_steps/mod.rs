//! Step definitions for review extraction scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
