//! Extraction bounded context.
//!
//! Turns review comments into task drafts through an analysis service,
//! caching results by content fingerprint and checkpointing batch progress
//! so interrupted runs resume without repeating work.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
