//! Review records consumed from the hosting platform.
//!
//! Review comments are read-only input to the extraction pipeline. This
//! module defines the identifiers shared by every other context (target,
//! review, and comment identities) and the [`ports::ReviewSource`] contract
//! through which comments are fetched.

pub mod adapters;
pub mod domain;
pub mod ports;
