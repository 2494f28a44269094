//! Adapter implementations for the review source port.

pub mod memory;
