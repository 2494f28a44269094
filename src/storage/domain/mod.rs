//! Document addressing for the storage substrate.

mod key;

pub use key::DocumentKey;
