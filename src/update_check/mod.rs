//! Update-check bounded context.
//!
//! A best-effort release check that runs beside the pipeline. It never
//! blocks or fails the caller: errors are logged and swallowed, and the
//! only state it shares is the last successful check time.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
