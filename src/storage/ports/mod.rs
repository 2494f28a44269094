//! Port contracts for the storage substrate.

pub mod document_store;

pub use document_store::{
    DocumentStore, StorageError, StorageResult, read_json, write_json,
};
