//! Adapter implementations for extraction ports.

pub mod document;
pub mod prompt;
pub mod scripted;

pub use document::{DocumentCacheStore, DocumentCheckpointStore};
pub use prompt::{DEFAULT_PROMPT_TEMPLATE, PromptAnalysisService, parse_reply};
pub use scripted::ScriptedAnalysisService;
