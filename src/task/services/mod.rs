//! Application services for task orchestration.

mod lifecycle;
mod recommend;
mod thread;

pub use lifecycle::{
    TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService, TransitionTaskRequest,
};
pub use recommend::RecommendationService;
pub use thread::ThreadStatusService;
