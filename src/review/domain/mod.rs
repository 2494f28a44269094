//! Domain model for review comments and their identities.

mod comment;
mod error;
mod ids;

pub use comment::{CommentLocation, ReviewComment};
pub use error::ReviewDomainError;
pub use ids::{CommentId, ReviewId, TargetId};
