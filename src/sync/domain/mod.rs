//! Domain types for feedback capture and task backlog records.

pub mod convert;
mod environment;
mod error;
mod feedback;
mod ids;
mod task;

pub use convert::{EXCERPT_LIMIT, convert, truncate_excerpt};
pub use environment::{Environment, SourceRef, TaskSource};
pub use error::{ParseEnumError, SyncDomainError};
pub use feedback::{FeedbackItem, FeedbackKind, FeedbackStatus, PersistedFeedbackData};
pub use ids::{FeedbackId, TaskId};
pub use task::{PersistedTaskData, Task, TaskPriority, TaskStatus, TaskType};
