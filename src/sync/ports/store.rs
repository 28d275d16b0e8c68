//! Record store port for feedback reads and task writes.

use crate::sync::domain::{FeedbackId, FeedbackItem, SourceRef, Task};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for record store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of a conditional task insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The task was written.
    Created,
    /// A task with the same dedup key already existed; nothing was written.
    AlreadyExists,
}

/// One page of pending feedback reads.
///
/// Rows that could not be decoded into a [`FeedbackItem`] are parked as
/// skipped by the store and reported through `malformed`, so the pass that
/// read them can still account for them in its result.
#[derive(Debug, Clone, Default)]
pub struct PendingBatch {
    /// Items ready for conversion.
    pub items: Vec<FeedbackItem>,
    /// Number of rows parked as skipped because they could not be decoded.
    pub malformed: usize,
}

impl PendingBatch {
    /// Creates a batch of decodable items with no parked rows.
    #[must_use]
    pub const fn new(items: Vec<FeedbackItem>) -> Self {
        Self {
            items,
            malformed: 0,
        }
    }
}

/// Environment-scoped persistence contract over the `feedback` and `tasks`
/// collections.
///
/// One handle serves exactly one environment's store. The conditional
/// operations carry the engine's correctness guarantees: task uniqueness on
/// the dedup key is enforced at write time by [`insert_task_if_absent`],
/// and feedback status transitions are guarded on the row still being
/// `pending`.
///
/// [`insert_task_if_absent`]: RecordStore::insert_task_if_absent
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns up to `limit` feedback items still awaiting conversion,
    /// newest first.
    ///
    /// Rows that cannot be decoded are marked skipped with the decode
    /// failure as the reason and counted in [`PendingBatch::malformed`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the backing store cannot be
    /// reached and [`StoreError::CollectionMissing`] when the feedback
    /// collection has not been provisioned in this environment.
    async fn list_pending_feedback(&self, limit: i64) -> StoreResult<PendingBatch>;

    /// Point lookup of an existing task by dedup key.
    ///
    /// This read is an optimisation for reporting; the write-time constraint
    /// in [`RecordStore::insert_task_if_absent`] is the correctness
    /// mechanism.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup cannot be executed.
    async fn find_task_by_source(&self, source_ref: &SourceRef) -> StoreResult<Option<Task>>;

    /// Atomically inserts the task unless one with the same dedup key
    /// already exists.
    ///
    /// Implementations must make the uniqueness decision at write time (a
    /// store uniqueness constraint or an equivalent compare-and-swap), not
    /// with a separate read, so that concurrent or retried sync passes
    /// cannot both create a task for one feedback item.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write cannot be executed. A dedup
    /// collision is not an error; it reports
    /// [`InsertOutcome::AlreadyExists`].
    async fn insert_task_if_absent(&self, task: &Task) -> StoreResult<InsertOutcome>;

    /// Marks feedback as converted, guarded on the row still being
    /// `pending`.
    ///
    /// A row no longer `pending` makes this a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the update cannot be executed.
    async fn mark_feedback_converted(&self, id: &FeedbackId) -> StoreResult<()>;

    /// Marks feedback as skipped with the failure reason, guarded on the
    /// row still being `pending`.
    ///
    /// A row no longer `pending` makes this a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the update cannot be executed.
    async fn mark_feedback_skipped(&self, id: &FeedbackId, reason: &str) -> StoreResult<()>;
}

/// Errors returned by record store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The backing store cannot be reached (network or auth failure).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The named collection has not been provisioned in this environment.
    #[error("collection missing: {0}")]
    CollectionMissing(&'static str),

    /// Backend-reported failure.
    #[error("store backend error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
