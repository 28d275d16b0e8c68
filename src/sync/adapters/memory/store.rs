//! Thread-safe in-memory record store.
//!
//! Mirrors the behavioural contract of the `PostgreSQL` adapter: the insert
//! decision and the dedup index update happen under one lock, so concurrent
//! sync passes observe the same at-most-once guarantee the database's
//! unique constraint provides.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::sync::domain::{FeedbackId, FeedbackItem, FeedbackStatus, SourceRef, Task, TaskId};
use crate::sync::ports::{InsertOutcome, PendingBatch, RecordStore, StoreError, StoreResult};

/// Thread-safe in-memory record store for one environment.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    state: Arc<RwLock<InMemoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    feedback: HashMap<FeedbackId, FeedbackItem>,
    skip_reasons: HashMap<FeedbackId, String>,
    tasks: HashMap<TaskId, Task>,
    source_index: HashMap<SourceRef, TaskId>,
    unavailable: bool,
}

impl InMemoryRecordStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a feedback record, replacing any record with the same
    /// identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the state lock is poisoned.
    pub fn seed_feedback(&self, item: FeedbackItem) -> StoreResult<()> {
        let mut state = write_lock(&self.state)?;
        state.feedback.insert(item.id().clone(), item);
        Ok(())
    }

    /// Toggles simulated store unreachability for every subsequent
    /// operation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the state lock is poisoned.
    pub fn set_unavailable(&self, unavailable: bool) -> StoreResult<()> {
        let mut state = write_lock(&self.state)?;
        state.unavailable = unavailable;
        Ok(())
    }

    /// Returns the number of stored tasks.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the state lock is poisoned.
    pub fn task_count(&self) -> StoreResult<usize> {
        let state = read_lock(&self.state)?;
        Ok(state.tasks.len())
    }

    /// Returns the status of the identified feedback record, if present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the state lock is poisoned.
    pub fn feedback_status(&self, id: &FeedbackId) -> StoreResult<Option<FeedbackStatus>> {
        let state = read_lock(&self.state)?;
        Ok(state.feedback.get(id).map(FeedbackItem::status))
    }

    /// Returns the recorded skip reason for the identified feedback, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the state lock is poisoned.
    pub fn skip_reason(&self, id: &FeedbackId) -> StoreResult<Option<String>> {
        let state = read_lock(&self.state)?;
        Ok(state.skip_reasons.get(id).cloned())
    }

    fn mark_feedback(
        &self,
        id: &FeedbackId,
        status: FeedbackStatus,
        reason: Option<&str>,
    ) -> StoreResult<()> {
        let mut state = write_lock(&self.state)?;
        if state.unavailable {
            return Err(unavailable());
        }
        // Conditional update: rows no longer pending are left untouched.
        let Some(item) = state.feedback.get_mut(id) else {
            return Ok(());
        };
        if item.status() != FeedbackStatus::Pending {
            return Ok(());
        }
        item.set_status(status);
        if let Some(text) = reason {
            let key = id.clone();
            state.skip_reasons.insert(key, text.to_owned());
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn list_pending_feedback(&self, limit: i64) -> StoreResult<PendingBatch> {
        let state = read_lock(&self.state)?;
        if state.unavailable {
            return Err(unavailable());
        }
        let mut pending: Vec<FeedbackItem> = state
            .feedback
            .values()
            .filter(|item| item.status() == FeedbackStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        pending.truncate(usize::try_from(limit).unwrap_or(0));
        // Seeded records are already typed, so nothing can be malformed.
        Ok(PendingBatch::new(pending))
    }

    async fn find_task_by_source(&self, source_ref: &SourceRef) -> StoreResult<Option<Task>> {
        let state = read_lock(&self.state)?;
        if state.unavailable {
            return Err(unavailable());
        }
        let task = state
            .source_index
            .get(source_ref)
            .and_then(|task_id| state.tasks.get(task_id))
            .cloned();
        Ok(task)
    }

    async fn insert_task_if_absent(&self, task: &Task) -> StoreResult<InsertOutcome> {
        let mut state = write_lock(&self.state)?;
        if state.unavailable {
            return Err(unavailable());
        }
        let source_ref = task.source_ref();
        if state.source_index.contains_key(&source_ref) {
            return Ok(InsertOutcome::AlreadyExists);
        }
        state.source_index.insert(source_ref, task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(InsertOutcome::Created)
    }

    async fn mark_feedback_converted(&self, id: &FeedbackId) -> StoreResult<()> {
        self.mark_feedback(id, FeedbackStatus::Converted, None)
    }

    async fn mark_feedback_skipped(&self, id: &FeedbackId, reason: &str) -> StoreResult<()> {
        self.mark_feedback(id, FeedbackStatus::Skipped, Some(reason))
    }
}

fn unavailable() -> StoreError {
    StoreError::Unavailable("simulated store outage".to_owned())
}

fn read_lock(
    state: &RwLock<InMemoryState>,
) -> StoreResult<std::sync::RwLockReadGuard<'_, InMemoryState>> {
    state
        .read()
        .map_err(|err| StoreError::backend(std::io::Error::other(err.to_string())))
}

fn write_lock(
    state: &RwLock<InMemoryState>,
) -> StoreResult<std::sync::RwLockWriteGuard<'_, InMemoryState>> {
    state
        .write()
        .map_err(|err| StoreError::backend(std::io::Error::other(err.to_string())))
}
