//! Per-environment sync worker.
//!
//! One worker run reads a bounded batch of pending feedback from a single
//! environment and drives each item through
//! `Pending -> {Converted, AlreadyExists, Skipped}` independently: one
//! item's failure never aborts the batch, and an unreachable store aborts
//! only this environment's pass.

use crate::sync::domain::{
    Environment, FeedbackItem, SourceRef, convert, truncate_excerpt,
};
use crate::sync::ports::{
    FeedbackConfirmation, FeedbackNotifier, InsertOutcome, RecordStore, StoreError,
};
use crate::sync::services::SyncRunResult;
use mockable::Clock;
use std::sync::Arc;

/// Default bound on how many pending items one pass reads per environment.
pub const DEFAULT_BATCH_LIMIT: i64 = 50;

/// Sync worker for a single environment.
#[derive(Clone)]
pub struct EnvironmentSyncWorker<S, N, C>
where
    S: RecordStore,
    N: FeedbackNotifier,
    C: Clock + Send + Sync,
{
    environment: Environment,
    store: Arc<S>,
    notifier: Arc<N>,
    clock: Arc<C>,
    batch_limit: i64,
}

impl<S, N, C> EnvironmentSyncWorker<S, N, C>
where
    S: RecordStore,
    N: FeedbackNotifier,
    C: Clock + Send + Sync,
{
    /// Creates a worker for one environment's store.
    #[must_use]
    pub const fn new(
        environment: Environment,
        store: Arc<S>,
        notifier: Arc<N>,
        clock: Arc<C>,
        batch_limit: i64,
    ) -> Self {
        Self {
            environment,
            store,
            notifier,
            clock,
            batch_limit,
        }
    }

    /// Runs one sync pass over this environment.
    ///
    /// Never returns an error: environment-level failures are folded into
    /// the result so the orchestrator can keep processing other
    /// environments. A store that becomes unreachable mid-batch aborts the
    /// rest of this pass, leaving the unprocessed items pending for the
    /// next one.
    pub async fn run(&self) -> SyncRunResult {
        let batch = match self.store.list_pending_feedback(self.batch_limit).await {
            Ok(batch) => batch,
            Err(StoreError::CollectionMissing(collection)) => {
                tracing::warn!(
                    environment = self.environment.as_str(),
                    collection,
                    "collection not provisioned; nothing to sync"
                );
                return SyncRunResult::empty(self.environment);
            }
            Err(err) => {
                tracing::error!(
                    environment = self.environment.as_str(),
                    error = %err,
                    "environment pass aborted"
                );
                return SyncRunResult::environment_failed(self.environment, err.to_string());
            }
        };

        let mut result = SyncRunResult::empty(self.environment);
        result.scanned = batch.items.len() + batch.malformed;
        // Rows the store parked as undecodable still count as failures of
        // this pass so the summary surfaces them.
        result.errored += batch.malformed;
        for item in &batch.items {
            if let Err(err) = self.process_item(item, &mut result).await {
                tracing::error!(
                    environment = self.environment.as_str(),
                    feedback_id = %item.id(),
                    error = %err,
                    "store became unreachable; aborting environment pass"
                );
                result.failure = Some(err.to_string());
                break;
            }
        }
        tracing::info!(
            environment = self.environment.as_str(),
            scanned = result.scanned,
            created = result.created,
            already_existed = result.already_existed,
            errored = result.errored,
            "environment pass complete"
        );
        result
    }

    /// Drives one item through the conversion state machine.
    ///
    /// Returns [`StoreError::Unavailable`] to abort the whole pass: an
    /// unreachable store is not an item fault, and the item must stay
    /// pending rather than be terminally skipped.
    async fn process_item(
        &self,
        item: &FeedbackItem,
        result: &mut SyncRunResult,
    ) -> Result<(), StoreError> {
        let source_ref = SourceRef::new(item.environment().task_source(), item.id().clone());

        match self.store.find_task_by_source(&source_ref).await {
            Ok(Some(_)) => {
                self.finish_already_existing(item, result).await;
                return Ok(());
            }
            Ok(None) => {}
            Err(err @ StoreError::Unavailable(_)) => return Err(err),
            Err(err) => {
                // No write has happened yet; leave the item pending so the
                // next pass retries it.
                tracing::warn!(
                    environment = self.environment.as_str(),
                    feedback_id = %item.id(),
                    error = %err,
                    "duplicate lookup failed"
                );
                result.errored += 1;
                return Ok(());
            }
        }

        let task = convert(item, &*self.clock);
        match self.store.insert_task_if_absent(&task).await {
            Ok(InsertOutcome::Created) => {
                self.mark_converted(item).await;
                result.created += 1;
                result.created_task_ids.push(task.id());
                tracing::info!(
                    environment = self.environment.as_str(),
                    feedback_id = %item.id(),
                    task_id = %task.id(),
                    kind = item.kind().as_str(),
                    "task created"
                );
                self.notify_submitter(item).await;
            }
            Ok(InsertOutcome::AlreadyExists) => {
                // A concurrent pass won the race; the write-time outcome is
                // authoritative over the earlier lookup.
                self.finish_already_existing(item, result).await;
            }
            Err(err @ StoreError::Unavailable(_)) => return Err(err),
            Err(err) => {
                result.errored += 1;
                tracing::warn!(
                    environment = self.environment.as_str(),
                    feedback_id = %item.id(),
                    error = %err,
                    "task insert failed; marking feedback skipped"
                );
                if let Err(mark_err) = self
                    .store
                    .mark_feedback_skipped(item.id(), &err.to_string())
                    .await
                {
                    tracing::warn!(
                        environment = self.environment.as_str(),
                        feedback_id = %item.id(),
                        error = %mark_err,
                        "failed to mark feedback skipped"
                    );
                }
            }
        }
        Ok(())
    }

    async fn finish_already_existing(&self, item: &FeedbackItem, result: &mut SyncRunResult) {
        // Still advance the status so the item stops re-scanning.
        self.mark_converted(item).await;
        result.already_existed += 1;
    }

    async fn mark_converted(&self, item: &FeedbackItem) {
        if let Err(err) = self.store.mark_feedback_converted(item.id()).await {
            tracing::warn!(
                environment = self.environment.as_str(),
                feedback_id = %item.id(),
                error = %err,
                "failed to mark feedback converted"
            );
        }
    }

    async fn notify_submitter(&self, item: &FeedbackItem) {
        let Some(email) = item.submitter_email() else {
            return;
        };
        let confirmation = FeedbackConfirmation {
            email: email.to_owned(),
            kind: item.kind(),
            excerpt: truncate_excerpt(item.description()),
            environment: item.environment(),
        };
        // Post-commit and best-effort: a failed dispatch never changes
        // feedback or task state.
        if let Err(err) = self.notifier.notify(&confirmation).await {
            tracing::warn!(
                environment = self.environment.as_str(),
                feedback_id = %item.id(),
                error = %err,
                "confirmation dispatch failed"
            );
        }
    }
}
