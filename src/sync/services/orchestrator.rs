//! Cross-environment sync orchestration.
//!
//! The orchestrator is stateless and callable independently of how it is
//! triggered: the scheduler and the manual CLI trigger invoke the same
//! entry point. Environments are processed concurrently and never require
//! mutual success.

use crate::sync::domain::Environment;
use crate::sync::ports::{FeedbackNotifier, RecordStore};
use crate::sync::services::{EnvironmentSyncWorker, SyncRunResult, SyncSummary};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;

/// Default bound on one environment's pass duration.
pub const DEFAULT_ENVIRONMENT_TIMEOUT: Duration = Duration::from_secs(300);

/// Store handle for one configured environment.
#[derive(Clone)]
pub struct EnvironmentHandle<S>
where
    S: RecordStore,
{
    environment: Environment,
    store: Arc<S>,
}

impl<S> EnvironmentHandle<S>
where
    S: RecordStore,
{
    /// Creates a handle binding an environment to its store.
    #[must_use]
    pub const fn new(environment: Environment, store: Arc<S>) -> Self {
        Self { environment, store }
    }
}

/// Runs sync workers across all configured environments.
#[derive(Clone)]
pub struct SyncOrchestrator<S, N, C>
where
    S: RecordStore,
    N: FeedbackNotifier,
    C: Clock + Send + Sync,
{
    environments: Vec<EnvironmentHandle<S>>,
    notifier: Arc<N>,
    clock: Arc<C>,
    batch_limit: i64,
    environment_timeout: Duration,
}

impl<S, N, C> SyncOrchestrator<S, N, C>
where
    S: RecordStore + 'static,
    N: FeedbackNotifier + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates an orchestrator over the configured environments.
    #[must_use]
    pub const fn new(
        environments: Vec<EnvironmentHandle<S>>,
        notifier: Arc<N>,
        clock: Arc<C>,
        batch_limit: i64,
        environment_timeout: Duration,
    ) -> Self {
        Self {
            environments,
            notifier,
            clock,
            batch_limit,
            environment_timeout,
        }
    }

    /// Runs one sync pass across all configured environments.
    ///
    /// A timed-out or failed environment is reported in its own result and
    /// never prevents the other environments from completing. Overlapping
    /// invocations are safe: re-processing an already-converted item is a
    /// no-op by the store's write-time uniqueness guarantee, so no run-lock
    /// is held.
    pub async fn run_sync(&self) -> SyncSummary {
        let mut handles = Vec::with_capacity(self.environments.len());
        for handle in &self.environments {
            let worker = EnvironmentSyncWorker::new(
                handle.environment,
                Arc::clone(&handle.store),
                Arc::clone(&self.notifier),
                Arc::clone(&self.clock),
                self.batch_limit,
            );
            let environment = handle.environment;
            let timeout = self.environment_timeout;
            handles.push((
                environment,
                tokio::spawn(async move {
                    match tokio::time::timeout(timeout, worker.run()).await {
                        Ok(run) => run,
                        Err(_) => {
                            // Items already marked stay converted; the rest
                            // remain pending for the next pass.
                            SyncRunResult::environment_failed(
                                environment,
                                format!(
                                    "environment pass timed out after {}s",
                                    timeout.as_secs()
                                ),
                            )
                        }
                    }
                }),
            ));
        }

        let mut runs = Vec::with_capacity(handles.len());
        for (environment, handle) in handles {
            match handle.await {
                Ok(run) => runs.push(run),
                Err(err) => runs.push(SyncRunResult::environment_failed(
                    environment,
                    format!("environment pass aborted: {err}"),
                )),
            }
        }

        let summary = SyncSummary::new(runs);
        tracing::info!(
            created = summary.created(),
            already_existed = summary.already_existed(),
            errored = summary.errored(),
            "sync pass complete"
        );
        summary
    }
}
