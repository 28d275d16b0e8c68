//! Sync services: per-environment workers and the cross-environment
//! orchestrator.

mod orchestrator;
mod report;
mod worker;

pub use orchestrator::{DEFAULT_ENVIRONMENT_TIMEOUT, EnvironmentHandle, SyncOrchestrator};
pub use report::{SyncRunResult, SyncSummary};
pub use worker::{DEFAULT_BATCH_LIMIT, EnvironmentSyncWorker};
