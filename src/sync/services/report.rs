//! Run reports for sync passes.
//!
//! Reports are ephemeral: they exist for logging and for the caller of the
//! pass that produced them, and are never persisted.

use crate::sync::domain::{Environment, TaskId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-environment counts for one sync pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRunResult {
    /// Environment this pass covered.
    pub environment: Environment,
    /// Number of pending feedback items read.
    pub scanned: usize,
    /// Number of tasks written by this pass.
    pub created: usize,
    /// Number of items whose task already existed.
    pub already_existed: usize,
    /// Number of items that failed conversion or persistence.
    pub errored: usize,
    /// Identifiers of the tasks written by this pass.
    pub created_task_ids: Vec<TaskId>,
    /// Environment-level failure that aborted the pass, if any.
    pub failure: Option<String>,
}

impl SyncRunResult {
    /// Creates an empty result for an environment pass about to start.
    #[must_use]
    pub const fn empty(environment: Environment) -> Self {
        Self {
            environment,
            scanned: 0,
            created: 0,
            already_existed: 0,
            errored: 0,
            created_task_ids: Vec::new(),
            failure: None,
        }
    }

    /// Creates a result for a pass aborted by an environment-level failure.
    ///
    /// No item was marked converted, so the whole batch is retried on the
    /// next pass.
    #[must_use]
    pub fn environment_failed(environment: Environment, reason: impl Into<String>) -> Self {
        let mut result = Self::empty(environment);
        result.failure = Some(reason.into());
        result
    }

    /// Returns whether this pass saw item-level or environment-level
    /// failures.
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        self.errored > 0 || self.failure.is_some()
    }
}

impl fmt::Display for SyncRunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.failure {
            Some(reason) => write!(f, "{}: failed ({reason})", self.environment),
            None => write!(
                f,
                "{}: scanned {}, created {}, already existed {}, errored {}",
                self.environment, self.scanned, self.created, self.already_existed, self.errored
            ),
        }
    }
}

/// Aggregated report for one sync invocation across all environments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    runs: Vec<SyncRunResult>,
}

impl SyncSummary {
    /// Creates a summary from per-environment results.
    #[must_use]
    pub const fn new(runs: Vec<SyncRunResult>) -> Self {
        Self { runs }
    }

    /// Returns the per-environment results.
    #[must_use]
    pub fn runs(&self) -> &[SyncRunResult] {
        &self.runs
    }

    /// Returns the total number of tasks written.
    #[must_use]
    pub fn created(&self) -> usize {
        self.runs.iter().map(|run| run.created).sum()
    }

    /// Returns the total number of items whose task already existed.
    #[must_use]
    pub fn already_existed(&self) -> usize {
        self.runs.iter().map(|run| run.already_existed).sum()
    }

    /// Returns the total number of item-level failures.
    #[must_use]
    pub fn errored(&self) -> usize {
        self.runs.iter().map(|run| run.errored).sum()
    }

    /// Returns whether any environment reported item-level or
    /// environment-level failures.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.runs.iter().any(SyncRunResult::has_errors)
    }
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created {}, already existed {}, errored {}",
            self.created(),
            self.already_existed(),
            self.errored()
        )
    }
}
