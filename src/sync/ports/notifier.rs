//! Notification port for feedback submission confirmations.

use crate::sync::domain::{Environment, FeedbackKind};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notification dispatch.
pub type NotifyResult = Result<(), NotifyError>;

/// Confirmation payload for one converted feedback item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackConfirmation {
    /// Submitter address the confirmation is sent to.
    pub email: String,
    /// Category of the original submission.
    pub kind: FeedbackKind,
    /// Truncated description excerpt echoed back to the submitter.
    pub excerpt: String,
    /// Environment the feedback was captured in.
    pub environment: Environment,
}

/// Best-effort confirmation dispatch to feedback submitters.
///
/// Dispatch happens after the task write has committed; a failure here is
/// logged by the caller and never rolls back the conversion or changes
/// feedback status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackNotifier: Send + Sync {
    /// Emits a confirmation for one converted feedback item.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when rendering or dispatch fails.
    async fn notify(&self, confirmation: &FeedbackConfirmation) -> NotifyResult;
}

/// Errors returned by notifier implementations.
#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    /// The confirmation message could not be rendered.
    #[error("confirmation rendering failed: {0}")]
    Render(String),

    /// The notification sink rejected the dispatch.
    #[error("notification dispatch failed: {0}")]
    Dispatch(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotifyError {
    /// Wraps a sink dispatch error.
    pub fn dispatch(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Dispatch(Arc::new(err))
    }
}
