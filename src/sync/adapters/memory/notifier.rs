//! Recording notifier for tests.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::sync::ports::{FeedbackConfirmation, FeedbackNotifier, NotifyError, NotifyResult};

/// Notifier that records every confirmation instead of dispatching it.
///
/// Can be switched into a failing mode to exercise the best-effort
/// semantics of the notification step.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    state: Arc<RwLock<RecordingState>>,
}

#[derive(Debug, Default)]
struct RecordingState {
    sent: Vec<FeedbackConfirmation>,
    failing: bool,
}

impl RecordingNotifier {
    /// Creates a notifier with an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles dispatch failure for every subsequent confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Dispatch`] when the state lock is poisoned.
    pub fn set_failing(&self, failing: bool) -> NotifyResult {
        let mut state = write_lock(&self.state)?;
        state.failing = failing;
        Ok(())
    }

    /// Returns the confirmations recorded so far.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Dispatch`] when the state lock is poisoned.
    pub fn sent(&self) -> Result<Vec<FeedbackConfirmation>, NotifyError> {
        let state = self
            .state
            .read()
            .map_err(|err| NotifyError::dispatch(std::io::Error::other(err.to_string())))?;
        Ok(state.sent.clone())
    }
}

#[async_trait]
impl FeedbackNotifier for RecordingNotifier {
    async fn notify(&self, confirmation: &FeedbackConfirmation) -> NotifyResult {
        let mut state = write_lock(&self.state)?;
        if state.failing {
            return Err(NotifyError::dispatch(std::io::Error::other(
                "simulated notification sink outage",
            )));
        }
        state.sent.push(confirmation.clone());
        Ok(())
    }
}

fn write_lock(
    state: &RwLock<RecordingState>,
) -> Result<std::sync::RwLockWriteGuard<'_, RecordingState>, NotifyError> {
    state
        .write()
        .map_err(|err| NotifyError::dispatch(std::io::Error::other(err.to_string())))
}
