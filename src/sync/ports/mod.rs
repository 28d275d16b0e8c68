//! Port contracts for feedback synchronisation.
//!
//! Ports define infrastructure-agnostic interfaces used by sync services.

pub mod notifier;
pub mod store;

pub use notifier::{FeedbackConfirmation, FeedbackNotifier, NotifyError, NotifyResult};
pub use store::{InsertOutcome, PendingBatch, RecordStore, StoreError, StoreResult};
