//! In-memory record store and notifier for tests and local runs.

mod notifier;
mod store;

pub use notifier::RecordingNotifier;
pub use store::InMemoryRecordStore;
