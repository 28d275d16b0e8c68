//! `PostgreSQL` adapters for feedback and task persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresRecordStore, SyncPgPool};
