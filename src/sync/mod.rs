//! Feedback-to-task synchronisation for Feedbridge.
//!
//! This module reconciles user feedback captured in multiple deployment
//! environments into a single task backlog, at most once per feedback item.
//! The write-time uniqueness guarantee on `(source, source_id)` is the
//! correctness mechanism; read-side duplicate checks are an optimisation
//! only. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Sync workers and the orchestrator in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
