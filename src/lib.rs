//! Feedbridge: feedback-to-task synchronisation engine.
//!
//! User-submitted bug and feature feedback is captured independently in each
//! deployment environment (staging, production). This crate reconciles those
//! captures into a single task backlog exactly once per feedback item, on
//! both a manual trigger and a twice-daily schedule, without losing items
//! and without creating duplicate tasks when runs overlap or are retried.
//!
//! # Architecture
//!
//! Feedbridge follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, log sinks)
//!
//! # Modules
//!
//! - [`sync`]: Feedback-to-task conversion, per-environment sync workers,
//!   and the cross-environment orchestrator
//! - [`scheduler`]: Twice-daily automatic trigger for the orchestrator
//! - [`config`]: Environment-variable driven process configuration

pub mod config;
pub mod scheduler;
pub mod sync;
