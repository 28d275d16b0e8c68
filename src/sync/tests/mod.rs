//! Unit tests for the sync module.
//!
//! Tests are organised by concern: domain value objects, the pure
//! conversion engine, store adapter semantics, the per-environment worker,
//! and the cross-environment orchestrator.

mod orchestrator_tests;
mod support;
