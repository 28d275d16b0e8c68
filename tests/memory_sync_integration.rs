//! Behavioural integration tests for the sync pipeline over the in-memory
//! adapter.
//!
//! These tests exercise the orchestrator, worker, conversion engine, and
//! store contract together in realistic end-to-end flows, the same wiring
//! the binary uses with the `PostgreSQL` adapter swapped out.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]
#![expect(
    clippy::indexing_slicing,
    reason = "Test code uses indexing after length checks"
)]
#![expect(
    clippy::cognitive_complexity,
    reason = "Test functions may have higher complexity for full scenario coverage"
)]

use chrono::{TimeZone, Utc};
use feedbridge::sync::{
    adapters::memory::{InMemoryRecordStore, RecordingNotifier},
    domain::{
        Environment, FeedbackId, FeedbackItem, FeedbackKind, FeedbackStatus,
        PersistedFeedbackData, SourceRef, TaskPriority, TaskSource, TaskStatus, TaskType,
    },
    ports::RecordStore,
    services::{EnvironmentHandle, SyncOrchestrator},
};
use mockable::DefaultClock;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

/// Creates a tokio runtime for async operations in tests.
fn test_runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to create test runtime")
}

fn pending_feedback(
    id: &str,
    environment: Environment,
    kind: FeedbackKind,
    description: &str,
    email: Option<&str>,
) -> FeedbackItem {
    FeedbackItem::from_persisted(PersistedFeedbackData {
        id: FeedbackId::new(id).expect("valid id"),
        environment,
        kind,
        description: description.to_owned(),
        submitter_email: email.map(str::to_owned),
        page_url: Some("https://app.example.com/checkout".to_owned()),
        user_agent: Some("Mozilla/5.0".to_owned()),
        has_screenshot: false,
        status: FeedbackStatus::Pending,
        created_at: Utc
            .with_ymd_and_hms(2025, 2, 28, 8, 30, 0)
            .single()
            .expect("valid timestamp"),
    })
    .expect("valid feedback")
}

fn build_orchestrator(
    staging: &Arc<InMemoryRecordStore>,
    production: &Arc<InMemoryRecordStore>,
    notifier: &Arc<RecordingNotifier>,
) -> SyncOrchestrator<InMemoryRecordStore, RecordingNotifier, DefaultClock> {
    SyncOrchestrator::new(
        vec![
            EnvironmentHandle::new(Environment::Staging, Arc::clone(staging)),
            EnvironmentHandle::new(Environment::Production, Arc::clone(production)),
        ],
        Arc::clone(notifier),
        Arc::new(DefaultClock),
        50,
        Duration::from_secs(30),
    )
}

/// Runs a full pass over both environments and verifies task shape,
/// feedback state transitions, and submitter confirmations.
#[test]
fn full_pass_converts_feedback_across_environments() {
    let rt = test_runtime();
    let staging = Arc::new(InMemoryRecordStore::new());
    let production = Arc::new(InMemoryRecordStore::new());
    let notifier = Arc::new(RecordingNotifier::new());

    staging
        .seed_feedback(pending_feedback(
            "fb-501",
            Environment::Staging,
            FeedbackKind::Bug,
            "Checkout total ignores the discount code",
            Some("shopper@example.com"),
        ))
        .expect("seed staging");
    production
        .seed_feedback(pending_feedback(
            "fb-502",
            Environment::Production,
            FeedbackKind::Feature,
            "Support exporting invoices as CSV",
            None,
        ))
        .expect("seed production");

    let orchestrator = build_orchestrator(&staging, &production, &notifier);
    let summary = rt.block_on(orchestrator.run_sync());

    assert_eq!(summary.created(), 2);
    assert_eq!(summary.already_existed(), 0);
    assert!(!summary.has_errors());

    // Staging bug produced a high-priority bug-fix task.
    let staging_ref = SourceRef::new(
        TaskSource::StagingFeedback,
        FeedbackId::new("fb-501").expect("valid id"),
    );
    let bug_task = rt
        .block_on(staging.find_task_by_source(&staging_ref))
        .expect("staging lookup")
        .expect("staging task exists");
    assert_eq!(
        bug_task.title(),
        "[STAGING] Bug: Checkout total ignores the discount code"
    );
    assert_eq!(bug_task.task_type(), TaskType::BugFix);
    assert_eq!(bug_task.priority(), TaskPriority::High);
    assert_eq!(bug_task.status(), TaskStatus::Pending);

    // Production feature produced a medium-priority feature request.
    let production_ref = SourceRef::new(
        TaskSource::ProductionFeedback,
        FeedbackId::new("fb-502").expect("valid id"),
    );
    let feature_task = rt
        .block_on(production.find_task_by_source(&production_ref))
        .expect("production lookup")
        .expect("production task exists");
    assert_eq!(
        feature_task.title(),
        "[PRODUCTION] Feature: Support exporting invoices as CSV"
    );
    assert_eq!(feature_task.task_type(), TaskType::FeatureRequest);
    assert_eq!(feature_task.priority(), TaskPriority::Medium);

    // Both source records moved out of the pending pool.
    assert_eq!(
        staging
            .feedback_status(&FeedbackId::new("fb-501").expect("valid id"))
            .expect("status lookup"),
        Some(FeedbackStatus::Converted)
    );
    assert_eq!(
        production
            .feedback_status(&FeedbackId::new("fb-502").expect("valid id"))
            .expect("status lookup"),
        Some(FeedbackStatus::Converted)
    );

    // Only the submitter who left an email gets a confirmation.
    let sent = notifier.sent().expect("recorded confirmations");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].email, "shopper@example.com");
    assert_eq!(sent[0].environment, Environment::Staging);
}

/// A pass repeated over the same records creates nothing new.
#[test]
fn repeated_passes_are_idempotent() {
    let rt = test_runtime();
    let staging = Arc::new(InMemoryRecordStore::new());
    let production = Arc::new(InMemoryRecordStore::new());
    let notifier = Arc::new(RecordingNotifier::new());

    staging
        .seed_feedback(pending_feedback(
            "fb-601",
            Environment::Staging,
            FeedbackKind::Bug,
            "Session expires during upload",
            Some("uploader@example.com"),
        ))
        .expect("seed staging");

    let orchestrator = build_orchestrator(&staging, &production, &notifier);
    let first = rt.block_on(orchestrator.run_sync());
    let second = rt.block_on(orchestrator.run_sync());

    assert_eq!(first.created(), 1);
    assert_eq!(second.created(), 0);
    assert_eq!(staging.task_count().expect("task count"), 1);

    // No duplicate confirmation either.
    assert_eq!(notifier.sent().expect("recorded confirmations").len(), 1);
}

/// A store outage in one environment leaves its records untouched and the
/// other environment unaffected; the next pass picks the batch up again.
#[test]
fn outage_recovery_converts_on_the_next_pass() {
    let rt = test_runtime();
    let staging = Arc::new(InMemoryRecordStore::new());
    let production = Arc::new(InMemoryRecordStore::new());
    let notifier = Arc::new(RecordingNotifier::new());

    staging
        .seed_feedback(pending_feedback(
            "fb-701",
            Environment::Staging,
            FeedbackKind::Bug,
            "Password reset email never arrives",
            None,
        ))
        .expect("seed staging");
    production
        .seed_feedback(pending_feedback(
            "fb-702",
            Environment::Production,
            FeedbackKind::Feature,
            "Dark mode for the dashboard",
            None,
        ))
        .expect("seed production");
    staging.set_unavailable(true).expect("simulate outage");

    let orchestrator = build_orchestrator(&staging, &production, &notifier);
    let degraded = rt.block_on(orchestrator.run_sync());

    assert!(degraded.has_errors());
    assert_eq!(degraded.created(), 1);
    assert_eq!(
        staging
            .feedback_status(&FeedbackId::new("fb-701").expect("valid id"))
            .expect("status lookup"),
        Some(FeedbackStatus::Pending)
    );

    staging.set_unavailable(false).expect("restore store");
    let recovered = rt.block_on(orchestrator.run_sync());

    assert_eq!(recovered.created(), 1);
    assert!(!recovered.has_errors());
    assert_eq!(
        staging
            .feedback_status(&FeedbackId::new("fb-701").expect("valid id"))
            .expect("status lookup"),
        Some(FeedbackStatus::Converted)
    );
}

/// The summary serializes with the field names the CLI's JSON output
/// promises.
#[test]
fn summary_json_shape_is_stable() {
    let rt = test_runtime();
    let staging = Arc::new(InMemoryRecordStore::new());
    let production = Arc::new(InMemoryRecordStore::new());
    let notifier = Arc::new(RecordingNotifier::new());

    staging
        .seed_feedback(pending_feedback(
            "fb-801",
            Environment::Staging,
            FeedbackKind::Feature,
            "Remember the last selected project",
            None,
        ))
        .expect("seed staging");

    let orchestrator = build_orchestrator(&staging, &production, &notifier);
    let summary = rt.block_on(orchestrator.run_sync());

    let json = serde_json::to_value(&summary).expect("serializable summary");
    let runs = json
        .get("runs")
        .and_then(|value| value.as_array())
        .expect("runs array");
    assert_eq!(runs.len(), 2);

    let staging_run = runs
        .iter()
        .find(|run| run.get("environment").and_then(|v| v.as_str()) == Some("staging"))
        .expect("staging run in JSON");
    assert_eq!(
        staging_run.get("created").and_then(serde_json::Value::as_u64),
        Some(1)
    );
    assert_eq!(
        staging_run.get("scanned").and_then(serde_json::Value::as_u64),
        Some(1)
    );
    assert_eq!(
        staging_run
            .get("created_task_ids")
            .and_then(|v| v.as_array())
            .map(Vec::len),
        Some(1)
    );
    assert!(
        staging_run
            .get("failure")
            .expect("failure field present")
            .is_null()
    );
}
