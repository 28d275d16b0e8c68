//! Cross-environment orchestration tests.

use crate::sync::adapters::memory::{InMemoryRecordStore, RecordingNotifier};
use crate::sync::domain::{Environment, FeedbackStatus};
use crate::sync::services::{EnvironmentHandle, SyncOrchestrator};
use crate::sync::tests::support::{FeedbackFixture, FixedClock, feedback_id};
use rstest::rstest;
use std::sync::Arc;
use std::time::Duration;

type MemoryOrchestrator = SyncOrchestrator<InMemoryRecordStore, RecordingNotifier, FixedClock>;

struct TwoEnvironments {
    staging: Arc<InMemoryRecordStore>,
    production: Arc<InMemoryRecordStore>,
    orchestrator: MemoryOrchestrator,
}

fn two_environments() -> TwoEnvironments {
    let staging = Arc::new(InMemoryRecordStore::new());
    let production = Arc::new(InMemoryRecordStore::new());
    let orchestrator = SyncOrchestrator::new(
        vec![
            EnvironmentHandle::new(Environment::Staging, Arc::clone(&staging)),
            EnvironmentHandle::new(Environment::Production, Arc::clone(&production)),
        ],
        Arc::new(RecordingNotifier::new()),
        Arc::new(FixedClock::default_instant()),
        50,
        Duration::from_secs(30),
    );
    TwoEnvironments {
        staging,
        production,
        orchestrator,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn aggregates_counts_across_environments() {
    let envs = two_environments();
    envs.staging
        .seed_feedback(FeedbackFixture::default().build())
        .expect("seed staging");
    envs.production
        .seed_feedback(
            FeedbackFixture {
                id: "p1",
                environment: Environment::Production,
                ..FeedbackFixture::default()
            }
            .build(),
        )
        .expect("seed production");

    let summary = envs.orchestrator.run_sync().await;

    assert_eq!(summary.runs().len(), 2);
    assert_eq!(summary.created(), 2);
    assert_eq!(summary.already_existed(), 0);
    assert_eq!(summary.errored(), 0);
    assert!(!summary.has_errors());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn staging_outage_never_touches_production_counts() {
    let envs = two_environments();
    envs.staging.set_unavailable(true).expect("staging outage");
    envs.production
        .seed_feedback(
            FeedbackFixture {
                id: "p1",
                environment: Environment::Production,
                ..FeedbackFixture::default()
            }
            .build(),
        )
        .expect("seed production");

    let summary = envs.orchestrator.run_sync().await;

    let staging_run = summary
        .runs()
        .iter()
        .find(|run| run.environment == Environment::Staging)
        .expect("staging run present");
    let production_run = summary
        .runs()
        .iter()
        .find(|run| run.environment == Environment::Production)
        .expect("production run present");

    assert!(staging_run.failure.is_some());
    assert_eq!(production_run.created, 1);
    assert_eq!(production_run.errored, 0);
    assert!(summary.has_errors());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overlapping_passes_create_at_most_one_task() {
    let envs = two_environments();
    envs.staging
        .seed_feedback(FeedbackFixture::default().build())
        .expect("seed staging");

    let first = envs.orchestrator.clone();
    let second = envs.orchestrator.clone();
    let (summary_a, summary_b) = tokio::join!(first.run_sync(), second.run_sync());

    assert_eq!(summary_a.created() + summary_b.created(), 1);
    assert_eq!(envs.staging.task_count().expect("task count"), 1);
    assert_eq!(
        envs.staging
            .feedback_status(&feedback_id("f1"))
            .expect("status lookup"),
        Some(FeedbackStatus::Converted)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rerun_after_clean_pass_reports_all_zero() {
    let envs = two_environments();
    envs.staging
        .seed_feedback(FeedbackFixture::default().build())
        .expect("seed staging");

    let first = envs.orchestrator.run_sync().await;
    let second = envs.orchestrator.run_sync().await;

    assert_eq!(first.created(), 1);
    assert_eq!(second.created(), 0);
    assert_eq!(second.already_existed(), 0);
    assert_eq!(second.errored(), 0);
}
