//! Feedbridge process entry point.
//!
//! Two commands share one orchestrator wiring:
//!
//! - `feedbridge sync` runs a single pass immediately, prints the
//!   aggregated summary as JSON, and exits non-zero when any item or
//!   environment errored.
//! - `feedbridge run` starts the long-lived scheduler process that fires
//!   the same pass at the configured daily times.

use clap::{Parser, Subcommand};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use feedbridge::config::{EnvironmentSettings, SyncSettings};
use feedbridge::scheduler::run_scheduler;
use feedbridge::sync::adapters::notify::LogNotifier;
use feedbridge::sync::adapters::postgres::{PostgresRecordStore, SyncPgPool};
use feedbridge::sync::services::{EnvironmentHandle, SyncOrchestrator, SyncSummary};
use mockable::DefaultClock;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Parser)]
#[command(name = "feedbridge", about = "Feedback-to-task synchronisation engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one sync pass now and print the summary as JSON.
    Sync,
    /// Run the long-lived process with the twice-daily schedule.
    Run,
}

type PostgresOrchestrator = SyncOrchestrator<PostgresRecordStore, LogNotifier, DefaultClock>;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "feedbridge failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, BoxError> {
    let settings = SyncSettings::from_env()?;
    let orchestrator = build_orchestrator(&settings)?;

    match cli.command {
        Command::Sync => {
            let summary = orchestrator.run_sync().await;
            print_summary(&summary)?;
            Ok(if summary.has_errors() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Command::Run => {
            tracing::info!(
                fire_times = ?settings.schedule.fire_times(),
                "starting scheduler"
            );
            run_scheduler(settings.schedule.clone(), orchestrator).await;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn build_orchestrator(settings: &SyncSettings) -> Result<PostgresOrchestrator, BoxError> {
    let mut environments = Vec::with_capacity(settings.environments.len());
    for entry in &settings.environments {
        let EnvironmentSettings {
            environment,
            database_url,
        } = entry;
        let pool: SyncPgPool =
            Pool::builder().build(ConnectionManager::<PgConnection>::new(database_url))?;
        environments.push(EnvironmentHandle::new(
            *environment,
            Arc::new(PostgresRecordStore::new(pool, *environment)),
        ));
    }

    Ok(SyncOrchestrator::new(
        environments,
        Arc::new(LogNotifier::new()),
        Arc::new(DefaultClock),
        settings.batch_limit,
        settings.environment_timeout,
    ))
}

#[expect(
    clippy::print_stdout,
    reason = "JSON summary is the command's output contract"
)]
fn print_summary(summary: &SyncSummary) -> Result<(), BoxError> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
