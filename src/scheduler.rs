//! Twice-daily automatic trigger for the sync orchestrator.
//!
//! The schedule itself is a pure value: `next_fire` computes the next
//! local fire instant from any reference instant, which keeps the timing
//! logic unit-testable without timers. The run loop owns the only timer
//! and simply sleeps until the next computed instant.
//!
//! Overlap between a firing and a still-running previous pass is tolerated
//! deliberately: conversion is idempotent, so no run-lock exists.

use crate::sync::ports::{FeedbackNotifier, RecordStore};
use crate::sync::services::SyncOrchestrator;
use chrono::{DateTime, Days, Local, NaiveTime};
use mockable::Clock;
use thiserror::Error;

/// Default automatic fire times (09:00 and 21:00 local).
pub const DEFAULT_FIRE_TIMES: [&str; 2] = ["09:00", "21:00"];

/// Errors returned while building a schedule.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// No fire times were supplied.
    #[error("schedule requires at least one fire time")]
    Empty,

    /// A fire time could not be parsed as `HH:MM`.
    #[error("invalid fire time '{0}', expected HH:MM")]
    InvalidTime(String),
}

/// Fixed set of local times at which a sync pass fires every day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSchedule {
    fire_times: Vec<NaiveTime>,
}

impl SyncSchedule {
    /// Creates a schedule from local fire times, sorted ascending.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Empty`] when no times are supplied.
    pub fn new(mut fire_times: Vec<NaiveTime>) -> Result<Self, ScheduleError> {
        if fire_times.is_empty() {
            return Err(ScheduleError::Empty);
        }
        fire_times.sort_unstable();
        fire_times.dedup();
        Ok(Self { fire_times })
    }

    /// Parses a schedule from `HH:MM` strings.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidTime`] for a malformed entry and
    /// [`ScheduleError::Empty`] when no times are supplied.
    pub fn parse(raw_times: &[impl AsRef<str>]) -> Result<Self, ScheduleError> {
        let mut fire_times = Vec::with_capacity(raw_times.len());
        for raw in raw_times {
            let text = raw.as_ref().trim();
            let time = NaiveTime::parse_from_str(text, "%H:%M")
                .map_err(|_| ScheduleError::InvalidTime(text.to_owned()))?;
            fire_times.push(time);
        }
        Self::new(fire_times)
    }

    /// Returns the configured daily fire times, sorted ascending.
    #[must_use]
    pub fn fire_times(&self) -> &[NaiveTime] {
        &self.fire_times
    }

    /// Returns the next fire instant strictly after `after`.
    ///
    /// Scans today and the following day; a fire time erased by a local
    /// daylight-saving gap is skipped to the next representable candidate.
    #[must_use]
    pub fn next_fire(&self, after: DateTime<Local>) -> DateTime<Local> {
        for day_offset in 0..=2 {
            let Some(date) = after.date_naive().checked_add_days(Days::new(day_offset)) else {
                continue;
            };
            for time in &self.fire_times {
                let Some(candidate) = date.and_time(*time).and_local_timezone(Local).earliest()
                else {
                    continue;
                };
                if candidate > after {
                    return candidate;
                }
            }
        }
        // Unreachable with a non-empty schedule; fall back half a day out.
        after + chrono::Duration::hours(12)
    }
}

/// Runs the automatic sync loop until the surrounding task is dropped.
///
/// Each firing is a full independent orchestrator pass; a failed pass
/// leaves its items pending and the loop simply waits for the next firing.
pub async fn run_scheduler<S, N, C>(schedule: SyncSchedule, orchestrator: SyncOrchestrator<S, N, C>)
where
    S: RecordStore + 'static,
    N: FeedbackNotifier + 'static,
    C: Clock + Send + Sync + 'static,
{
    loop {
        let now = Local::now();
        let fire_at = schedule.next_fire(now);
        let wait = (fire_at - now)
            .to_std()
            .unwrap_or(std::time::Duration::ZERO);
        tracing::info!(fire_at = %fire_at, "next automatic sync scheduled");
        tokio::time::sleep(wait).await;

        tracing::info!("automatic sync firing");
        let summary = orchestrator.run_sync().await;
        tracing::info!(%summary, "automatic sync finished");
    }
}
