//! Environment-variable driven process configuration.
//!
//! Each configured environment supplies its own database URL through
//! `FEEDBRIDGE_STAGING_DATABASE_URL` and
//! `FEEDBRIDGE_PRODUCTION_DATABASE_URL`; at least one must be present.
//! Scheduling and batching knobs have defaults matching the shipped
//! behaviour (twice daily, batches of 50, five-minute environment bound).

use crate::scheduler::{DEFAULT_FIRE_TIMES, ScheduleError, SyncSchedule};
use crate::sync::domain::Environment;
use crate::sync::services::{DEFAULT_BATCH_LIMIT, DEFAULT_ENVIRONMENT_TIMEOUT};
use std::time::Duration;
use thiserror::Error;

const STAGING_URL_VAR: &str = "FEEDBRIDGE_STAGING_DATABASE_URL";
const PRODUCTION_URL_VAR: &str = "FEEDBRIDGE_PRODUCTION_DATABASE_URL";
const SYNC_TIMES_VAR: &str = "FEEDBRIDGE_SYNC_TIMES";
const BATCH_LIMIT_VAR: &str = "FEEDBRIDGE_BATCH_LIMIT";
const ENVIRONMENT_TIMEOUT_VAR: &str = "FEEDBRIDGE_ENVIRONMENT_TIMEOUT_SECS";

/// Errors returned while loading process configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No environment database URL was configured.
    #[error("no environment configured; set {STAGING_URL_VAR} or {PRODUCTION_URL_VAR}")]
    NoEnvironments,

    /// A numeric setting could not be parsed.
    #[error("invalid value '{value}' for {variable}")]
    InvalidNumber {
        /// Variable the value came from.
        variable: &'static str,
        /// The rejected raw value.
        value: String,
    },

    /// The sync schedule could not be parsed.
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// Database connection settings for one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSettings {
    /// Environment this store belongs to.
    pub environment: Environment,
    /// `PostgreSQL` connection URL.
    pub database_url: String,
}

/// Process-wide sync settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// Configured environments, in processing order.
    pub environments: Vec<EnvironmentSettings>,
    /// Daily automatic fire times.
    pub schedule: SyncSchedule,
    /// Bound on pending items read per environment pass.
    pub batch_limit: i64,
    /// Bound on one environment's pass duration.
    pub environment_timeout: Duration,
}

impl SyncSettings {
    /// Loads settings from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when no environment is configured or a
    /// setting cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut environments = Vec::new();
        if let Ok(url) = std::env::var(STAGING_URL_VAR) {
            environments.push(EnvironmentSettings {
                environment: Environment::Staging,
                database_url: url,
            });
        }
        if let Ok(url) = std::env::var(PRODUCTION_URL_VAR) {
            environments.push(EnvironmentSettings {
                environment: Environment::Production,
                database_url: url,
            });
        }
        if environments.is_empty() {
            return Err(ConfigError::NoEnvironments);
        }

        let schedule = match std::env::var(SYNC_TIMES_VAR) {
            Ok(raw) => SyncSchedule::parse(&raw.split(',').collect::<Vec<_>>())?,
            Err(_) => SyncSchedule::parse(&DEFAULT_FIRE_TIMES)?,
        };

        let batch_limit = parse_number(BATCH_LIMIT_VAR, DEFAULT_BATCH_LIMIT)?;
        let timeout_secs = parse_number(
            ENVIRONMENT_TIMEOUT_VAR,
            i64::try_from(DEFAULT_ENVIRONMENT_TIMEOUT.as_secs()).unwrap_or(300),
        )?;
        let environment_timeout =
            Duration::from_secs(u64::try_from(timeout_secs).map_err(|_| {
                ConfigError::InvalidNumber {
                    variable: ENVIRONMENT_TIMEOUT_VAR,
                    value: timeout_secs.to_string(),
                }
            })?);

        Ok(Self {
            environments,
            schedule,
            batch_limit,
            environment_timeout,
        })
    }
}

fn parse_number(variable: &'static str, default: i64) -> Result<i64, ConfigError> {
    match std::env::var(variable) {
        Ok(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ConfigError::InvalidNumber {
                variable,
                value: raw,
            }),
        Err(_) => Ok(default),
    }
}
