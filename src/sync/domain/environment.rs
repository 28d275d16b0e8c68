//! Deployment environments and the task-source dedup key.

use super::{FeedbackId, ParseEnumError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Isolated deployment with its own record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Pre-production deployment.
    Staging,
    /// Live deployment.
    Production,
}

impl Environment {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }

    /// Returns the upper-case marker used in generated task titles.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Staging => "STAGING",
            Self::Production => "PRODUCTION",
        }
    }

    /// Returns the task source tag for feedback captured in this
    /// environment.
    #[must_use]
    pub const fn task_source(self) -> TaskSource {
        match self {
            Self::Staging => TaskSource::StagingFeedback,
            Self::Production => TaskSource::ProductionFeedback,
        }
    }
}

impl TryFrom<&str> for Environment {
    type Error = ParseEnumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            _ => Err(ParseEnumError::new("environment", value)),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capture origin recorded on each task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSource {
    /// Created from feedback captured in staging.
    StagingFeedback,
    /// Created from feedback captured in production.
    ProductionFeedback,
}

impl TaskSource {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StagingFeedback => "staging_feedback",
            Self::ProductionFeedback => "production_feedback",
        }
    }
}

impl TryFrom<&str> for TaskSource {
    type Error = ParseEnumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "staging_feedback" => Ok(Self::StagingFeedback),
            "production_feedback" => Ok(Self::ProductionFeedback),
            _ => Err(ParseEnumError::new("task source", value)),
        }
    }
}

impl fmt::Display for TaskSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dedup key guaranteeing at most one task per feedback item.
///
/// The source tag folds the capture environment into the key, so two
/// feedback items with equal identifiers in different environments map to
/// distinct tasks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRef {
    source: TaskSource,
    source_id: FeedbackId,
}

impl SourceRef {
    /// Creates a dedup key from a source tag and feedback identifier.
    #[must_use]
    pub const fn new(source: TaskSource, source_id: FeedbackId) -> Self {
        Self { source, source_id }
    }

    /// Returns the source tag.
    #[must_use]
    pub const fn source(&self) -> TaskSource {
        self.source
    }

    /// Returns the originating feedback identifier.
    #[must_use]
    pub const fn source_id(&self) -> &FeedbackId {
        &self.source_id
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.source, self.source_id)
    }
}
