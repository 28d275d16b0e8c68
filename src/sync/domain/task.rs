//! Task aggregate created from exactly one feedback item.

use super::{FeedbackId, ParseEnumError, SourceRef, TaskId, TaskSource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backlog entry category, derived 1:1 from the feedback kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Created from a bug report.
    BugFix,
    /// Created from a feature request.
    FeatureRequest,
}

impl TaskType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BugFix => "bug_fix",
            Self::FeatureRequest => "feature_request",
        }
    }
}

impl TryFrom<&str> for TaskType {
    type Error = ParseEnumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "bug_fix" => Ok(Self::BugFix),
            "feature_request" => Ok(Self::FeatureRequest),
            _ => Err(ParseEnumError::new("task type", value)),
        }
    }
}

/// Triage priority, derived from the feedback kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Bugs are prioritised for triage.
    High,
    /// Feature requests queue behind bugs.
    Medium,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
        }
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseEnumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            _ => Err(ParseEnumError::new("task priority", value)),
        }
    }
}

/// Task workflow state, owned by the downstream admin workflow.
///
/// The engine only ever creates tasks as `Pending` and never updates them
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Awaiting triage.
    Pending,
    /// Being worked downstream.
    InProgress,
    /// Resolved downstream.
    Done,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseEnumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ParseEnumError::new("task status", value)),
        }
    }
}

/// Backlog entry created from exactly one feedback item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    task_type: TaskType,
    priority: TaskPriority,
    status: TaskStatus,
    source: TaskSource,
    source_id: FeedbackId,
    created_at: DateTime<Utc>,
}

/// Parameter object for constructing or reconstructing a task record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Task identifier.
    pub id: TaskId,
    /// Derived title.
    pub title: String,
    /// Derived structured description.
    pub description: String,
    /// Backlog category.
    pub task_type: TaskType,
    /// Triage priority.
    pub priority: TaskPriority,
    /// Workflow state.
    pub status: TaskStatus,
    /// Capture origin tag.
    pub source: TaskSource,
    /// Originating feedback identifier.
    pub source_id: FeedbackId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            task_type: data.task_type,
            priority: data.priority,
            status: data.status,
            source: data.source,
            source_id: data.source_id,
            created_at: data.created_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the derived title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the derived structured description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the backlog category.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// Returns the triage priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the workflow state.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the capture origin tag.
    #[must_use]
    pub const fn source(&self) -> TaskSource {
        self.source
    }

    /// Returns the originating feedback identifier.
    #[must_use]
    pub const fn source_id(&self) -> &FeedbackId {
        &self.source_id
    }

    /// Returns the dedup key for this task.
    #[must_use]
    pub fn source_ref(&self) -> SourceRef {
        SourceRef::new(self.source, self.source_id.clone())
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
