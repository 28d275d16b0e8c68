//! Diesel row models for feedback and task persistence.

use super::schema::{feedback, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for feedback records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = feedback)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FeedbackRow {
    /// Capture-assigned identifier.
    pub id: String,
    /// Submission category.
    pub kind: String,
    /// Submitted description text.
    pub description: String,
    /// Optional submitter address.
    pub submitter_email: Option<String>,
    /// Optional page URL.
    pub page_url: Option<String>,
    /// Optional user-agent string.
    pub user_agent: Option<String>,
    /// Whether a screenshot payload accompanies the record.
    pub has_screenshot: bool,
    /// Processing status.
    pub status: String,
    /// Failure reason recorded when skipped.
    pub skip_reason: Option<String>,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
}

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Engine-assigned task identifier.
    pub id: uuid::Uuid,
    /// Derived title.
    pub title: String,
    /// Derived structured description.
    pub description: String,
    /// Backlog category.
    pub task_type: String,
    /// Triage priority.
    pub priority: String,
    /// Workflow state.
    pub status: String,
    /// Capture origin tag.
    pub source: String,
    /// Originating feedback identifier.
    pub source_id: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Engine-assigned task identifier.
    pub id: uuid::Uuid,
    /// Derived title.
    pub title: String,
    /// Derived structured description.
    pub description: String,
    /// Backlog category.
    pub task_type: String,
    /// Triage priority.
    pub priority: String,
    /// Workflow state.
    pub status: String,
    /// Capture origin tag.
    pub source: String,
    /// Originating feedback identifier.
    pub source_id: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
