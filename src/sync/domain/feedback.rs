//! Feedback aggregate owned by the external capture path.
//!
//! The sync engine only ever reads feedback and advances its status along
//! `pending -> converted` or `pending -> skipped`; both transitions are
//! terminal and enforced at the store with a conditional update, never with
//! in-process state.

use super::{Environment, FeedbackId, ParseEnumError, SyncDomainError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of a feedback submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    /// Something is broken.
    Bug,
    /// Something is missing.
    Feature,
}

impl FeedbackKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bug => "bug",
            Self::Feature => "feature",
        }
    }

    /// Returns the human-readable label used in generated text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bug => "Bug",
            Self::Feature => "Feature",
        }
    }

    /// Returns the long-form label used in task descriptions and
    /// confirmation notifications.
    #[must_use]
    pub const fn long_label(self) -> &'static str {
        match self {
            Self::Bug => "Bug Report",
            Self::Feature => "Feature Request",
        }
    }
}

impl TryFrom<&str> for FeedbackKind {
    type Error = ParseEnumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "bug" => Ok(Self::Bug),
            "feature" => Ok(Self::Feature),
            _ => Err(ParseEnumError::new("feedback kind", value)),
        }
    }
}

/// Feedback processing status.
///
/// Starts `Pending`; `Converted` and `Skipped` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    /// Awaiting conversion by a sync pass.
    Pending,
    /// A task exists for this item.
    Converted,
    /// Conversion failed; requires operator re-triage.
    Skipped,
}

impl FeedbackStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Converted => "converted",
            Self::Skipped => "skipped",
        }
    }
}

impl TryFrom<&str> for FeedbackStatus {
    type Error = ParseEnumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "converted" => Ok(Self::Converted),
            "skipped" => Ok(Self::Skipped),
            _ => Err(ParseEnumError::new("feedback status", value)),
        }
    }
}

/// User-submitted feedback captured in one environment's store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackItem {
    id: FeedbackId,
    environment: Environment,
    kind: FeedbackKind,
    description: String,
    submitter_email: Option<String>,
    page_url: Option<String>,
    user_agent: Option<String>,
    has_screenshot: bool,
    status: FeedbackStatus,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted feedback record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedFeedbackData {
    /// Persisted feedback identifier.
    pub id: FeedbackId,
    /// Environment of the store the record was read from.
    pub environment: Environment,
    /// Persisted submission category.
    pub kind: FeedbackKind,
    /// Persisted description text.
    pub description: String,
    /// Persisted submitter address, if any.
    pub submitter_email: Option<String>,
    /// Persisted page URL, if any.
    pub page_url: Option<String>,
    /// Persisted user-agent string, if any.
    pub user_agent: Option<String>,
    /// Whether a screenshot payload accompanies the record.
    pub has_screenshot: bool,
    /// Persisted processing status.
    pub status: FeedbackStatus,
    /// Persisted submission timestamp.
    pub created_at: DateTime<Utc>,
}

impl FeedbackItem {
    /// Reconstructs a feedback item from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`SyncDomainError::EmptyDescription`] when the persisted
    /// description is empty after trimming.
    pub fn from_persisted(data: PersistedFeedbackData) -> Result<Self, SyncDomainError> {
        if data.description.trim().is_empty() {
            return Err(SyncDomainError::EmptyDescription);
        }
        Ok(Self {
            id: data.id,
            environment: data.environment,
            kind: data.kind,
            description: data.description,
            submitter_email: data.submitter_email,
            page_url: data.page_url,
            user_agent: data.user_agent,
            has_screenshot: data.has_screenshot,
            status: data.status,
            created_at: data.created_at,
        })
    }

    /// Returns the feedback identifier.
    #[must_use]
    pub const fn id(&self) -> &FeedbackId {
        &self.id
    }

    /// Returns the capture environment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Returns the submission category.
    #[must_use]
    pub const fn kind(&self) -> FeedbackKind {
        self.kind
    }

    /// Returns the description text.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the submitter address, if any.
    #[must_use]
    pub fn submitter_email(&self) -> Option<&str> {
        self.submitter_email.as_deref()
    }

    /// Returns the page URL the feedback was submitted from, if any.
    #[must_use]
    pub fn page_url(&self) -> Option<&str> {
        self.page_url.as_deref()
    }

    /// Returns the submitting browser's user-agent string, if any.
    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Returns whether a screenshot payload accompanies the record.
    #[must_use]
    pub const fn has_screenshot(&self) -> bool {
        self.has_screenshot
    }

    /// Returns the processing status.
    #[must_use]
    pub const fn status(&self) -> FeedbackStatus {
        self.status
    }

    /// Replaces the processing status.
    ///
    /// Store adapters apply this after their own `pending` guard has
    /// passed; services never transition status in-process.
    pub(crate) const fn set_status(&mut self, status: FeedbackStatus) {
        self.status = status;
    }

    /// Returns the submission timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
