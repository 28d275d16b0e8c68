//! Shared fixtures for sync unit tests.

use crate::sync::domain::{
    Environment, FeedbackId, FeedbackItem, FeedbackKind, FeedbackStatus, PersistedFeedbackData,
};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

/// Clock pinned to a fixed instant for deterministic timestamps.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Clock pinned to 2025-03-01T12:00:00Z.
    pub fn default_instant() -> Self {
        Self(
            Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
                .single()
                .expect("valid fixed instant"),
        )
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Builder for feedback fixtures with sensible defaults.
#[derive(Debug, Clone)]
pub struct FeedbackFixture {
    pub id: &'static str,
    pub environment: Environment,
    pub kind: FeedbackKind,
    pub description: String,
    pub submitter_email: Option<String>,
    pub page_url: Option<String>,
    pub user_agent: Option<String>,
    pub has_screenshot: bool,
    pub created_at: DateTime<Utc>,
}

impl Default for FeedbackFixture {
    fn default() -> Self {
        Self {
            id: "f1",
            environment: Environment::Staging,
            kind: FeedbackKind::Bug,
            description: "Login button does nothing".to_owned(),
            submitter_email: Some("u@x.com".to_owned()),
            page_url: Some("https://app.example.com/login".to_owned()),
            user_agent: Some("Mozilla/5.0".to_owned()),
            has_screenshot: false,
            created_at: Utc
                .with_ymd_and_hms(2025, 2, 28, 8, 30, 0)
                .single()
                .expect("valid fixture timestamp"),
        }
    }
}

impl FeedbackFixture {
    /// Builds the pending feedback item described by this fixture.
    pub fn build(self) -> FeedbackItem {
        FeedbackItem::from_persisted(PersistedFeedbackData {
            id: FeedbackId::new(self.id).expect("valid fixture id"),
            environment: self.environment,
            kind: self.kind,
            description: self.description,
            submitter_email: self.submitter_email,
            page_url: self.page_url,
            user_agent: self.user_agent,
            has_screenshot: self.has_screenshot,
            status: FeedbackStatus::Pending,
            created_at: self.created_at,
        })
        .expect("valid fixture feedback")
    }
}

/// Parses a feedback identifier from a literal.
pub fn feedback_id(raw: &str) -> FeedbackId {
    FeedbackId::new(raw).expect("valid feedback id")
}
