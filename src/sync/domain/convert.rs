//! Pure feedback-to-task conversion.
//!
//! Title and description are fully determined by the feedback item: no
//! wall-clock reads, no random ordering, and missing optional fields always
//! render an explicit placeholder so the generated text has a stable shape
//! regardless of input completeness.

use super::{
    FeedbackItem, FeedbackKind, PersistedTaskData, Task, TaskId, TaskPriority, TaskStatus,
    TaskType,
};
use chrono::{DateTime, SecondsFormat, Utc};
use mockable::Clock;

/// Maximum number of description characters carried into a title or
/// notification excerpt before truncation.
pub const EXCERPT_LIMIT: usize = 100;

const PLACEHOLDER_UNKNOWN: &str = "Unknown";
const PLACEHOLDER_ANONYMOUS: &str = "Anonymous";

/// Fixed resolution checklist appended to every generated description.
const RESOLUTION_CHECKLIST: [&str; 5] = [
    "Reproduce the issue",
    "Implement the fix",
    "Test the fix",
    "Deploy the fix",
    "Close the feedback loop",
];

/// Converts a feedback item into a new backlog task.
///
/// The clock stamps `created_at` only; every derived text field depends
/// solely on the feedback item.
#[must_use]
pub fn convert(feedback: &FeedbackItem, clock: &impl Clock) -> Task {
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        title: render_title(feedback),
        description: render_description(feedback),
        task_type: derive_task_type(feedback.kind()),
        priority: derive_priority(feedback.kind()),
        status: TaskStatus::Pending,
        source: feedback.environment().task_source(),
        source_id: feedback.id().clone(),
        created_at: clock.utc(),
    })
}

/// Derives the backlog category from the feedback kind.
#[must_use]
pub const fn derive_task_type(kind: FeedbackKind) -> TaskType {
    match kind {
        FeedbackKind::Bug => TaskType::BugFix,
        FeedbackKind::Feature => TaskType::FeatureRequest,
    }
}

/// Derives the triage priority from the feedback kind.
#[must_use]
pub const fn derive_priority(kind: FeedbackKind) -> TaskPriority {
    match kind {
        FeedbackKind::Bug => TaskPriority::High,
        FeedbackKind::Feature => TaskPriority::Medium,
    }
}

/// Truncates an excerpt to [`EXCERPT_LIMIT`] characters, appending an
/// ellipsis only when the input is longer than the limit.
#[must_use]
pub fn truncate_excerpt(text: &str) -> String {
    let mut chars = text.chars();
    let excerpt: String = chars.by_ref().take(EXCERPT_LIMIT).collect();
    if chars.next().is_some() {
        format!("{excerpt}...")
    } else {
        excerpt
    }
}

fn render_title(feedback: &FeedbackItem) -> String {
    format!(
        "[{}] {}: {}",
        feedback.environment().marker(),
        feedback.kind().label(),
        truncate_excerpt(feedback.description()),
    )
}

fn render_description(feedback: &FeedbackItem) -> String {
    let screenshot = if feedback.has_screenshot() {
        "Included"
    } else {
        "None"
    };

    let mut lines = vec![
        format!("**{} User Feedback**", feedback.environment().marker()),
        String::new(),
        format!("**Type**: {}", feedback.kind().long_label()),
        format!("**Description**: {}", feedback.description()),
        format!(
            "**Page**: {}",
            feedback.page_url().unwrap_or(PLACEHOLDER_UNKNOWN)
        ),
        format!(
            "**User**: {}",
            feedback.submitter_email().unwrap_or(PLACEHOLDER_ANONYMOUS)
        ),
        format!(
            "**User Agent**: {}",
            feedback.user_agent().unwrap_or(PLACEHOLDER_UNKNOWN)
        ),
        format!("**Screenshot**: {screenshot}"),
        format!("**Submitted**: {}", render_timestamp(feedback.created_at())),
        format!("**Environment**: {}", feedback.environment().marker()),
        format!("**Feedback ID**: {}", feedback.id()),
        String::new(),
        "**Resolution Checklist**:".to_owned(),
    ];
    lines.extend(RESOLUTION_CHECKLIST.map(|step| format!("- [ ] {step}")));
    lines.join("\n")
}

fn render_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}
