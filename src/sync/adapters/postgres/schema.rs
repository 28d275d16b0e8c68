//! Diesel schema for feedback and task persistence.
//!
//! `tasks` carries a unique index on `(source, source_id)`; that index is
//! the engine's at-most-once mechanism under concurrent or retried sync
//! passes.

diesel::table! {
    /// Feedback records written by the capture path.
    feedback (id) {
        /// Capture-assigned identifier, unique within the environment.
        #[max_length = 255]
        id -> Varchar,
        /// Submission category (`bug` or `feature`).
        #[max_length = 50]
        kind -> Varchar,
        /// Submitted description text.
        description -> Text,
        /// Optional submitter address.
        #[max_length = 255]
        submitter_email -> Nullable<Varchar>,
        /// Optional page URL the feedback was submitted from.
        page_url -> Nullable<Text>,
        /// Optional submitting browser user-agent string.
        user_agent -> Nullable<Text>,
        /// Whether a screenshot payload accompanies the record.
        has_screenshot -> Bool,
        /// Processing status (`pending`, `converted`, `skipped`).
        #[max_length = 50]
        status -> Varchar,
        /// Failure reason recorded when the status is `skipped`.
        skip_reason -> Nullable<Text>,
        /// Submission timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Backlog tasks created from feedback, consumed by the admin workflow.
    tasks (id) {
        /// Engine-assigned task identifier.
        id -> Uuid,
        /// Derived title.
        #[max_length = 255]
        title -> Varchar,
        /// Derived structured description.
        description -> Text,
        /// Backlog category (`bug_fix` or `feature_request`).
        #[max_length = 50]
        task_type -> Varchar,
        /// Triage priority (`high` or `medium`).
        #[max_length = 50]
        priority -> Varchar,
        /// Workflow state, owned downstream.
        #[max_length = 50]
        status -> Varchar,
        /// Capture origin tag.
        #[max_length = 50]
        source -> Varchar,
        /// Originating feedback identifier.
        #[max_length = 255]
        source_id -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(feedback, tasks);
