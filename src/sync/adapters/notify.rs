//! Confirmation rendering and the log-sink notifier.
//!
//! The platform's mail delivery lives outside this engine; the production
//! wiring renders the confirmation body and hands it to the log sink, which
//! is where an outbound mail integration would plug in.

use async_trait::async_trait;
use minijinja::{Environment as TemplateEnvironment, context};

use crate::sync::ports::{FeedbackConfirmation, FeedbackNotifier, NotifyError, NotifyResult};

const CONFIRMATION_TEMPLATE: &str = "\
Dear user,

Thank you for your {{ kind | lower }} submission! We've received your \
feedback and added it to our development task list.

Your submission:
- Type: {{ kind }}
- Description: {{ excerpt }}
- Environment: {{ environment }}

Our development team will review this feedback and work on addressing it in \
an upcoming update.

---
This is an automated confirmation. Please do not reply.
";

/// Renders the confirmation message body for one converted feedback item.
///
/// # Errors
///
/// Returns [`NotifyError::Render`] when template expansion fails.
pub fn render_confirmation(confirmation: &FeedbackConfirmation) -> Result<String, NotifyError> {
    let environment = TemplateEnvironment::new();
    environment
        .render_str(
            CONFIRMATION_TEMPLATE,
            context! {
                kind => confirmation.kind.long_label(),
                excerpt => confirmation.excerpt,
                environment => confirmation.environment.marker(),
            },
        )
        .map_err(|error| NotifyError::Render(error.to_string()))
}

/// Notifier that logs the rendered confirmation instead of dispatching
/// mail.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl LogNotifier {
    /// Creates a log-sink notifier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FeedbackNotifier for LogNotifier {
    async fn notify(&self, confirmation: &FeedbackConfirmation) -> NotifyResult {
        let body = render_confirmation(confirmation)?;
        tracing::info!(
            email = %confirmation.email,
            kind = confirmation.kind.as_str(),
            environment = confirmation.environment.as_str(),
            body_chars = body.chars().count(),
            "confirmation queued"
        );
        Ok(())
    }
}
