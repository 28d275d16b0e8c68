//! Error types for sync domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain feedback and task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncDomainError {
    /// The feedback identifier is empty after trimming.
    #[error("feedback identifier must not be empty")]
    EmptyFeedbackId,

    /// The feedback description is empty after trimming.
    #[error("feedback description must not be empty")]
    EmptyDescription,
}

/// Error returned while parsing enum storage representations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {field} value: {value}")]
pub struct ParseEnumError {
    /// Name of the field being parsed.
    pub field: &'static str,
    /// The rejected raw value.
    pub value: String,
}

impl ParseEnumError {
    /// Creates a parse error for the named field.
    #[must_use]
    pub fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}
