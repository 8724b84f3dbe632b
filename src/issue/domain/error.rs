//! Validation errors for issue events.

use thiserror::Error;

/// Errors raised while building or decoding issue events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssueDomainError {
    /// The event type identifier is not one the tracker emits.
    #[error("unknown issue event type: {0}")]
    UnknownEventType(String),

    /// The webhook payload is not valid JSON or misses required fields.
    #[error("malformed webhook payload: {0}")]
    MalformedPayload(String),

    /// A required identifier is blank.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}
