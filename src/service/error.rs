//! Error types for domain service calls.

use thiserror::Error;

/// Errors a domain service call can fail with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The service could not be reached or failed internally.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// A write referenced an entity that does not exist.
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// The write is not allowed in the entity's current state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The write payload was rejected.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The call exceeded the configured request timeout.
    #[error("Request timeout after {ms}ms")]
    Timeout { ms: u64 },
}

impl ServiceError {
    /// Whether retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ServiceError::Unavailable(_) | ServiceError::Timeout { .. })
    }
}
