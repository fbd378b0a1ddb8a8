//! Errors returned by synchronization store operations.

use thiserror::Error;

use crate::service::ServiceError;

/// Errors a store operation reports to its caller.
///
/// The same failure is also recorded as a message in the store's
/// request state, so the view layer never has to handle it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The domain service call failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A newer request on the same channel was issued before this one
    /// resolved; its response was discarded.
    #[error("Response to request #{ticket} was superseded by a newer request")]
    Superseded { ticket: u64 },

    /// The store has no view with this name.
    #[error("Unknown view '{0}'")]
    UnknownView(String),
}

impl SyncError {
    pub fn is_superseded(&self) -> bool {
        matches!(self, SyncError::Superseded { .. })
    }
}
