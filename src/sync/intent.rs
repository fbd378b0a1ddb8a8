//! Intents understood by the synchronization reducer.

use crate::domain::Entity;
use crate::mvi::Intent;

/// Store actions and service responses.
///
/// `*Started` intents issue a new ticket on their channel (list, view or
/// selection). Responses carry the ticket they were issued with so the
/// reducer can tell stale responses apart.
#[derive(Debug, Clone)]
pub enum SyncIntent<T: Entity> {
    /// Merge the set fields of a patch into the current filter.
    FilterMerged(T::Filter),

    /// Replace the current filter.
    FilterReplaced(T::Filter),

    /// A list fetch was issued with the current filter.
    FetchStarted,

    FetchSucceeded {
        ticket: u64,
        items: Vec<T>,
    },

    FetchFailed {
        ticket: u64,
        message: String,
    },

    /// A fetch of a named view was issued. Unknown views are ignored.
    ViewFetchStarted {
        view: String,
    },

    ViewFetchSucceeded {
        view: String,
        ticket: u64,
        items: Vec<T>,
    },

    ViewFetchFailed {
        view: String,
        ticket: u64,
        message: String,
    },

    /// A single-entity fetch was issued.
    SelectStarted,

    /// `entity` is `None` when the service has no such id.
    SelectSucceeded {
        ticket: u64,
        entity: Option<T>,
    },

    SelectFailed {
        ticket: u64,
        message: String,
    },

    /// A write (mutation or removal) was issued. Writes do not issue
    /// tickets; they carry the write generation current when they started.
    MutationStarted,

    /// The service returned the written entity.
    MutationApplied {
        generation: u64,
        entity: T,
    },

    /// The service deleted the entity with `id`.
    RemovalApplied {
        generation: u64,
        id: String,
    },

    /// A write failed. No cached list changes.
    MutationFailed {
        generation: u64,
        message: String,
    },

    /// Drop every cached entity and reset the filter. Starts a new write
    /// generation.
    Cleared,
}

impl<T: Entity> Intent for SyncIntent<T> {}
