//! Cached state of one synchronization store.

use serde::Serialize;

use crate::domain::Entity;
use crate::mvi::StoreState;

/// Request lifecycle of a store.
///
/// `loading` is derived from the number of outstanding requests, so two
/// overlapping requests keep the store loading until both have settled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestState {
    /// Requests issued and not yet settled.
    pub in_flight: u32,
    /// Message of the last failed request. Cleared when a new request starts.
    pub error: Option<String>,
}

impl RequestState {
    pub fn loading(&self) -> bool {
        self.in_flight > 0
    }

    pub(crate) fn begin(&mut self) {
        self.in_flight += 1;
        self.error = None;
    }

    pub(crate) fn settle(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.settle();
        self.error = Some(message);
    }
}

/// A secondary list cached by a store, fetched with its own fixed filter.
///
/// Views hold independent copies of entities that may also appear in the
/// snapshot. Writes are spliced into every list holding the entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CachedList<T: Entity> {
    pub name: String,
    pub filter: T::Filter,
    pub items: Vec<T>,
    /// Ticket of the latest fetch issued for this view.
    #[serde(skip)]
    pub(crate) ticket: u64,
    /// Set once a fetch result has been applied. Writes only splice into
    /// loaded views.
    #[serde(skip)]
    pub(crate) loaded: bool,
}

impl<T: Entity> CachedList<T> {
    pub fn new(name: impl Into<String>, filter: T::Filter) -> Self {
        Self {
            name: name.into(),
            filter,
            items: Vec::new(),
            ticket: 0,
            loaded: false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|e| e.id() == id)
    }
}

/// Everything the view layer reads from a store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncState<T: Entity> {
    /// Last known-good result of `fetch_all`.
    pub snapshot: Vec<T>,
    pub request: RequestState,
    /// Filter used by the next `fetch_all`.
    pub filter: T::Filter,
    /// Independently fetched single entity.
    pub selection: Option<T>,
    pub views: Vec<CachedList<T>>,
    /// Ticket of the latest list fetch.
    #[serde(skip)]
    pub(crate) list_ticket: u64,
    /// Ticket of the latest selection fetch.
    #[serde(skip)]
    pub(crate) selection_ticket: u64,
    /// Bumped on clear. Writes started in an earlier generation are stale.
    #[serde(skip)]
    pub(crate) write_generation: u64,
    /// Drop responses whose ticket has been superseded.
    #[serde(skip)]
    pub(crate) discard_stale: bool,
}

impl<T: Entity> Default for SyncState<T> {
    fn default() -> Self {
        Self {
            snapshot: Vec::new(),
            request: RequestState::default(),
            filter: T::Filter::default(),
            selection: None,
            views: Vec::new(),
            list_ticket: 0,
            selection_ticket: 0,
            write_generation: 0,
            discard_stale: true,
        }
    }
}

impl<T: Entity> StoreState for SyncState<T> {}

impl<T: Entity> SyncState<T> {
    pub(crate) fn new(views: Vec<CachedList<T>>, discard_stale: bool) -> Self {
        Self {
            views,
            discard_stale,
            ..Self::default()
        }
    }

    pub fn loading(&self) -> bool {
        self.request.loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.request.error.as_deref()
    }

    pub fn view(&self, name: &str) -> Option<&CachedList<T>> {
        self.views.iter().find(|v| v.name == name)
    }

    /// Whether a response carrying `ticket` may still be applied, given the
    /// latest ticket issued on its channel.
    pub(crate) fn admits_ticket(&self, ticket: u64, latest: u64) -> bool {
        !self.discard_stale || ticket == latest
    }

    pub(crate) fn list_is_current(&self, ticket: u64) -> bool {
        self.admits_ticket(ticket, self.list_ticket)
    }

    pub(crate) fn selection_is_current(&self, ticket: u64) -> bool {
        self.admits_ticket(ticket, self.selection_ticket)
    }

    pub(crate) fn view_is_current(&self, name: &str, ticket: u64) -> bool {
        self.view(name)
            .is_some_and(|v| self.admits_ticket(ticket, v.ticket))
    }

    pub(crate) fn write_is_current(&self, generation: u64) -> bool {
        self.admits_ticket(generation, self.write_generation)
    }

    /// Every cached copy of the entity with `id`: snapshot, views and selection.
    pub fn copies(&self, id: &str) -> Vec<&T> {
        self.snapshot
            .iter()
            .chain(self.views.iter().flat_map(|v| v.items.iter()))
            .chain(self.selection.iter())
            .filter(|e| e.id() == id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Teacher;

    #[test]
    fn overlapping_requests_keep_loading() {
        let mut request = RequestState::default();
        request.begin();
        request.begin();
        request.settle();
        assert!(request.loading());
        request.settle();
        assert!(!request.loading());
    }

    #[test]
    fn begin_clears_previous_error() {
        let mut request = RequestState::default();
        request.begin();
        request.fail("offline".into());
        assert_eq!(request.error.as_deref(), Some("offline"));
        assert!(!request.loading());
        request.begin();
        assert_eq!(request.error, None);
    }

    #[test]
    fn settle_never_underflows() {
        let mut request = RequestState::default();
        request.settle();
        assert_eq!(request.in_flight, 0);
    }

    #[test]
    fn default_state_discards_stale_responses() {
        let state = SyncState::<Teacher>::default();
        assert!(!state.list_is_current(1));
        assert!(state.list_is_current(0));
    }
}
