//! State transitions of a synchronization store.

use std::collections::HashSet;
use std::marker::PhantomData;

use crate::domain::{Entity, Filter};
use crate::mvi::Reducer;

use super::intent::SyncIntent;
use super::state::SyncState;

/// Reducer for synchronization store state.
pub struct SyncReducer<T>(PhantomData<T>);

impl<T: Entity> Reducer for SyncReducer<T> {
    type State = SyncState<T>;
    type Intent = SyncIntent<T>;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            SyncIntent::FilterMerged(patch) => {
                state.filter.merge(patch);
            }

            SyncIntent::FilterReplaced(filter) => {
                state.filter = filter;
            }

            SyncIntent::FetchStarted => {
                state.list_ticket += 1;
                state.request.begin();
            }

            SyncIntent::FetchSucceeded { ticket, items } => {
                if state.list_is_current(ticket) {
                    state.snapshot = dedup_by_id(items);
                }
                state.request.settle();
            }

            SyncIntent::FetchFailed { ticket, message } => {
                // Failure keeps the previous snapshot.
                if state.list_is_current(ticket) {
                    state.request.fail(message);
                } else {
                    state.request.settle();
                }
            }

            SyncIntent::ViewFetchStarted { view } => {
                if let Some(list) = state.views.iter_mut().find(|v| v.name == view) {
                    list.ticket += 1;
                    state.request.begin();
                }
            }

            SyncIntent::ViewFetchSucceeded {
                view,
                ticket,
                items,
            } => {
                let current = state.view_is_current(&view, ticket);
                if let Some(list) = state.views.iter_mut().find(|v| v.name == view) {
                    if current {
                        list.items = dedup_by_id(items);
                        list.loaded = true;
                    }
                    state.request.settle();
                }
            }

            SyncIntent::ViewFetchFailed {
                view,
                ticket,
                message,
            } => {
                if state.view(&view).is_some() {
                    if state.view_is_current(&view, ticket) {
                        state.request.fail(message);
                    } else {
                        state.request.settle();
                    }
                }
            }

            SyncIntent::SelectStarted => {
                state.selection_ticket += 1;
                state.request.begin();
            }

            SyncIntent::SelectSucceeded { ticket, entity } => {
                if state.selection_is_current(ticket) {
                    state.selection = entity;
                }
                state.request.settle();
            }

            SyncIntent::SelectFailed { ticket, message } => {
                // The previous selection stays untouched.
                if state.selection_is_current(ticket) {
                    state.request.fail(message);
                } else {
                    state.request.settle();
                }
            }

            SyncIntent::MutationStarted => {
                state.request.begin();
            }

            SyncIntent::MutationApplied { generation, entity } => {
                if state.write_is_current(generation) {
                    let admitted = entity.matches(&state.filter);
                    splice(&mut state.snapshot, &entity, admitted);
                    for view in state.views.iter_mut().filter(|v| v.loaded) {
                        let admitted = entity.matches(&view.filter);
                        splice(&mut view.items, &entity, admitted);
                    }
                    if let Some(selected) = state.selection.as_mut() {
                        if selected.id() == entity.id() {
                            *selected = entity;
                        }
                    }
                }
                state.request.settle();
            }

            SyncIntent::RemovalApplied { generation, id } => {
                if state.write_is_current(generation) {
                    state.snapshot.retain(|e| e.id() != id);
                    for view in &mut state.views {
                        view.items.retain(|e| e.id() != id);
                    }
                    if state.selection.as_ref().is_some_and(|e| e.id() == id) {
                        state.selection = None;
                    }
                }
                state.request.settle();
            }

            SyncIntent::MutationFailed {
                generation,
                message,
            } => {
                if state.write_is_current(generation) {
                    state.request.fail(message);
                } else {
                    state.request.settle();
                }
            }

            SyncIntent::Cleared => {
                state.snapshot.clear();
                state.selection = None;
                state.filter = T::Filter::default();
                state.request.error = None;
                // Responses to requests issued before the teardown become stale.
                state.list_ticket += 1;
                state.selection_ticket += 1;
                state.write_generation += 1;
                for view in &mut state.views {
                    view.items.clear();
                    view.ticket += 1;
                    view.loaded = false;
                }
            }
        }
        state
    }
}

/// Replace the entity in `list` if present, otherwise append it when
/// `admitted` says it belongs there.
fn splice<T: Entity>(list: &mut Vec<T>, entity: &T, admitted: bool) {
    match list.iter_mut().find(|e| e.id() == entity.id()) {
        Some(slot) => *slot = entity.clone(),
        None if admitted => list.push(entity.clone()),
        None => {}
    }
}

/// Keep the first occurrence of every id.
fn dedup_by_id<T: Entity>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    let before = items.len();
    let unique: Vec<T> = items
        .into_iter()
        .filter(|e| seen.insert(e.id().to_string()))
        .collect();
    if unique.len() != before {
        tracing::warn!(
            domain = T::KIND,
            dropped = before - unique.len(),
            "Service returned duplicate ids"
        );
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Choice, LeaveFilter, LeaveRequest, LeaveStatus};
    use crate::service::seed;
    use crate::sync::state::CachedList;

    type LeaveReducer = SyncReducer<LeaveRequest>;

    fn leave(id: &str) -> LeaveRequest {
        seed::leave_requests()
            .into_iter()
            .find(|l| l.id == id)
            .unwrap()
    }

    fn pending_view() -> CachedList<LeaveRequest> {
        CachedList::new(
            "pending",
            LeaveFilter {
                status: Some(Choice::Only(LeaveStatus::Pending)),
                ..Default::default()
            },
        )
    }

    fn loaded(discard_stale: bool) -> SyncState<LeaveRequest> {
        let state = SyncState::new(vec![pending_view()], discard_stale);
        let state = LeaveReducer::reduce(state, SyncIntent::FetchStarted);
        LeaveReducer::reduce(
            state,
            SyncIntent::FetchSucceeded {
                ticket: 1,
                items: seed::leave_requests(),
            },
        )
    }

    #[test]
    fn fetch_replaces_snapshot_and_clears_loading() {
        let state = loaded(true);
        assert_eq!(state.snapshot.len(), seed::leave_requests().len());
        assert!(!state.loading());
        assert_eq!(state.error(), None);
    }

    #[test]
    fn failed_fetch_keeps_snapshot() {
        let state = LeaveReducer::reduce(loaded(true), SyncIntent::FetchStarted);
        assert!(state.loading());
        let state = LeaveReducer::reduce(
            state,
            SyncIntent::FetchFailed {
                ticket: 2,
                message: "offline".into(),
            },
        );
        assert_eq!(state.snapshot.len(), seed::leave_requests().len());
        assert_eq!(state.error(), Some("offline"));
        assert!(!state.loading());
    }

    #[test]
    fn stale_success_is_discarded_when_guarded() {
        let state = LeaveReducer::reduce(loaded(true), SyncIntent::FetchStarted);
        let state = LeaveReducer::reduce(state, SyncIntent::FetchStarted);
        let state = LeaveReducer::reduce(
            state,
            SyncIntent::FetchSucceeded {
                ticket: 3,
                items: vec![leave("101")],
            },
        );
        let state = LeaveReducer::reduce(
            state,
            SyncIntent::FetchSucceeded {
                ticket: 2,
                items: vec![leave("102"), leave("103")],
            },
        );
        assert_eq!(state.snapshot, vec![leave("101")]);
        assert!(!state.loading());
    }

    #[test]
    fn stale_success_wins_when_unguarded() {
        let state = LeaveReducer::reduce(loaded(false), SyncIntent::FetchStarted);
        let state = LeaveReducer::reduce(state, SyncIntent::FetchStarted);
        let state = LeaveReducer::reduce(
            state,
            SyncIntent::FetchSucceeded {
                ticket: 3,
                items: vec![leave("101")],
            },
        );
        let state = LeaveReducer::reduce(
            state,
            SyncIntent::FetchSucceeded {
                ticket: 2,
                items: vec![leave("102")],
            },
        );
        assert_eq!(state.snapshot, vec![leave("102")]);
    }

    #[test]
    fn stale_failure_does_not_set_error() {
        let state = LeaveReducer::reduce(loaded(true), SyncIntent::FetchStarted);
        let state = LeaveReducer::reduce(state, SyncIntent::FetchStarted);
        let state = LeaveReducer::reduce(
            state,
            SyncIntent::FetchFailed {
                ticket: 2,
                message: "late failure".into(),
            },
        );
        assert_eq!(state.error(), None);
        assert!(state.loading());
    }

    #[test]
    fn mutation_patches_every_copy() {
        let state = loaded(true);
        let state = LeaveReducer::reduce(
            state,
            SyncIntent::ViewFetchStarted {
                view: "pending".into(),
            },
        );
        let state = LeaveReducer::reduce(
            state,
            SyncIntent::ViewFetchSucceeded {
                view: "pending".into(),
                ticket: 1,
                items: vec![leave("101"), leave("103")],
            },
        );
        let state = LeaveReducer::reduce(state, SyncIntent::SelectStarted);
        let state = LeaveReducer::reduce(
            state,
            SyncIntent::SelectSucceeded {
                ticket: 1,
                entity: Some(leave("101")),
            },
        );

        let mut approved = leave("101");
        approved.status = LeaveStatus::Approved;
        let state = LeaveReducer::reduce(state, SyncIntent::MutationStarted);
        let state = LeaveReducer::reduce(
            state,
            SyncIntent::MutationApplied {
                generation: 0,
                entity: approved,
            },
        );

        let copies = state.copies("101");
        assert_eq!(copies.len(), 3);
        assert!(copies.iter().all(|l| l.status == LeaveStatus::Approved));
        assert!(!state.loading());
    }

    fn with_pending_view(state: SyncState<LeaveRequest>) -> SyncState<LeaveRequest> {
        let state = LeaveReducer::reduce(
            state,
            SyncIntent::ViewFetchStarted {
                view: "pending".into(),
            },
        );
        LeaveReducer::reduce(
            state,
            SyncIntent::ViewFetchSucceeded {
                view: "pending".into(),
                ticket: 1,
                items: vec![leave("101"), leave("103"), leave("105")],
            },
        )
    }

    fn new_leave(id: &str, status: LeaveStatus) -> LeaveRequest {
        let mut created = leave("105");
        created.id = id.into();
        created.status = status;
        created
    }

    fn applied(
        state: SyncState<LeaveRequest>,
        generation: u64,
        entity: LeaveRequest,
    ) -> SyncState<LeaveRequest> {
        let state = LeaveReducer::reduce(state, SyncIntent::MutationStarted);
        LeaveReducer::reduce(state, SyncIntent::MutationApplied { generation, entity })
    }

    #[test]
    fn mutation_inserts_only_where_filter_admits() {
        let state = with_pending_view(loaded(true));
        let state = applied(state, 0, new_leave("900", LeaveStatus::Approved));
        let state = applied(state, 0, new_leave("901", LeaveStatus::Pending));

        assert!(state.snapshot.iter().any(|l| l.id == "900"));
        let pending = state.view("pending").unwrap();
        assert!(pending.get("900").is_none());
        assert!(pending.get("901").is_some());
    }

    #[test]
    fn mutation_skips_views_never_fetched() {
        let state = applied(loaded(true), 0, new_leave("901", LeaveStatus::Pending));

        assert!(state.snapshot.iter().any(|l| l.id == "901"));
        let pending = state.view("pending").unwrap();
        assert!(pending.items.is_empty());
        assert!(!pending.loaded);
    }

    #[test]
    fn write_started_before_clear_is_discarded() {
        let state = with_pending_view(loaded(true));
        let state = LeaveReducer::reduce(state, SyncIntent::MutationStarted);
        let state = LeaveReducer::reduce(state, SyncIntent::MutationStarted);
        let state = LeaveReducer::reduce(state, SyncIntent::Cleared);

        let mut approved = leave("101");
        approved.status = LeaveStatus::Approved;
        let state = LeaveReducer::reduce(
            state,
            SyncIntent::MutationApplied {
                generation: 0,
                entity: approved,
            },
        );
        assert!(state.snapshot.is_empty());
        assert!(state.copies("101").is_empty());
        assert!(state.loading());

        let state = LeaveReducer::reduce(
            state,
            SyncIntent::MutationFailed {
                generation: 0,
                message: "late failure".into(),
            },
        );
        assert_eq!(state.error(), None);
        assert!(!state.loading());
    }

    #[test]
    fn write_started_before_clear_applies_when_unguarded() {
        let state = LeaveReducer::reduce(loaded(false), SyncIntent::MutationStarted);
        let state = LeaveReducer::reduce(state, SyncIntent::Cleared);
        let state = LeaveReducer::reduce(
            state,
            SyncIntent::MutationApplied {
                generation: 0,
                entity: leave("101"),
            },
        );
        assert_eq!(state.snapshot, vec![leave("101")]);
    }

    #[test]
    fn failed_mutation_changes_no_list() {
        let before = loaded(true);
        let state = LeaveReducer::reduce(before.clone(), SyncIntent::MutationStarted);
        let state = LeaveReducer::reduce(
            state,
            SyncIntent::MutationFailed {
                generation: 0,
                message: "conflict".into(),
            },
        );
        assert_eq!(state.snapshot, before.snapshot);
        assert_eq!(state.error(), Some("conflict"));
    }

    #[test]
    fn removal_drops_every_copy() {
        let state = LeaveReducer::reduce(loaded(true), SyncIntent::MutationStarted);
        let state = LeaveReducer::reduce(
            state,
            SyncIntent::RemovalApplied {
                generation: 0,
                id: "101".into(),
            },
        );
        assert!(state.copies("101").is_empty());
    }

    #[test]
    fn unknown_view_is_ignored() {
        let state = LeaveReducer::reduce(
            loaded(true),
            SyncIntent::ViewFetchStarted {
                view: "nope".into(),
            },
        );
        assert!(!state.loading());
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let state = SyncState::<LeaveRequest>::default();
        let state = LeaveReducer::reduce(state, SyncIntent::FetchStarted);
        let mut dup = leave("101");
        dup.reason = "duplicate".into();
        let state = LeaveReducer::reduce(
            state,
            SyncIntent::FetchSucceeded {
                ticket: 1,
                items: vec![leave("101"), dup],
            },
        );
        assert_eq!(state.snapshot, vec![leave("101")]);
    }

    #[test]
    fn clear_empties_lists_and_invalidates_tickets() {
        let state = LeaveReducer::reduce(loaded(true), SyncIntent::FetchStarted);
        let state = LeaveReducer::reduce(state, SyncIntent::Cleared);
        assert!(state.snapshot.is_empty());
        assert_eq!(state.filter, LeaveFilter::default());
        let state = LeaveReducer::reduce(
            state,
            SyncIntent::FetchSucceeded {
                ticket: 2,
                items: seed::leave_requests(),
            },
        );
        assert!(state.snapshot.is_empty());
        assert!(!state.loading());
    }
}
