//! Synchronization store: a cached, reactive view of one domain.
//!
//! Every operation follows the same lifecycle: dispatch a `*Started`
//! intent (issuing a ticket and marking the store loading), await the
//! domain service, then dispatch the outcome. State changes are
//! published to `watch` subscribers after every transition.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use uuid::Uuid;

use crate::config::SyncConfig;
use crate::domain::Entity;
use crate::mvi::Reducer;
use crate::service::{DomainService, ServiceError};

use super::error::SyncError;
use super::intent::SyncIntent;
use super::notice::Notifier;
use super::reducer::SyncReducer;
use super::retry::{with_retry, RetryPolicy};
use super::state::{CachedList, RequestState, SyncState};

/// Behavior knobs of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Drop responses superseded by a newer request on the same channel.
    /// When false, whichever response resolves last wins.
    pub discard_stale_responses: bool,
    /// Retry policy for reads. Writes are never retried.
    pub retry: RetryPolicy,
    pub request_timeout: Option<Duration>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            discard_stale_responses: true,
            retry: RetryPolicy::none(),
            request_timeout: None,
        }
    }
}

impl From<&SyncConfig> for SyncOptions {
    fn from(config: &SyncConfig) -> Self {
        Self {
            discard_stale_responses: config.discard_stale_responses,
            retry: RetryPolicy {
                max_retries: config.max_retries,
                backoff_base: Duration::from_millis(config.retry_backoff_base_ms),
            },
            request_timeout: match config.request_timeout_seconds {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        }
    }
}

struct StoreInner<T: Entity, S> {
    service: S,
    state: Mutex<SyncState<T>>,
    published: watch::Sender<SyncState<T>>,
    options: SyncOptions,
    notifier: Option<Notifier>,
}

/// Cached, filterable view of one domain synchronized against a
/// [`DomainService`].
///
/// Cloning yields another handle to the same store.
pub struct SyncStore<T: Entity, S> {
    inner: Arc<StoreInner<T, S>>,
}

impl<T: Entity, S> Clone for SyncStore<T, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Builder for [`SyncStore`].
pub struct SyncStoreBuilder<T: Entity, S> {
    service: S,
    options: SyncOptions,
    views: Vec<CachedList<T>>,
    notifier: Option<Notifier>,
}

impl<T: Entity, S: DomainService<T>> SyncStoreBuilder<T, S> {
    pub fn options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Register a secondary list fetched with its own fixed `filter`.
    pub fn view(mut self, name: impl Into<String>, filter: T::Filter) -> Self {
        self.views.push(CachedList::new(name, filter));
        self
    }

    pub fn notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn build(self) -> SyncStore<T, S> {
        let state = SyncState::new(self.views, self.options.discard_stale_responses);
        let (published, _) = watch::channel(state.clone());
        SyncStore {
            inner: Arc::new(StoreInner {
                service: self.service,
                state: Mutex::new(state),
                published,
                options: self.options,
                notifier: self.notifier,
            }),
        }
    }
}

impl<T: Entity, S: DomainService<T>> SyncStore<T, S> {
    pub fn builder(service: S) -> SyncStoreBuilder<T, S> {
        SyncStoreBuilder {
            service,
            options: SyncOptions::default(),
            views: Vec::new(),
            notifier: None,
        }
    }

    pub fn new(service: S, options: SyncOptions) -> Self {
        Self::builder(service).options(options).build()
    }

    /// Copy of the full store state.
    pub fn state(&self) -> SyncState<T> {
        self.inner.state.lock().clone()
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.inner.state.lock().snapshot.clone()
    }

    pub fn request(&self) -> RequestState {
        self.inner.state.lock().request.clone()
    }

    pub fn filter(&self) -> T::Filter {
        self.inner.state.lock().filter.clone()
    }

    pub fn selection(&self) -> Option<T> {
        self.inner.state.lock().selection.clone()
    }

    /// Items of a named view, or `None` if the view does not exist.
    pub fn view_items(&self, name: &str) -> Option<Vec<T>> {
        self.inner.state.lock().view(name).map(|v| v.items.clone())
    }

    /// Receive every state the store transitions to.
    pub fn subscribe(&self) -> watch::Receiver<SyncState<T>> {
        self.inner.published.subscribe()
    }

    pub fn service(&self) -> &S {
        &self.inner.service
    }

    /// Fetch the list with the current filter and replace the snapshot.
    ///
    /// On failure the previous snapshot is kept. With stale-response
    /// discarding enabled, a call overtaken by a newer fetch returns
    /// [`SyncError::Superseded`] and leaves the snapshot alone.
    pub async fn fetch_all(&self) -> Result<Vec<T>, SyncError> {
        let (ticket, filter) =
            self.dispatch(SyncIntent::FetchStarted, |s| (s.list_ticket, s.filter.clone()));
        let request_id = Uuid::new_v4();
        tracing::debug!(domain = T::KIND, %request_id, ticket, ?filter, "Fetching list");

        let service = &self.inner.service;
        let filter = &filter;
        let result = self
            .read("fetch_all", move || service.fetch_all(filter))
            .await;

        match result {
            Ok(items) => {
                let count = items.len();
                let (current, snapshot) = self.dispatch(
                    SyncIntent::FetchSucceeded { ticket, items },
                    |s| (s.list_is_current(ticket), s.snapshot.clone()),
                );
                if !current {
                    tracing::debug!(domain = T::KIND, %request_id, ticket, "Discarded stale list response");
                    return Err(SyncError::Superseded { ticket });
                }
                tracing::debug!(domain = T::KIND, %request_id, ticket, count, "List fetched");
                Ok(snapshot)
            }
            Err(err) => {
                let message = err.to_string();
                let current = self.dispatch(
                    SyncIntent::FetchFailed {
                        ticket,
                        message: message.clone(),
                    },
                    |s| s.list_is_current(ticket),
                );
                if !current {
                    tracing::debug!(domain = T::KIND, %request_id, ticket, error = %err, "Discarded stale list failure");
                    return Err(SyncError::Superseded { ticket });
                }
                self.report_failure(&request_id, "fetch_all", &message);
                Err(err.into())
            }
        }
    }

    /// Replace the whole filter, then fetch.
    pub async fn fetch_all_with(&self, filter: T::Filter) -> Result<Vec<T>, SyncError> {
        self.dispatch(SyncIntent::FilterReplaced(filter), |_| ());
        self.fetch_all().await
    }

    /// Merge the fields set in `patch` into the filter and refetch at once.
    ///
    /// There is no debouncing: every call issues a request.
    pub async fn set_filter(&self, patch: T::Filter) -> Result<Vec<T>, SyncError> {
        self.dispatch(SyncIntent::FilterMerged(patch), |_| ());
        self.fetch_all().await
    }

    /// Fetch a named view with its own filter and replace its items.
    pub async fn fetch_view(&self, name: &str) -> Result<Vec<T>, SyncError> {
        let started = self.dispatch(
            SyncIntent::ViewFetchStarted {
                view: name.to_string(),
            },
            |s| s.view(name).map(|v| (v.ticket, v.filter.clone())),
        );
        let Some((ticket, filter)) = started else {
            return Err(SyncError::UnknownView(name.to_string()));
        };
        let request_id = Uuid::new_v4();
        tracing::debug!(domain = T::KIND, %request_id, view = name, ticket, "Fetching view");

        let service = &self.inner.service;
        let filter = &filter;
        let result = self
            .read("fetch_view", move || service.fetch_all(filter))
            .await;

        match result {
            Ok(items) => {
                let (current, items) = self.dispatch(
                    SyncIntent::ViewFetchSucceeded {
                        view: name.to_string(),
                        ticket,
                        items,
                    },
                    |s| {
                        (
                            s.view_is_current(name, ticket),
                            s.view(name).map(|v| v.items.clone()).unwrap_or_default(),
                        )
                    },
                );
                if !current {
                    return Err(SyncError::Superseded { ticket });
                }
                Ok(items)
            }
            Err(err) => {
                let message = err.to_string();
                let current = self.dispatch(
                    SyncIntent::ViewFetchFailed {
                        view: name.to_string(),
                        ticket,
                        message: message.clone(),
                    },
                    |s| s.view_is_current(name, ticket),
                );
                if !current {
                    return Err(SyncError::Superseded { ticket });
                }
                self.report_failure(&request_id, "fetch_view", &message);
                Err(err.into())
            }
        }
    }

    /// Fetch every registered view in registration order.
    ///
    /// Stops at the first failing view.
    pub async fn fetch_views(&self) -> Result<(), SyncError> {
        let names: Vec<String> = self
            .inner
            .state
            .lock()
            .views
            .iter()
            .map(|v| v.name.clone())
            .collect();
        for name in names {
            self.fetch_view(&name).await?;
        }
        Ok(())
    }

    /// Fetch one entity into the selection.
    ///
    /// Does not consult the snapshot. A missing id selects nothing and is
    /// not an error. On failure the previous selection stays in place.
    pub async fn fetch_one(&self, id: &str) -> Result<Option<T>, SyncError> {
        let ticket = self.dispatch(SyncIntent::SelectStarted, |s| s.selection_ticket);
        let request_id = Uuid::new_v4();
        tracing::debug!(domain = T::KIND, %request_id, ticket, id, "Fetching entity");

        let service = &self.inner.service;
        let result = self.read("fetch_one", move || service.fetch_one(id)).await;

        match result {
            Ok(entity) => {
                if entity.is_none() {
                    tracing::debug!(domain = T::KIND, %request_id, id, "Entity not found");
                }
                let current = self.dispatch(
                    SyncIntent::SelectSucceeded {
                        ticket,
                        entity: entity.clone(),
                    },
                    |s| s.selection_is_current(ticket),
                );
                if !current {
                    return Err(SyncError::Superseded { ticket });
                }
                Ok(entity)
            }
            Err(err) => {
                let message = err.to_string();
                let current = self.dispatch(
                    SyncIntent::SelectFailed {
                        ticket,
                        message: message.clone(),
                    },
                    |s| s.selection_is_current(ticket),
                );
                if !current {
                    return Err(SyncError::Superseded { ticket });
                }
                self.report_failure(&request_id, "fetch_one", &message);
                Err(err.into())
            }
        }
    }

    /// Apply a write through the service and splice the returned entity
    /// into every cached list that holds it or whose filter admits it.
    /// Views that were never fetched are left empty.
    ///
    /// On failure no cached list changes. If the store is cleared while the
    /// write is in flight, the result is returned but not cached.
    pub async fn mutate(&self, action: T::Action) -> Result<T, SyncError> {
        let generation = self.dispatch(SyncIntent::MutationStarted, |s| s.write_generation);
        let request_id = Uuid::new_v4();
        tracing::debug!(domain = T::KIND, %request_id, ?action, "Applying mutation");

        let service = &self.inner.service;
        let result = with_retry(
            T::KIND,
            "mutate",
            RetryPolicy::none(),
            self.inner.options.request_timeout,
            move || service.mutate(action.clone()),
        )
        .await;

        match result {
            Ok(entity) => {
                let current = self.dispatch(
                    SyncIntent::MutationApplied {
                        generation,
                        entity: entity.clone(),
                    },
                    |s| s.write_is_current(generation),
                );
                if !current {
                    tracing::debug!(domain = T::KIND, %request_id, id = entity.id(), "Store cleared during mutation, cache left alone");
                    return Ok(entity);
                }
                tracing::info!(domain = T::KIND, %request_id, id = entity.id(), "Mutation applied");
                if let Some(notifier) = &self.inner.notifier {
                    notifier.info(T::KIND, format!("Saved {} {}", T::KIND, entity.id()));
                }
                Ok(entity)
            }
            Err(err) => {
                let message = err.to_string();
                let current = self.dispatch(
                    SyncIntent::MutationFailed {
                        generation,
                        message: message.clone(),
                    },
                    |s| s.write_is_current(generation),
                );
                if current {
                    self.report_failure(&request_id, "mutate", &message);
                }
                Err(err.into())
            }
        }
    }

    /// Delete an entity and drop every cached copy of it.
    pub async fn remove(&self, id: &str) -> Result<(), SyncError> {
        let generation = self.dispatch(SyncIntent::MutationStarted, |s| s.write_generation);
        let request_id = Uuid::new_v4();

        let service = &self.inner.service;
        let result = with_retry(
            T::KIND,
            "remove",
            RetryPolicy::none(),
            self.inner.options.request_timeout,
            move || service.remove(id),
        )
        .await;

        match result {
            Ok(()) => {
                let current = self.dispatch(
                    SyncIntent::RemovalApplied {
                        generation,
                        id: id.to_string(),
                    },
                    |s| s.write_is_current(generation),
                );
                if !current {
                    tracing::debug!(domain = T::KIND, %request_id, id, "Store cleared during removal, cache left alone");
                    return Ok(());
                }
                tracing::info!(domain = T::KIND, %request_id, id, "Entity removed");
                if let Some(notifier) = &self.inner.notifier {
                    notifier.info(T::KIND, format!("Removed {} {}", T::KIND, id));
                }
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                let current = self.dispatch(
                    SyncIntent::MutationFailed {
                        generation,
                        message: message.clone(),
                    },
                    |s| s.write_is_current(generation),
                );
                if current {
                    self.report_failure(&request_id, "remove", &message);
                }
                Err(err.into())
            }
        }
    }

    /// Drop all cached entities, the selection, the error and the filter.
    ///
    /// Responses to reads and writes still in flight are discarded when
    /// they arrive, as long as stale-response discarding is enabled.
    pub fn clear(&self) {
        self.dispatch(SyncIntent::Cleared, |_| ());
        tracing::debug!(domain = T::KIND, "Store cleared");
    }

    /// Reduce `intent` into the state, publish the result and read from it
    /// while still holding the lock.
    fn dispatch<R>(&self, intent: SyncIntent<T>, read: impl FnOnce(&SyncState<T>) -> R) -> R {
        let mut state = self.inner.state.lock();
        let current = std::mem::take(&mut *state);
        *state = SyncReducer::reduce(current, intent);
        self.inner.published.send_replace(state.clone());
        read(&state)
    }

    async fn read<R, F, Fut>(&self, op: &'static str, call: F) -> Result<R, ServiceError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, ServiceError>>,
    {
        with_retry(
            T::KIND,
            op,
            self.inner.options.retry,
            self.inner.options.request_timeout,
            call,
        )
        .await
    }

    fn report_failure(&self, request_id: &Uuid, op: &'static str, message: &str) {
        tracing::warn!(domain = T::KIND, %request_id, op, error = message, "Service call failed");
        if let Some(notifier) = &self.inner.notifier {
            notifier.error(T::KIND, message);
        }
    }
}
