//! Domain service contract.
//!
//! A domain service is the external collaborator a synchronization store
//! talks to. This crate ships an in-memory [`MockService`] with simulated
//! latency; real transports plug in by implementing [`DomainService`].

mod error;
mod mock;
pub mod seed;

use std::future::Future;

use crate::domain::Entity;

pub use error::ServiceError;
pub use mock::{IdSequence, MockService};

/// Asynchronous CRUD/query operations over one entity type.
pub trait DomainService<T: Entity>: Send + Sync + 'static {
    /// List every entity admitted by `filter`.
    fn fetch_all(
        &self,
        filter: &T::Filter,
    ) -> impl Future<Output = Result<Vec<T>, ServiceError>> + Send;

    /// Look up one entity. A missing id is `Ok(None)`, not an error.
    fn fetch_one(&self, id: &str) -> impl Future<Output = Result<Option<T>, ServiceError>> + Send;

    /// Apply a write and return the entity as stored afterwards.
    fn mutate(&self, action: T::Action) -> impl Future<Output = Result<T, ServiceError>> + Send;

    /// Delete an entity.
    fn remove(&self, id: &str) -> impl Future<Output = Result<(), ServiceError>> + Send;
}

/// Server-side write rules for an entity type.
///
/// Used by [`MockService`] to play the role of the remote dataset.
pub trait Apply: Entity {
    /// Apply `action` to `records`, returning the written entity.
    ///
    /// On error `records` must be left unchanged.
    fn apply(
        records: &mut Vec<Self>,
        action: Self::Action,
        ids: &mut IdSequence,
    ) -> Result<Self, ServiceError>;
}

/// Find an entity by id for in-place update.
pub(crate) fn find_mut<'a, T: Entity>(
    records: &'a mut [T],
    id: &str,
) -> Result<&'a mut T, ServiceError> {
    records
        .iter_mut()
        .find(|r| r.id() == id)
        .ok_or_else(|| ServiceError::NotFound {
            kind: T::KIND,
            id: id.to_string(),
        })
}

/// Replace an existing entity wholesale.
pub(crate) fn replace<T: Entity>(records: &mut [T], entity: T) -> Result<T, ServiceError> {
    let slot = find_mut(records, entity.id())?;
    *slot = entity.clone();
    Ok(entity)
}
