//! Synchronization store engine.
//!
//! One generic store per domain owns a cached snapshot, request state,
//! filter, selection and named secondary views, and keeps them in step
//! with a [`DomainService`](crate::service::DomainService).
//!
//! # Architecture
//!
//! ```text
//! View ──action──→ SyncStore ──call──→ DomainService
//!   ↑                 │ ↑                    │
//!   │               intent                   │
//!   │                 ↓ │                    │
//!   └──watch─── SyncReducer ←──response──────┘
//! ```
//!
//! Requests on the same channel (list, selection, each view) carry a
//! ticket. With stale-response discarding enabled only the response to
//! the latest ticket is applied; otherwise the last one to resolve wins.

mod error;
mod intent;
mod notice;
mod reducer;
mod retry;
mod state;
mod store;

pub use error::SyncError;
pub use intent::SyncIntent;
pub use notice::{Notice, NoticeLevel, Notifier};
pub use reducer::SyncReducer;
pub use retry::RetryPolicy;
pub use state::{CachedList, RequestState, SyncState};
pub use store::{SyncOptions, SyncStore, SyncStoreBuilder};
