//! Client-side synchronization stores for school administration data.
//!
//! Each domain (teachers, classes, students, exams, fees, leave requests)
//! gets one [`sync::SyncStore`] caching a filtered snapshot of a
//! [`service::DomainService`], with request state, a selected entity and
//! named secondary views kept consistent across writes.

pub mod config;
pub mod context;
pub mod domain;
pub mod logging;
pub mod mvi;
pub mod service;
pub mod sync;
