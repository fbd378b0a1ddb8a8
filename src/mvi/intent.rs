//! Base trait for intents in MVI architecture.

/// Marker trait for intent objects.
///
/// Intents represent:
/// - Actions requested by the view (fetch, filter, write)
/// - Service responses (results, failures)
/// - Lifecycle events (teardown)
///
/// Intents are processed by reducers to produce new states.
pub trait Intent: Send + 'static {}
