//! Base trait for store state in MVI architecture.

/// Marker trait for store state objects.
///
/// States should be:
/// - Immutable (Clone to publish new states)
/// - Self-contained (all data the view needs to render)
/// - Comparable (PartialEq for detecting changes)
pub trait StoreState: Clone + PartialEq + Default + Send + Sync + 'static {}
