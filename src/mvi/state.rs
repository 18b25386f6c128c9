//! Base trait for state snapshots.

/// Marker trait for state held by a store.
///
/// States should be:
/// - Cheap to copy structurally (sections behind `Arc`)
/// - Self-contained (everything a view needs)
/// - Comparable (PartialEq for detecting changes)
pub trait FlowState: Clone + PartialEq + Default + Send + Sync + 'static {}
