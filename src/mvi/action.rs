//! Base trait for actions flowing through a store.

/// Marker trait for action objects.
///
/// Actions represent:
/// - User edits (field changes, selections)
/// - Completions of asynchronous capabilities (normalization, purchase)
/// - Requests aimed at other channels (notices) that a reducer ignores
pub trait Action: Send + Sync + 'static {}
