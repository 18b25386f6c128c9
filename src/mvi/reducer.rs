//! Reducer trait for the state flow.

use std::sync::Arc;

use super::action::Action;
use super::state::FlowState;

/// Reducer transforms a state snapshot based on an action.
///
/// The reducer is the only place where state transitions happen.
/// It must be pure: `(Arc<State>, &Action) -> Arc<State>`.
///
/// An action the reducer has no transition for must return the
/// input `Arc` itself, so callers can detect the no-op with
/// [`Arc::ptr_eq`].
pub trait Reducer {
    /// The state type this reducer operates on.
    type State: FlowState;

    /// The action type this reducer handles.
    type Action: Action;

    /// Process an action and return the next snapshot.
    fn reduce(state: Arc<Self::State>, action: &Self::Action) -> Arc<Self::State>;
}
