//! Serialized dispatch into the label workflow state.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::label::action::LabelAction;
use crate::label::reducer::LabelReducer;
use crate::label::state::WorkflowState;
use crate::mvi::Reducer;
use crate::services::Notifier;

/// Holder of the current workflow snapshot.
///
/// Cloning is cheap and every clone dispatches into the same state.
/// Reductions run one at a time under the lock; readers get an
/// `Arc` snapshot that never changes underneath them.
#[derive(Clone)]
pub struct LabelStore {
    state: Arc<Mutex<Arc<WorkflowState>>>,
    notifier: Arc<dyn Notifier>,
}

impl LabelStore {
    pub fn new(initial: WorkflowState, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            state: Arc::new(Mutex::new(Arc::new(initial))),
            notifier,
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> Arc<WorkflowState> {
        Arc::clone(&self.state.lock())
    }

    /// Applies `action` and returns the resulting snapshot.
    ///
    /// Error notices are forwarded to the notification channel before
    /// reduction; the label state itself ignores them.
    pub fn dispatch(&self, action: LabelAction) -> Arc<WorkflowState> {
        if let LabelAction::ErrorNotice { message } = &action {
            self.notifier.error(message);
        }

        let mut current = self.state.lock();
        let next = LabelReducer::reduce(Arc::clone(&current), &action);
        let changed = !Arc::ptr_eq(&current, &next);
        *current = Arc::clone(&next);
        drop(current);

        tracing::trace!(action = action.name(), changed, "Dispatched label action");
        next
    }
}
