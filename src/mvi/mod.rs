//! Unidirectional state-flow primitives.
//!
//! ```text
//! Action ──→ Reducer ──→ Arc<State> ──→ readers
//!    ↑                                    │
//!    └─────────── orchestrator ───────────┘
//! ```
//!
//! - **State**: immutable snapshot, shared behind `Arc`
//! - **Action**: one discrete, serialized change request
//! - **Reducer**: pure function producing the next snapshot

mod action;
mod reducer;
mod state;

pub use action::Action;
pub use reducer::Reducer;
pub use state::FlowState;
