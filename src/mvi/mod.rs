//! Model-View-Intent (MVI) primitives.
//!
//! These traits describe the values that flow through a
//! [`ViewModel`](crate::viewmodel::ViewModel).
//!
//! # Architecture
//!
//! ```text
//! dispatch ──→ Interceptions ──→ Reducer ──→ State ──→ View
//!    ↑              │                                   │
//!    └── effects ───┴───────────────────────────────────┘
//! ```
//!
//! - **State**: Immutable snapshot of a feature's data
//! - **Action**: Intent to change the state, sent by views or side effects
//! - **Reducer**: Pure function that computes the next state

mod action;
mod reducer;
mod state;

pub use action::Action;
pub use reducer::Reducer;
pub use state::State;
