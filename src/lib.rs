//! MVI view models with a serialized action queue and composable
//! interception chains.
//!
//! ```
//! use statevm::interception::Interceptions;
//! use statevm::mvi::{Action, State};
//! use statevm::viewmodel::ViewModel;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Counter(i32);
//! impl State for Counter {}
//!
//! #[derive(Debug, Clone)]
//! enum CounterAction { Increment, Decrement }
//! impl Action for CounterAction {}
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), statevm::EngineError> {
//! let vm = ViewModel::builder(Counter(0), |state: &Counter, action: &CounterAction| {
//!     Some(match action {
//!         CounterAction::Increment => Counter(state.0 + 1),
//!         CounterAction::Decrement => Counter(state.0 - 1),
//!     })
//! })
//! .interceptions(
//!     Interceptions::<Counter, CounterAction>::builder()
//!         .before_pipe("log", |_, action| println!("{action:?}"))
//!         .build(),
//! )
//! .build()?;
//!
//! vm.dispatch(CounterAction::Increment);
//! vm.dispatch(CounterAction::Increment);
//! vm.dispatch(CounterAction::Decrement);
//! vm.flush().await;
//! assert_eq!(vm.state(), Counter(1));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod debug;
mod error;
pub mod interception;
pub mod mvi;
pub mod resource;
pub mod view_event;
pub mod viewmodel;

pub use error::EngineError;
