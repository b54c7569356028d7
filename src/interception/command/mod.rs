//! Interceptions launching side effects.

mod live;
mod reaction;

use async_trait::async_trait;

use super::{name_or, Interception, Next};
use crate::mvi::{Action, State};
use crate::viewmodel::{Dispatcher, Scope};

pub use live::LiveCommand;
pub use reaction::{Effect, LiveEffect, LiveReaction, Reaction};

/// Interception reacting to actions with asynchronous side effects.
///
/// `react` decides for every received action:
/// * [`Reaction::Ignoring`] forwards the action.
/// * [`Reaction::Consuming`] returns its immediate action instead of
///   forwarding and launches the effect.
/// * [`Reaction::Forwarding`] launches the effect and forwards the action.
///
/// Effects run on the view model's [`Scope`] and are not awaited by the
/// chain. They are cancelled when the view model is cleared, and report
/// back by dispatching actions.
pub struct Command<S, A> {
    name: String,
    react: Box<dyn Fn(&A) -> Reaction<S, A> + Send + Sync>,
}

impl<S: State, A: Action> Command<S, A> {
    pub fn new(
        name: impl Into<String>,
        react: impl Fn(&A) -> Reaction<S, A> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name_or(name, "Command"),
            react: Box::new(react),
        }
    }
}

#[async_trait]
impl<S: State, A: Action> Interception<S, A> for Command<S, A> {
    fn debug_name(&self) -> &str {
        &self.name
    }

    async fn intercept(
        &self,
        scope: &Scope,
        state: &S,
        action: A,
        dispatcher: &Dispatcher<A>,
        next: Next<'_, S, A>,
    ) -> Option<A> {
        match (self.react)(&action) {
            Reaction::Consuming { immediate, effect } => {
                scope.launch(&self.name, effect(state.clone(), dispatcher.clone()));
                Some(immediate)
            }
            Reaction::Forwarding(effect) => {
                scope.launch(&self.name, effect(state.clone(), dispatcher.clone()));
                next.run(scope, state, action, dispatcher).await
            }
            Reaction::Ignoring => next.run(scope, state, action, dispatcher).await,
        }
    }
}

impl<S, A> std::fmt::Debug for Command<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command").field("name", &self.name).finish()
    }
}
