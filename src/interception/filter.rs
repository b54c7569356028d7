use async_trait::async_trait;

use super::{name_or, Interception, Next};
use crate::mvi::{Action, State};
use crate::viewmodel::{Dispatcher, Scope};

/// Forwards actions matching `predicate`, blocks all others.
///
/// A blocked action never reaches the reducer.
pub struct Filter<S, A> {
    name: String,
    predicate: Box<dyn Fn(&S, &A) -> bool + Send + Sync>,
}

impl<S: State, A: Action> Filter<S, A> {
    pub fn new(
        name: impl Into<String>,
        predicate: impl Fn(&S, &A) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name_or(name, "Filter"),
            predicate: Box::new(predicate),
        }
    }
}

#[async_trait]
impl<S: State, A: Action> Interception<S, A> for Filter<S, A> {
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
        if (self.predicate)(state, &action) {
            next.run(scope, state, action, dispatcher).await
        } else {
            None
        }
    }
}

impl<S, A> std::fmt::Debug for Filter<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter").field("name", &self.name).finish()
    }
}
