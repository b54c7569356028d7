use async_trait::async_trait;

use super::{name_or, Interception, Next};
use crate::mvi::{Action, State};
use crate::viewmodel::{Dispatcher, Scope};

type Before<S, A> = Box<dyn Fn(&S, &A) + Send + Sync>;
type After<S, A> = Box<dyn Fn(&S, Option<&A>) + Send + Sync>;

/// Observes actions around the rest of the chain without altering them.
///
/// `before` sees the received action, `after` sees whatever the rest of
/// the chain returned (`None` if it was blocked further down).
pub struct Pipe<S, A> {
    name: String,
    before: Option<Before<S, A>>,
    after: Option<After<S, A>>,
}

impl<S: State, A: Action> Pipe<S, A> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name_or(name, "Pipe"),
            before: None,
            after: None,
        }
    }

    pub fn before(mut self, before: impl Fn(&S, &A) + Send + Sync + 'static) -> Self {
        self.before = Some(Box::new(before));
        self
    }

    pub fn after(mut self, after: impl Fn(&S, Option<&A>) + Send + Sync + 'static) -> Self {
        self.after = Some(Box::new(after));
        self
    }
}

#[async_trait]
impl<S: State, A: Action> Interception<S, A> for Pipe<S, A> {
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
        if let Some(before) = &self.before {
            before(state, &action);
        }
        let result = next.run(scope, state, action, dispatcher).await;
        if let Some(after) = &self.after {
            after(state, result.as_ref());
        }
        result
    }
}

impl<S, A> std::fmt::Debug for Pipe<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipe")
            .field("name", &self.name)
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}
