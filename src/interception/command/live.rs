use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;

use super::reaction::LiveReaction;
use crate::interception::{name_or, Interception, Next};
use crate::mvi::{Action, State};
use crate::viewmodel::{Dispatcher, Scope};

/// Interception reacting to actions with a live stream of actions.
///
/// Works like [`Command`](super::Command), except that the side effect is a
/// stream. Every produced action is dispatched as a separate run through
/// the chain and the reducer. The stream is dropped when the view model is
/// cleared.
pub struct LiveCommand<S, A> {
    name: String,
    react: Box<dyn Fn(&A) -> LiveReaction<S, A> + Send + Sync>,
}

impl<S: State, A: Action> LiveCommand<S, A> {
    pub fn new(
        name: impl Into<String>,
        react: impl Fn(&A) -> LiveReaction<S, A> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name_or(name, "LiveCommand"),
            react: Box::new(react),
        }
    }

    fn collect(&self, scope: &Scope, mut stream: BoxStream<'static, A>, dispatcher: &Dispatcher<A>) {
        let dispatcher = dispatcher.clone();
        scope.launch(&self.name, async move {
            while let Some(action) = stream.next().await {
                if dispatcher.is_closed() {
                    break;
                }
                dispatcher.dispatch(action);
            }
            Ok(())
        });
    }
}

#[async_trait]
impl<S: State, A: Action> Interception<S, A> for LiveCommand<S, A> {
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
            LiveReaction::Consuming { immediate, stream } => {
                self.collect(scope, stream(state.clone()), dispatcher);
                Some(immediate)
            }
            LiveReaction::Forwarding(stream) => {
                self.collect(scope, stream(state.clone()), dispatcher);
                next.run(scope, state, action, dispatcher).await
            }
            LiveReaction::Ignoring => next.run(scope, state, action, dispatcher).await,
        }
    }
}

impl<S, A> std::fmt::Debug for LiveCommand<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveCommand").field("name", &self.name).finish()
    }
}
