//! Interception chain: middleware applied to every dispatched action.
//!
//! When an action is dispatched, the first [`Interception`] of the chain is
//! invoked. It is up to each interception to decide what happens:
//!  * Ignore it and pass it on by calling [`Next::run`].
//!  * Do some unrelated work, like logging, and pass it on (see [`Pipe`]).
//!  * Adapt it and pass the updated action on (see [`Adapter`]).
//!  * Block it by returning `None` without calling `next` (see [`Filter`]).
//!    The reducer is skipped and no state is published.
//!  * Consume it by returning another action without calling `next`
//!    (see [`Command`]). The reducer receives the returned action.
//!
//! Interceptions may also launch side effects on the [`Scope`] and dispatch
//! further actions through the [`Dispatcher`] at any time. Those actions are
//! queued and run through the whole chain again.
//!
//! ```
//! use statevm::interception::{Interceptions, Reaction};
//! # use statevm::mvi::{Action, State};
//! # #[derive(Debug, Clone, PartialEq)] struct Search { query: String, loading: bool }
//! # impl State for Search {}
//! # #[derive(Debug, Clone)] enum SearchAction { Type(String), Loading, Results(Vec<String>) }
//! # impl Action for SearchAction {}
//!
//! let chain = Interceptions::<Search, SearchAction>::builder()
//!     .filter("non-empty", |_, action| !matches!(action, SearchAction::Type(q) if q.is_empty()))
//!     .command("search", |action| match action {
//!         SearchAction::Type(query) => {
//!             let query = query.clone();
//!             Reaction::consuming(SearchAction::Loading, move |_, dispatcher| async move {
//!                 dispatcher.dispatch(SearchAction::Results(vec![query]));
//!                 Ok(())
//!             })
//!         }
//!         _ => Reaction::Ignoring,
//!     })
//!     .build();
//! assert_eq!(chain.len(), 2);
//! ```

mod adapter;
mod builder;
mod command;
mod filter;
mod pipe;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;

use crate::debug::{Stage, Tracer};
use crate::mvi::{Action, State};
use crate::viewmodel::{Dispatcher, Scope};

pub use adapter::Adapter;
pub use builder::{InterceptionsBuilder, Targeted};
pub use command::{Command, Effect, LiveCommand, LiveEffect, LiveReaction, Reaction};
pub use filter::Filter;
pub use pipe::Pipe;

/// Middleware unit of an [`Interceptions`] chain.
#[async_trait]
pub trait Interception<S, A>: Send + Sync {
    /// Name used when tracing this interception.
    fn debug_name(&self) -> &str;

    /// Intercept a dispatched action.
    ///
    /// * `scope` - Launch side effects bound to the view model's lifetime.
    /// * `state` - State at the time the action was dequeued.
    /// * `action` - The dispatched (or previously adapted) action.
    /// * `dispatcher` - Queue further actions, typically from side effects.
    /// * `next` - The rest of the chain. May be run zero or more times.
    ///
    /// Returns the action handed to the reducer, or `None` to block it.
    async fn intercept(
        &self,
        scope: &Scope,
        state: &S,
        action: A,
        dispatcher: &Dispatcher<A>,
        next: Next<'_, S, A>,
    ) -> Option<A>;
}

/// The rest of an interception chain.
///
/// A fresh `Next` is built for every dispatched action. It is `Copy`, so an
/// interception may run it several times or with a substituted action.
pub struct Next<'a, S, A> {
    chain: &'a [Arc<dyn Interception<S, A>>],
    tracer: &'a Tracer<S, A>,
}

impl<'a, S: State, A: Action> Next<'a, S, A> {
    /// Pass `action` to the remaining interceptions.
    ///
    /// At the end of the chain the action is returned unchanged.
    pub fn run<'b>(
        self,
        scope: &'b Scope,
        state: &'b S,
        action: A,
        dispatcher: &'b Dispatcher<A>,
    ) -> BoxFuture<'b, Option<A>>
    where
        'a: 'b,
    {
        async move {
            let Some((head, rest)) = self.chain.split_first() else {
                return Some(action);
            };
            let name = head.debug_name();
            self.tracer
                .interception(name, Stage::Received, state, Some(&action));

            let next = Next {
                chain: rest,
                tracer: self.tracer,
            };
            let result = head.intercept(scope, state, action, dispatcher, next).await;

            match &result {
                Some(action) => {
                    self.tracer
                        .interception(name, Stage::Forwarded, state, Some(action));
                }
                None => self.tracer.interception(name, Stage::Blocked, state, None),
            }
            result
        }
        .boxed()
    }

    /// Number of interceptions left, this one included.
    pub fn remaining(&self) -> usize {
        self.chain.len()
    }
}

impl<S, A> Clone for Next<'_, S, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, A> Copy for Next<'_, S, A> {}

impl<S, A> fmt::Debug for Next<'_, S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("remaining", &self.chain.len())
            .finish()
    }
}

/// Ordered, immutable chain of interceptions.
pub struct Interceptions<S, A> {
    chain: Vec<Arc<dyn Interception<S, A>>>,
}

impl<S: State, A: Action> Interceptions<S, A> {
    pub fn new() -> Self {
        Self { chain: Vec::new() }
    }

    pub fn builder() -> InterceptionsBuilder<S, A> {
        InterceptionsBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Debug names in chain order.
    pub fn names(&self) -> Vec<&str> {
        self.chain.iter().map(|i| i.debug_name()).collect()
    }

    /// Run the chain without a view model.
    ///
    /// Returns what the reducer would receive, `None` if the action was blocked.
    pub async fn run(
        &self,
        scope: &Scope,
        state: &S,
        action: A,
        dispatcher: &Dispatcher<A>,
    ) -> Option<A> {
        let tracer = Tracer::disabled();
        self.head(&tracer).run(scope, state, action, dispatcher).await
    }

    pub(crate) fn head<'a>(&'a self, tracer: &'a Tracer<S, A>) -> Next<'a, S, A> {
        Next {
            chain: &self.chain,
            tracer,
        }
    }
}

impl<S: State, A: Action> Default for Interceptions<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A> From<Vec<Arc<dyn Interception<S, A>>>> for Interceptions<S, A> {
    fn from(chain: Vec<Arc<dyn Interception<S, A>>>) -> Self {
        Self { chain }
    }
}

impl<S, A> Clone for Interceptions<S, A> {
    fn clone(&self) -> Self {
        Self {
            chain: self.chain.clone(),
        }
    }
}

impl<S, A> fmt::Debug for Interceptions<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.chain.iter().map(|i| i.debug_name()))
            .finish()
    }
}

/// Falls back to `default` when no explicit debug name was given.
fn name_or(name: impl Into<String>, default: &str) -> String {
    let name = name.into();
    if name.is_empty() {
        default.to_string()
    } else {
        name
    }
}
