//! Fluent construction of interception chains.

use std::future::Future;
use std::sync::Arc;

use futures::Stream;

use super::{
    Adapter, Command, Filter, Interception, Interceptions, LiveCommand, LiveReaction, Pipe,
    Reaction,
};
use crate::mvi::{Action, State};
use crate::viewmodel::Dispatcher;

type Matcher<A> = Arc<dyn Fn(&A) -> bool + Send + Sync>;

/// Builds an [`Interceptions`] chain in the order items are added.
pub struct InterceptionsBuilder<S, A> {
    chain: Vec<Arc<dyn Interception<S, A>>>,
}

impl<S: State, A: Action> InterceptionsBuilder<S, A> {
    pub fn new() -> Self {
        Self { chain: Vec::new() }
    }

    pub fn add(mut self, interception: impl Interception<S, A> + 'static) -> Self {
        self.chain.push(Arc::new(interception));
        self
    }

    pub fn add_shared(mut self, interception: Arc<dyn Interception<S, A>>) -> Self {
        self.chain.push(interception);
        self
    }

    /// Append every interception of an existing chain.
    pub fn extend(mut self, interceptions: Interceptions<S, A>) -> Self {
        self.chain.extend(interceptions.chain);
        self
    }

    pub fn adapter(
        self,
        name: impl Into<String>,
        adapt: impl Fn(&S, A) -> A + Send + Sync + 'static,
    ) -> Self {
        self.add(Adapter::new(name, adapt))
    }

    pub fn filter(
        self,
        name: impl Into<String>,
        predicate: impl Fn(&S, &A) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.add(Filter::new(name, predicate))
    }

    pub fn pipe(
        self,
        name: impl Into<String>,
        before: impl Fn(&S, &A) + Send + Sync + 'static,
        after: impl Fn(&S, Option<&A>) + Send + Sync + 'static,
    ) -> Self {
        self.add(Pipe::new(name).before(before).after(after))
    }

    pub fn before_pipe(
        self,
        name: impl Into<String>,
        before: impl Fn(&S, &A) + Send + Sync + 'static,
    ) -> Self {
        self.add(Pipe::new(name).before(before))
    }

    pub fn after_pipe(
        self,
        name: impl Into<String>,
        after: impl Fn(&S, Option<&A>) + Send + Sync + 'static,
    ) -> Self {
        self.add(Pipe::new(name).after(after))
    }

    pub fn command(
        self,
        name: impl Into<String>,
        react: impl Fn(&A) -> Reaction<S, A> + Send + Sync + 'static,
    ) -> Self {
        self.add(Command::new(name, react))
    }

    pub fn live_command(
        self,
        name: impl Into<String>,
        react: impl Fn(&A) -> LiveReaction<S, A> + Send + Sync + 'static,
    ) -> Self {
        self.add(LiveCommand::new(name, react))
    }

    /// Add interceptions that only act on actions accepted by `matcher`.
    ///
    /// ```
    /// # use statevm::interception::Interceptions;
    /// # use statevm::mvi::{Action, State};
    /// # #[derive(Debug, Clone, PartialEq)] struct Form { name: String }
    /// # impl State for Form {}
    /// # #[derive(Debug, Clone)] enum FormAction { Rename(String), Submit }
    /// # impl Action for FormAction {}
    /// let chain = Interceptions::<Form, FormAction>::builder()
    ///     .on(
    ///         |action| matches!(action, FormAction::Rename(_)),
    ///         |renames| renames.filter("non-empty", |_, action| {
    ///             !matches!(action, FormAction::Rename(name) if name.trim().is_empty())
    ///         }),
    ///     )
    ///     .build();
    /// ```
    pub fn on(
        mut self,
        matcher: impl Fn(&A) -> bool + Send + Sync + 'static,
        build: impl FnOnce(Targeted<S, A>) -> Targeted<S, A>,
    ) -> Self {
        let targeted = build(Targeted::new(Arc::new(matcher)));
        self.chain.extend(targeted.chain);
        self
    }

    pub fn build(self) -> Interceptions<S, A> {
        Interceptions::from(self.chain)
    }
}

impl<S: State, A: Action> Default for InterceptionsBuilder<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A> std::fmt::Debug for InterceptionsBuilder<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.chain.iter().map(|i| i.debug_name()))
            .finish()
    }
}

/// Interceptions restricted to the actions accepted by a matcher.
///
/// Actions not accepted by the matcher pass through untouched.
pub struct Targeted<S, A> {
    matcher: Matcher<A>,
    chain: Vec<Arc<dyn Interception<S, A>>>,
}

impl<S: State, A: Action> Targeted<S, A> {
    fn new(matcher: Matcher<A>) -> Self {
        Self {
            matcher,
            chain: Vec::new(),
        }
    }

    fn push(mut self, interception: impl Interception<S, A> + 'static) -> Self {
        self.chain.push(Arc::new(interception));
        self
    }

    pub fn adapter(
        self,
        name: impl Into<String>,
        adapt: impl Fn(&S, A) -> A + Send + Sync + 'static,
    ) -> Self {
        let matcher = Arc::clone(&self.matcher);
        self.push(Adapter::new(name, move |state, action| {
            if matcher(&action) {
                adapt(state, action)
            } else {
                action
            }
        }))
    }

    pub fn filter(
        self,
        name: impl Into<String>,
        predicate: impl Fn(&S, &A) -> bool + Send + Sync + 'static,
    ) -> Self {
        let matcher = Arc::clone(&self.matcher);
        self.push(Filter::new(name, move |state, action| {
            !matcher(action) || predicate(state, action)
        }))
    }

    /// Observe matching actions around the rest of the chain.
    ///
    /// `before` runs when the received action matches. `after` runs when the
    /// action returned by the rest of the chain matches, so it is skipped when
    /// a later interception blocks the action or rewrites it into one the
    /// matcher rejects.
    pub fn pipe(
        self,
        name: impl Into<String>,
        before: impl Fn(&S, &A) + Send + Sync + 'static,
        after: impl Fn(&S, Option<&A>) + Send + Sync + 'static,
    ) -> Self {
        let before_matcher = Arc::clone(&self.matcher);
        let after_matcher = Arc::clone(&self.matcher);
        let pipe = Pipe::new(name)
            .before(move |state, action| {
                if before_matcher(action) {
                    before(state, action);
                }
            })
            .after(move |state, action| {
                if action.is_some_and(|a| after_matcher(a)) {
                    after(state, action);
                }
            });
        self.push(pipe)
    }

    /// Consume matching actions: return `immediate` and run `effect`.
    pub fn consuming_command<F, Fut>(self, name: impl Into<String>, immediate: A, effect: F) -> Self
    where
        F: Fn(S, A, Dispatcher<A>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let matcher = Arc::clone(&self.matcher);
        let effect = Arc::new(effect);
        self.push(Command::new(name, move |action: &A| {
            if !matcher(action) {
                return Reaction::Ignoring;
            }
            let effect = Arc::clone(&effect);
            let action = action.clone();
            Reaction::consuming(immediate.clone(), move |state, dispatcher| {
                effect(state, action, dispatcher)
            })
        }))
    }

    /// Forward matching actions and run `effect`.
    pub fn forwarding_command<F, Fut>(self, name: impl Into<String>, effect: F) -> Self
    where
        F: Fn(S, A, Dispatcher<A>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let matcher = Arc::clone(&self.matcher);
        let effect = Arc::new(effect);
        self.push(Command::new(name, move |action: &A| {
            if !matcher(action) {
                return Reaction::Ignoring;
            }
            let effect = Arc::clone(&effect);
            let action = action.clone();
            Reaction::forwarding(move |state, dispatcher| effect(state, action, dispatcher))
        }))
    }

    /// Consume matching actions: return `immediate` and dispatch every item of `stream`.
    pub fn consuming_live_command<F, St>(
        self,
        name: impl Into<String>,
        immediate: A,
        stream: F,
    ) -> Self
    where
        F: Fn(S, A) -> St + Send + Sync + 'static,
        St: Stream<Item = A> + Send + 'static,
    {
        let matcher = Arc::clone(&self.matcher);
        let stream = Arc::new(stream);
        self.push(LiveCommand::new(name, move |action: &A| {
            if !matcher(action) {
                return LiveReaction::Ignoring;
            }
            let stream = Arc::clone(&stream);
            let action = action.clone();
            LiveReaction::consuming(immediate.clone(), move |state| stream(state, action))
        }))
    }

    /// Forward matching actions and dispatch every item of `stream`.
    pub fn forwarding_live_command<F, St>(self, name: impl Into<String>, stream: F) -> Self
    where
        F: Fn(S, A) -> St + Send + Sync + 'static,
        St: Stream<Item = A> + Send + 'static,
    {
        let matcher = Arc::clone(&self.matcher);
        let stream = Arc::new(stream);
        self.push(LiveCommand::new(name, move |action: &A| {
            if !matcher(action) {
                return LiveReaction::Ignoring;
            }
            let stream = Arc::clone(&stream);
            let action = action.clone();
            LiveReaction::forwarding(move |state| stream(state, action))
        }))
    }
}

impl<S, A> std::fmt::Debug for Targeted<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.chain.iter().map(|i| i.debug_name()))
            .finish()
    }
}
