//! Decisions returned by [`Command`](super::Command) and [`LiveCommand`](super::LiveCommand).

use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;
use futures::stream::BoxStream;
use futures::{FutureExt, Stream, StreamExt};

use crate::viewmodel::Dispatcher;

/// One-shot side effect. Receives the state at dispatch time and a
/// dispatcher to report results through.
pub type Effect<S, A> =
    Box<dyn FnOnce(S, Dispatcher<A>) -> BoxFuture<'static, anyhow::Result<()>> + Send>;

/// Live side effect producing actions over time.
pub type LiveEffect<S, A> = Box<dyn FnOnce(S) -> BoxStream<'static, A> + Send>;

/// Reaction of a [`Command`](super::Command) to a received action.
pub enum Reaction<S, A> {
    /// Return `immediate` right away instead of forwarding, e.g. to show a
    /// pending state, and run `effect` asynchronously.
    Consuming { immediate: A, effect: Effect<S, A> },
    /// Forward the received action and run the effect asynchronously.
    Forwarding(Effect<S, A>),
    /// Simply forward the received action.
    Ignoring,
}

impl<S, A> Reaction<S, A> {
    pub fn consuming<F, Fut>(immediate: A, effect: F) -> Self
    where
        F: FnOnce(S, Dispatcher<A>) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Reaction::Consuming {
            immediate,
            effect: Box::new(move |state, dispatcher| FutureExt::boxed(effect(state, dispatcher))),
        }
    }

    pub fn forwarding<F, Fut>(effect: F) -> Self
    where
        F: FnOnce(S, Dispatcher<A>) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Reaction::Forwarding(Box::new(move |state, dispatcher| {
            FutureExt::boxed(effect(state, dispatcher))
        }))
    }
}

impl<S, A: fmt::Debug> fmt::Debug for Reaction<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reaction::Consuming { immediate, .. } => f
                .debug_struct("Consuming")
                .field("immediate", immediate)
                .finish_non_exhaustive(),
            Reaction::Forwarding(_) => f.write_str("Forwarding"),
            Reaction::Ignoring => f.write_str("Ignoring"),
        }
    }
}

/// Reaction of a [`LiveCommand`](super::LiveCommand) to a received action.
///
/// Same shape as [`Reaction`], but the side effect is a stream whose items
/// are dispatched one by one as they are produced.
pub enum LiveReaction<S, A> {
    Consuming { immediate: A, stream: LiveEffect<S, A> },
    Forwarding(LiveEffect<S, A>),
    Ignoring,
}

impl<S, A> LiveReaction<S, A> {
    pub fn consuming<F, St>(immediate: A, stream: F) -> Self
    where
        F: FnOnce(S) -> St + Send + 'static,
        St: Stream<Item = A> + Send + 'static,
    {
        LiveReaction::Consuming {
            immediate,
            stream: Box::new(move |state| StreamExt::boxed(stream(state))),
        }
    }

    pub fn forwarding<F, St>(stream: F) -> Self
    where
        F: FnOnce(S) -> St + Send + 'static,
        St: Stream<Item = A> + Send + 'static,
    {
        LiveReaction::Forwarding(Box::new(move |state| StreamExt::boxed(stream(state))))
    }
}

impl<S, A: fmt::Debug> fmt::Debug for LiveReaction<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiveReaction::Consuming { immediate, .. } => f
                .debug_struct("Consuming")
                .field("immediate", immediate)
                .finish_non_exhaustive(),
            LiveReaction::Forwarding(_) => f.write_str("Forwarding"),
            LiveReaction::Ignoring => f.write_str("Ignoring"),
        }
    }
}
