use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{self, BoxStream};
use futures::{Stream, StreamExt};
use tokio::sync::watch;

use crate::mvi::State;

/// Published states of a view model.
///
/// Yields the current state first, then every state published afterwards.
/// Slow consumers only see the latest state, and never the same state
/// twice in a row. Ends when the view model's actor stops.
pub struct StateStream<S> {
    current: watch::Receiver<S>,
    inner: BoxStream<'static, S>,
}

impl<S: State> StateStream<S> {
    pub(crate) fn new(receiver: watch::Receiver<S>) -> Self {
        let current = receiver.clone();
        let inner = stream::unfold((receiver, None::<S>), |(mut receiver, last)| async move {
            loop {
                if last.is_some() {
                    receiver.changed().await.ok()?;
                }
                let value = receiver.borrow_and_update().clone();
                if last.as_ref() != Some(&value) {
                    return Some((value.clone(), (receiver, Some(value))));
                }
            }
        });
        Self {
            current,
            inner: inner.boxed(),
        }
    }

    /// Latest published state, without consuming the stream.
    pub fn current(&self) -> S {
        self.current.borrow().clone()
    }
}

impl<S> Stream for StateStream<S> {
    type Item = S;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<S>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl<S> std::fmt::Debug for StateStream<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStream").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Light(bool);
    impl State for Light {}

    #[tokio::test]
    async fn replays_the_current_state() {
        let (_tx, rx) = watch::channel(Light(true));
        let mut states = StateStream::new(rx);
        assert_eq!(states.next().await, Some(Light(true)));
    }

    #[tokio::test]
    async fn ends_when_the_publisher_is_gone() {
        let (tx, rx) = watch::channel(Light(false));
        let mut states = StateStream::new(rx);
        tx.send_replace(Light(true));
        drop(tx);

        assert_eq!(states.next().await, Some(Light(true)));
        assert_eq!(states.next().await, None);
        assert_eq!(states.current(), Light(true));
    }

    #[tokio::test]
    async fn skips_republished_equal_states() {
        let (tx, rx) = watch::channel(Light(false));
        let mut states = StateStream::new(rx);
        assert_eq!(states.next().await, Some(Light(false)));

        tx.send_replace(Light(true));
        tx.send_replace(Light(false));
        tx.send_replace(Light(true));
        assert_eq!(states.next().await, Some(Light(true)));
    }
}
