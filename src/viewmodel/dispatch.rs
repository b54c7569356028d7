//! Action queue shared by a view model, its interceptions and its side effects.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::mvi::Action;

/// Entry of the action queue.
pub(crate) enum Envelope<A> {
    Action(A),
    /// Acknowledged once every entry queued before it was processed.
    Flush(oneshot::Sender<()>),
}

/// Creates a connected dispatcher and queue.
///
/// View models create their own queue. A standalone pair is handy to run
/// an [`Interceptions`](crate::interception::Interceptions) chain in tests and
/// collect what it dispatches.
pub fn channel<A: Action>(tag: impl Into<Arc<str>>) -> (Dispatcher<A>, DispatchQueue<A>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher {
        tag: tag.into(),
        sender,
        closed: Arc::new(AtomicBool::new(false)),
    };
    (dispatcher, DispatchQueue { receiver })
}

/// Cloneable, thread-safe handle enqueueing actions.
///
/// Dispatching never blocks and never fails. Once the owning view model is
/// cleared, dispatching becomes a no-op that logs a warning.
pub struct Dispatcher<A> {
    tag: Arc<str>,
    sender: mpsc::UnboundedSender<Envelope<A>>,
    closed: Arc<AtomicBool>,
}

impl<A: Action> Dispatcher<A> {
    pub fn dispatch(&self, action: A) {
        if self.is_closed() {
            tracing::warn!(tag = %self.tag, ?action, "unable to dispatch, queue is closed");
            return;
        }
        tracing::debug!(tag = %self.tag, ?action, "dispatching");
        if let Err(mpsc::error::SendError(envelope)) = self.sender.send(Envelope::Action(action)) {
            if let Envelope::Action(action) = envelope {
                tracing::warn!(tag = %self.tag, ?action, "unable to dispatch, queue is closed");
            }
        }
    }

    /// Whether dispatched actions are dropped.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst) || self.sender.is_closed()
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Enqueues a flush marker. `None` when the queue is closed.
    pub(crate) fn flush(&self) -> Option<oneshot::Receiver<()>> {
        if self.is_closed() {
            return None;
        }
        let (ack, done) = oneshot::channel();
        self.sender.send(Envelope::Flush(ack)).ok()?;
        Some(done)
    }

    pub(crate) fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

impl<A> Clone for Dispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            tag: Arc::clone(&self.tag),
            sender: self.sender.clone(),
            closed: Arc::clone(&self.closed),
        }
    }
}

impl<A> std::fmt::Debug for Dispatcher<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("tag", &self.tag)
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Receiving end of the action queue, drained in FIFO order.
pub struct DispatchQueue<A> {
    receiver: mpsc::UnboundedReceiver<Envelope<A>>,
}

impl<A> DispatchQueue<A> {
    /// Next dispatched action, `None` once every dispatcher is gone.
    pub async fn recv(&mut self) -> Option<A> {
        loop {
            match self.receiver.recv().await? {
                Envelope::Action(action) => return Some(action),
                Envelope::Flush(ack) => {
                    let _ = ack.send(());
                }
            }
        }
    }

    /// Next action if one is already queued.
    pub fn try_recv(&mut self) -> Option<A> {
        loop {
            match self.receiver.try_recv().ok()? {
                Envelope::Action(action) => return Some(action),
                Envelope::Flush(ack) => {
                    let _ = ack.send(());
                }
            }
        }
    }

    pub(crate) async fn next_envelope(&mut self) -> Option<Envelope<A>> {
        self.receiver.recv().await
    }
}

impl<A> std::fmt::Debug for DispatchQueue<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchQueue").finish_non_exhaustive()
    }
}
