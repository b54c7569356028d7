//! View model: serialized action processing and observable state.
//!
//! A [`ViewModel`] owns the current state of a feature. Actions dispatched
//! to it are queued and processed one at a time by a single actor task:
//! the action runs through the [`Interceptions`] chain, the reducer computes
//! the next state and the state is published when it changed.

mod dispatch;
mod scope;
mod state_stream;

use std::any::type_name;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::{FutureExt, Stream, StreamExt};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};

use crate::config::EngineSettings;
use crate::debug::{DebugConfig, Event, Tracer};
use crate::error::EngineError;
use crate::interception::Interceptions;
use crate::mvi::{Action, Reducer, State};

use dispatch::Envelope;

pub use dispatch::{channel, DispatchQueue, Dispatcher};
pub use scope::Scope;
pub use state_stream::StateStream;

/// Holds the state of a feature and processes the actions dispatched to it.
///
/// Dropping the view model clears it.
pub struct ViewModel<S: State, A: Action> {
    tag: Arc<str>,
    dispatcher: Dispatcher<A>,
    state: watch::Receiver<S>,
    scope: Scope,
    tracer: Tracer<S, A>,
    actor: Mutex<Option<JoinHandle<()>>>,
    cleared: Arc<AtomicBool>,
}

impl<S: State, A: Action> ViewModel<S, A> {
    pub fn builder(
        initial_state: S,
        reducer: impl Reducer<S, A>,
    ) -> ViewModelBuilder<S, A> {
        ViewModelBuilder::new(initial_state, reducer)
    }

    /// Identifier of this view model in logs and trace events.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Queue an action. Never blocks, and is a no-op once cleared.
    pub fn dispatch(&self, action: A) {
        self.dispatcher.dispatch(action);
    }

    pub fn dispatcher(&self) -> Dispatcher<A> {
        self.dispatcher.clone()
    }

    /// Latest published state.
    pub fn state(&self) -> S {
        self.state.borrow().clone()
    }

    /// Stream of published states, starting with the current one.
    pub fn subscribe(&self) -> StateStream<S> {
        StateStream::new(self.state.clone())
    }

    /// Resolves once every action dispatched before this call was processed.
    ///
    /// Returns immediately when the view model is cleared.
    pub async fn flush(&self) {
        if let Some(done) = self.dispatcher.flush() {
            // An error means the actor stopped, which also ends the wait.
            let _ = done.await;
        }
    }

    /// Scope that side effects of this view model are launched on.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Dispatch `map(item)` for every item of `source`.
    ///
    /// The source is polled on the view model's scope until it ends, the
    /// handle is removed or the view model is cleared.
    pub fn add_state_source<T, St, F>(&self, source: St, map: F) -> SourceHandle
    where
        T: Send + 'static,
        St: Stream<Item = T> + Send + 'static,
        F: Fn(T) -> A + Send + 'static,
    {
        let dispatcher = self.dispatcher.clone();
        let abort = self.scope.spawn_tracked("state source", async move {
            let mut source = std::pin::pin!(source);
            while let Some(item) = source.next().await {
                if dispatcher.is_closed() {
                    break;
                }
                dispatcher.dispatch(map(item));
            }
            Ok(())
        });
        SourceHandle { abort }
    }

    /// Send a [`Event::Message`] to the debug plugins.
    pub fn trace_message(&self, message: impl Into<String>) {
        self.tracer.emit(|| Event::Message(message.into()));
    }

    /// Send a [`Event::Custom`] to the debug plugins.
    pub fn trace_custom(&self, data: impl fmt::Debug + Send + Sync + 'static) {
        self.tracer.emit(|| Event::Custom(Arc::new(data)));
    }

    /// Tear the view model down.
    ///
    /// Cancels every side effect, stops the actor and discards queued
    /// actions. Later dispatches are dropped with a warning.
    pub fn clear(&self) {
        if self.cleared.swap(true, Ordering::SeqCst) {
            return;
        }
        self.dispatcher.close();
        self.scope.cancel();
        if let Some(actor) = self.actor.lock().take() {
            actor.abort();
        }
        self.tracer.emit(|| Event::Cleared);
        tracing::info!(tag = %self.tag, "view model cleared");
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared.load(Ordering::SeqCst)
    }
}

impl<S: State, A: Action> Drop for ViewModel<S, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<S: State, A: Action> fmt::Debug for ViewModel<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewModel")
            .field("tag", &self.tag)
            .field("state", &*self.state.borrow())
            .field("cleared", &self.is_cleared())
            .finish_non_exhaustive()
    }
}

/// Handle of a source added with [`ViewModel::add_state_source`].
#[derive(Debug)]
pub struct SourceHandle {
    abort: Option<AbortHandle>,
}

impl SourceHandle {
    /// Stop forwarding items of the source.
    pub fn remove(&self) {
        if let Some(abort) = &self.abort {
            abort.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        self.abort.as_ref().is_some_and(|abort| !abort.is_finished())
    }
}

/// Configures and starts a [`ViewModel`].
pub struct ViewModelBuilder<S: State, A: Action> {
    initial_state: S,
    reducer: Arc<dyn Reducer<S, A>>,
    interceptions: Interceptions<S, A>,
    tag: Option<String>,
    runtime: Option<Handle>,
    effect_runtime: Option<Handle>,
    debug: Option<DebugConfig<S, A>>,
    settings: EngineSettings,
}

impl<S: State, A: Action> ViewModelBuilder<S, A> {
    fn new(initial_state: S, reducer: impl Reducer<S, A>) -> Self {
        Self {
            initial_state,
            reducer: Arc::new(reducer),
            interceptions: Interceptions::new(),
            tag: None,
            runtime: None,
            effect_runtime: None,
            debug: None,
            settings: EngineSettings::default(),
        }
    }

    pub fn interceptions(mut self, interceptions: Interceptions<S, A>) -> Self {
        self.interceptions = interceptions;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Runtime the actor task runs on. Defaults to the ambient runtime.
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Runtime side effects are launched on. Defaults to [`runtime`](Self::runtime).
    pub fn effect_runtime(mut self, runtime: Handle) -> Self {
        self.effect_runtime = Some(runtime);
        self
    }

    pub fn debug(mut self, debug: DebugConfig<S, A>) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Apply loaded settings.
    ///
    /// An explicit [`tag`](Self::tag) or [`debug`](Self::debug) takes
    /// precedence over the settings.
    pub fn settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Spawn the actor and return the running view model.
    ///
    /// Fails when no runtime was given and none is running.
    pub fn build(self) -> Result<ViewModel<S, A>, EngineError> {
        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current()?,
        };
        let effect_runtime = self.effect_runtime.unwrap_or_else(|| runtime.clone());

        let tag: Arc<str> = match self.tag.or(self.settings.tag.clone()) {
            Some(tag) => Arc::from(tag),
            None => default_tag::<S>(),
        };

        let mut debug = match self.debug {
            Some(debug) => debug,
            None if self.settings.debug => DebugConfig::logging(),
            None => DebugConfig::disabled(),
        };
        if !self.settings.trace_interceptions {
            debug = debug.trace_interceptions(false);
        }
        let tracer = Tracer::new(Arc::clone(&tag), debug);

        let failures = tracer.clone();
        let scope = Scope::with_failure_hook(Arc::clone(&tag), effect_runtime, move |message| {
            failures.emit(|| Event::Message(message.to_owned()));
        });

        let (dispatcher, queue) = channel(Arc::clone(&tag));
        let (publisher, state) = watch::channel(self.initial_state.clone());
        let cleared = Arc::new(AtomicBool::new(false));

        let actor = Actor {
            tag: Arc::clone(&tag),
            reducer: self.reducer,
            interceptions: self.interceptions,
            scope: scope.clone(),
            dispatcher: dispatcher.clone(),
            tracer: tracer.clone(),
            publisher,
            cleared: Arc::clone(&cleared),
        };
        let handle = runtime.spawn(actor.run(queue));

        tracing::info!(tag = %tag, "view model created");
        let initial_state = self.initial_state;
        tracer.emit(|| Event::Created { initial_state });

        Ok(ViewModel {
            tag,
            dispatcher,
            state,
            scope,
            tracer,
            actor: Mutex::new(Some(handle)),
            cleared,
        })
    }
}

impl<S: State, A: Action> fmt::Debug for ViewModelBuilder<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewModelBuilder")
            .field("initial_state", &self.initial_state)
            .field("interceptions", &self.interceptions)
            .field("tag", &self.tag)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

/// `Counter-1a2b3c4d` for a state type named `Counter`.
fn default_tag<S>() -> Arc<str> {
    let full = type_name::<S>();
    let base = full.split('<').next().unwrap_or(full);
    let name = base.rsplit("::").next().unwrap_or(base);
    let id = uuid::Uuid::new_v4().simple().to_string();
    Arc::from(format!("{name}-{}", &id[..8]))
}

/// Single consumer of the action queue.
struct Actor<S: State, A: Action> {
    tag: Arc<str>,
    reducer: Arc<dyn Reducer<S, A>>,
    interceptions: Interceptions<S, A>,
    scope: Scope,
    dispatcher: Dispatcher<A>,
    tracer: Tracer<S, A>,
    publisher: watch::Sender<S>,
    cleared: Arc<AtomicBool>,
}

impl<S: State, A: Action> Actor<S, A> {
    async fn run(self, mut queue: DispatchQueue<A>) {
        // Dropped with the task, including when the reducer panics.
        let _teardown = Teardown {
            tag: Arc::clone(&self.tag),
            scope: self.scope.clone(),
            dispatcher: self.dispatcher.clone(),
            tracer: self.tracer.clone(),
            cleared: Arc::clone(&self.cleared),
        };
        while let Some(envelope) = queue.next_envelope().await {
            match envelope {
                Envelope::Action(action) => self.process(action).await,
                Envelope::Flush(ack) => {
                    let _ = ack.send(());
                }
            }
        }
        tracing::debug!(tag = %self.tag, "action queue closed");
    }

    async fn process(&self, action: A) {
        tracing::debug!(tag = %self.tag, ?action, "processing");
        self.tracer.emit(|| Event::Action(action.clone()));

        let current = self.publisher.borrow().clone();
        let chain = self.interceptions.head(&self.tracer).run(
            &self.scope,
            &current,
            action,
            &self.dispatcher,
        );

        let action = match AssertUnwindSafe(chain).catch_unwind().await {
            Ok(Some(action)) => action,
            Ok(None) => {
                tracing::debug!(tag = %self.tag, "action blocked");
                return;
            }
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                tracing::warn!(tag = %self.tag, %reason, "interception panicked, action dropped");
                self.tracer
                    .emit(|| Event::Message(format!("interception panicked: {reason}")));
                return;
            }
        };

        let Some(updated) = self.reducer.reduce(&current, &action) else {
            return;
        };
        if updated == current {
            return;
        }
        self.publisher.send_replace(updated.clone());
        tracing::debug!(tag = %self.tag, ?action, "state updated");
        self.tracer.emit(|| Event::Update {
            previous: current,
            updated,
        });
    }
}

/// Clears the view model when its actor stops on its own.
///
/// A no-op after [`ViewModel::clear`], which marks the view model cleared
/// before aborting the actor.
struct Teardown<S: State, A: Action> {
    tag: Arc<str>,
    scope: Scope,
    dispatcher: Dispatcher<A>,
    tracer: Tracer<S, A>,
    cleared: Arc<AtomicBool>,
}

impl<S: State, A: Action> Drop for Teardown<S, A> {
    fn drop(&mut self) {
        if self.cleared.swap(true, Ordering::SeqCst) {
            return;
        }
        self.dispatcher.close();
        self.scope.cancel();
        self.tracer.emit(|| Event::Cleared);
        tracing::error!(tag = %self.tag, "actor stopped unexpectedly, view model cleared");
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Counter(i32);
    impl State for Counter {}

    #[derive(Debug, Clone)]
    struct Add(i32);
    impl Action for Add {}

    #[test]
    fn default_tag_uses_the_state_type_name() {
        let tag = default_tag::<Counter>();
        assert!(tag.starts_with("Counter-"), "unexpected tag: {tag}");
        assert_eq!(tag.len(), "Counter-".len() + 8);
    }

    #[test]
    fn panic_message_reads_common_payloads() {
        let boxed: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");
        let boxed: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(boxed.as_ref()), "bang");
        let boxed: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic");
    }

    #[test]
    fn build_without_runtime_fails() {
        let result = ViewModel::builder(Counter(0), |c: &Counter, a: &Add| Some(Counter(c.0 + a.0))).build();
        assert!(matches!(result, Err(EngineError::NoRuntime(_))));
    }

    #[tokio::test]
    async fn build_on_explicit_runtime() {
        let vm = ViewModel::builder(Counter(0), |c: &Counter, a: &Add| Some(Counter(c.0 + a.0)))
            .runtime(Handle::current())
            .tag("explicit")
            .build()
            .expect("runtime is running");

        vm.dispatch(Add(2));
        vm.flush().await;

        assert_eq!(vm.tag(), "explicit");
        assert_eq!(vm.state(), Counter(2));
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let vm = ViewModel::builder(Counter(0), |c: &Counter, a: &Add| Some(Counter(c.0 + a.0)))
            .build()
            .expect("runtime is running");

        vm.clear();
        vm.clear();
        vm.dispatch(Add(1));
        vm.flush().await;

        assert!(vm.is_cleared());
        assert!(vm.scope().is_cancelled());
        assert_eq!(vm.state(), Counter(0));
    }
}
