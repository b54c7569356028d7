//! Lifetime scope for side effects launched by interceptions.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::{AbortHandle, JoinSet};

type FailureHook = Box<dyn Fn(&str) + Send + Sync>;

/// Structured-concurrency scope bound to a view model.
///
/// Every task launched through the scope is aborted when the scope is
/// cancelled, which happens when the owning view model is cleared.
/// Cancellation is cooperative: tasks are aborted at their next await
/// point, and long-running loops may also poll [`is_cancelled`](Self::is_cancelled).
#[derive(Clone)]
pub struct Scope {
    inner: Arc<ScopeInner>,
}

struct ScopeInner {
    tag: Arc<str>,
    runtime: Handle,
    cancelled: AtomicBool,
    notify: Notify,
    tasks: Mutex<JoinSet<()>>,
    on_failure: Option<FailureHook>,
}

impl Scope {
    /// Scope launching its tasks on the ambient tokio runtime.
    ///
    /// # Panics
    /// Panics when called outside of a tokio runtime.
    pub fn new(tag: impl Into<Arc<str>>) -> Self {
        Self::with_runtime(tag, Handle::current())
    }

    pub fn with_runtime(tag: impl Into<Arc<str>>, runtime: Handle) -> Self {
        Self::build(tag.into(), runtime, None)
    }

    /// Scope reporting failed tasks to `on_failure` in addition to the log.
    pub(crate) fn with_failure_hook(
        tag: Arc<str>,
        runtime: Handle,
        on_failure: impl Fn(&str) + Send + Sync + 'static,
    ) -> Self {
        Self::build(tag, runtime, Some(Box::new(on_failure)))
    }

    fn build(tag: Arc<str>, runtime: Handle, on_failure: Option<FailureHook>) -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                tag,
                runtime,
                cancelled: AtomicBool::new(false),
                notify: Notify::new(),
                tasks: Mutex::new(JoinSet::new()),
                on_failure,
            }),
        }
    }

    /// Launch a side effect bound to this scope.
    ///
    /// Errors returned by the effect are logged and otherwise swallowed.
    /// Launching on a cancelled scope does nothing.
    pub fn launch<F>(&self, name: &str, effect: F)
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        // The abort handle is only needed by state sources.
        let _ = self.spawn_tracked(name, effect);
    }

    pub(crate) fn spawn_tracked<F>(&self, name: &str, effect: F) -> Option<AbortHandle>
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        // cancel() sets the flag before taking this lock, so a task spawned
        // while the flag is clear is always seen by its abort_all().
        let mut tasks = self.inner.tasks.lock();
        if self.is_cancelled() {
            tracing::debug!(tag = %self.inner.tag, effect = name, "scope cancelled, effect not launched");
            return None;
        }

        let inner = Arc::clone(&self.inner);
        let name = name.to_owned();
        let task = async move {
            match AssertUnwindSafe(effect).catch_unwind().await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    tracing::warn!(tag = %inner.tag, effect = %name, error = %err, "side effect failed");
                    inner.report(&format!("side effect '{name}' failed: {err:#}"));
                }
                Err(_) => {
                    tracing::warn!(tag = %inner.tag, effect = %name, "side effect panicked");
                    inner.report(&format!("side effect '{name}' panicked"));
                }
            }
        };

        reap(&mut tasks);
        Some(tasks.spawn_on(task, &self.inner.runtime))
    }

    /// Check if the scope was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once the scope is cancelled.
    pub async fn cancelled(&self) {
        // Register interest before checking the flag, so a cancel() racing
        // with this call cannot be missed.
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }

    /// Cancel the scope and abort every task it launched.
    ///
    /// Returns `false` if the scope was already cancelled.
    pub fn cancel(&self) -> bool {
        if self.inner.cancelled.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.inner.notify.notify_waiters();
        let mut tasks = self.inner.tasks.lock();
        tasks.abort_all();
        tracing::debug!(tag = %self.inner.tag, "scope cancelled");
        true
    }

    /// Number of launched tasks that have not been reaped yet.
    pub fn pending_tasks(&self) -> usize {
        let mut tasks = self.inner.tasks.lock();
        reap(&mut tasks);
        tasks.len()
    }
}

/// Drops finished tasks so the join set does not grow unbounded.
fn reap(tasks: &mut JoinSet<()>) {
    while tasks.try_join_next().is_some() {}
}

impl ScopeInner {
    fn report(&self, message: &str) {
        if let Some(hook) = &self.on_failure {
            hook(message);
        }
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("tag", &self.inner.tag)
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}
