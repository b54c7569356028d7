//! One-shot events carried inside a view state.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// An event for the view, such as a navigation request or a toast, stored
/// in a state so it survives until the view handles it.
///
/// Clones share the handled flag. Two separately created events are never
/// equal, even with equal payloads, so a state carrying a new event is
/// always published.
pub struct ViewEvent<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    value: T,
    handled: AtomicBool,
}

impl<T> ViewEvent<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value,
                handled: AtomicBool::new(false),
            }),
        }
    }

    /// Show the payload to `handle` unless already handled.
    ///
    /// The event is marked handled when `handle` returns `true`.
    pub fn peek(&self, handle: impl FnOnce(&T) -> bool) {
        if self.is_handled() {
            return;
        }
        if handle(&self.inner.value) {
            self.inner.handled.store(true, Ordering::SeqCst);
        }
    }

    pub fn is_handled(&self) -> bool {
        self.inner.handled.load(Ordering::SeqCst)
    }
}

impl<T: Clone> ViewEvent<T> {
    /// The payload the first time it is taken, `None` afterwards.
    pub fn take(&self) -> Option<T> {
        if self.inner.handled.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(self.inner.value.clone())
        }
    }
}

impl<T> Clone for ViewEvent<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for ViewEvent<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Eq for ViewEvent<T> {}

impl<T: fmt::Debug> fmt::Debug for ViewEvent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewEvent")
            .field("value", &self.inner.value)
            .field("handled", &self.is_handled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_payloads_are_distinct_events() {
        let first = ViewEvent::new("saved");
        let second = ViewEvent::new("saved");
        assert_ne!(first, second);
        assert_eq!(first, first.clone());
    }

    #[test]
    fn take_yields_once_across_clones() {
        let event = ViewEvent::new(3);
        let shared = event.clone();
        assert_eq!(event.take(), Some(3));
        assert_eq!(shared.take(), None);
        assert!(shared.is_handled());
    }

    #[test]
    fn peek_marks_handled_only_when_accepted() {
        let event = ViewEvent::new("toast");
        event.peek(|_| false);
        assert!(!event.is_handled());

        event.peek(|_| true);
        assert!(event.is_handled());

        let mut seen = false;
        event.peek(|_| {
            seen = true;
            true
        });
        assert!(!seen);
    }
}
