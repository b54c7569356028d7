//! Values paired with the status of the operation producing them.

use std::fmt;
use std::sync::Arc;

/// Status of an asynchronous operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    Pending,
    Error,
}

/// Why a [`Resource`] is in error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ErrorKind {
    #[default]
    Unspecified,
    /// Error described by its message.
    Message(Arc<str>),
}

impl ErrorKind {
    pub fn message(message: impl fmt::Display) -> Self {
        ErrorKind::Message(Arc::from(message.to_string()))
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Unspecified => f.write_str("unspecified error"),
            ErrorKind::Message(message) => f.write_str(message),
        }
    }
}

/// A value together with the status of the load producing it.
///
/// Every variant carries a value, so a state can keep showing stale data
/// while a reload is pending or after it failed.
///
/// ```
/// use statevm::resource::{Resource, Status};
///
/// let loaded: Resource<Vec<u32>> = Resource::attempt(Vec::new(), || Ok::<_, std::io::Error>(vec![1, 2]));
/// assert_eq!(loaded.status(), Status::Success);
/// assert_eq!(loaded.map(|v| v.len()).into_value(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Resource<T> {
    Success(T),
    Pending(T),
    Error(T, ErrorKind),
}

impl<T> Resource<T> {
    pub fn status(&self) -> Status {
        match self {
            Resource::Success(_) => Status::Success,
            Resource::Pending(_) => Status::Pending,
            Resource::Error(..) => Status::Error,
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Resource::Success(value) | Resource::Pending(value) | Resource::Error(value, _) => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Resource::Success(value) | Resource::Pending(value) | Resource::Error(value, _) => value,
        }
    }

    /// Kind of the error, if this is [`Resource::Error`].
    pub fn error(&self) -> Option<&ErrorKind> {
        match self {
            Resource::Error(_, kind) => Some(kind),
            _ => None,
        }
    }

    /// Transform the value, keeping the status.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resource<U> {
        match self {
            Resource::Success(value) => Resource::Success(f(value)),
            Resource::Pending(value) => Resource::Pending(f(value)),
            Resource::Error(value, kind) => Resource::Error(f(value), kind),
        }
    }

    /// `Success` with the produced value, or `Error` with `fallback` on failure.
    pub fn attempt<E: fmt::Display>(fallback: T, f: impl FnOnce() -> Result<T, E>) -> Self {
        match f() {
            Ok(value) => Resource::Success(value),
            Err(err) => Resource::Error(fallback, ErrorKind::message(err)),
        }
    }

    pub fn on_success(&self, f: impl FnOnce(&T)) -> &Self {
        if let Resource::Success(value) = self {
            f(value);
        }
        self
    }

    pub fn on_pending(&self, f: impl FnOnce(&T)) -> &Self {
        if let Resource::Pending(value) = self {
            f(value);
        }
        self
    }

    pub fn on_error(&self, f: impl FnOnce(&T, &ErrorKind)) -> &Self {
        if let Resource::Error(value, kind) = self {
            f(value, kind);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn failed_attempt_keeps_the_fallback() {
        let resource = Resource::attempt(0_u32, || "x".parse::<u32>());

        assert_eq!(resource.status(), Status::Error);
        assert_eq!(*resource.value(), 0);
        assert!(matches!(resource.error(), Some(ErrorKind::Message(_))));
    }

    #[test]
    fn map_keeps_the_error_kind() {
        let resource = Resource::Error("stale", ErrorKind::Unspecified).map(str::len);
        assert_eq!(resource, Resource::Error(5, ErrorKind::Unspecified));
    }

    #[test]
    fn callbacks_only_run_for_their_status() {
        let hits = Cell::new(0);
        Resource::Pending(1)
            .on_success(|_| hits.set(hits.get() + 10))
            .on_pending(|v| hits.set(hits.get() + v))
            .on_error(|_, _| hits.set(hits.get() + 100));
        assert_eq!(hits.get(), 1);
    }
}
