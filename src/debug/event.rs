//! Trace events emitted by a view model while debugging is enabled.

use std::fmt::{self, Debug};
use std::sync::Arc;

/// How far an action travelled through a single interception.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The interception received the action.
    Received,
    /// The interception returned an action back up the chain.
    Forwarded,
    /// The interception returned nothing, so the reducer is skipped.
    Blocked,
}

/// Discriminant of an [`Event`], useful as a log tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Created,
    Cleared,
    Action,
    Update,
    Interception,
    Message,
    Custom,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Created => "Created",
            EventKind::Cleared => "Cleared",
            EventKind::Action => "Action",
            EventKind::Update => "Update",
            EventKind::Interception => "Interception",
            EventKind::Message => "Message",
            EventKind::Custom => "Custom",
        };
        f.write_str(name)
    }
}

/// Events a [`Plugin`](super::Plugin) can observe.
///
/// Every event is delivered together with the identifier of the view model
/// that produced it.
#[derive(Debug, Clone)]
pub enum Event<S, A> {
    /// The view model was created with this initial state.
    Created { initial_state: S },
    /// The view model was cleared. Its effects are cancelled.
    Cleared,
    /// An action was dequeued for processing.
    Action(A),
    /// The reducer produced a new, distinct state.
    Update { previous: S, updated: S },
    /// An action passed through one interception.
    Interception {
        name: String,
        stage: Stage,
        state: S,
        action: Option<A>,
    },
    /// Free-form message, also used to report failed side effects.
    Message(String),
    /// Arbitrary data sent through [`ViewModel::trace_custom`](crate::viewmodel::ViewModel::trace_custom).
    Custom(Arc<dyn Debug + Send + Sync>),
}

impl<S, A> Event<S, A> {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Created { .. } => EventKind::Created,
            Event::Cleared => EventKind::Cleared,
            Event::Action(_) => EventKind::Action,
            Event::Update { .. } => EventKind::Update,
            Event::Interception { .. } => EventKind::Interception,
            Event::Message(_) => EventKind::Message,
            Event::Custom(_) => EventKind::Custom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        let event: Event<u8, u8> = Event::Update {
            previous: 0,
            updated: 1,
        };
        assert_eq!(event.kind(), EventKind::Update);
        assert_eq!(event.kind().to_string(), "Update");

        let custom: Event<u8, u8> = Event::Custom(Arc::new("payload"));
        assert_eq!(custom.kind(), EventKind::Custom);
    }
}
