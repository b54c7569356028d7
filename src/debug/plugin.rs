//! Plugins observing trace events, and the default logging plugin.

use std::fmt::Debug;
use std::sync::Arc;

use super::event::{Event, Stage};

/// Observer of [`Event`]s emitted by a view model.
///
/// Plugins only look at events. They cannot modify or block the
/// processing of actions.
pub trait Plugin<S, A>: Send + Sync {
    /// Name used to identify the plugin in logs.
    fn name(&self) -> &str {
        "plugin"
    }

    /// Called for every event while debugging is enabled.
    ///
    /// `dispatcher` is the tag of the view model emitting the event.
    fn on_event(&self, dispatcher: &str, event: &Event<S, A>);
}

/// Turns an [`Event`] into a log message.
pub trait EventFormatter<S, A>: Send + Sync {
    fn format(&self, event: &Event<S, A>) -> String;
}

impl<S, A, F> EventFormatter<S, A> for F
where
    F: Fn(&Event<S, A>) -> String + Send + Sync,
{
    fn format(&self, event: &Event<S, A>) -> String {
        self(event)
    }
}

/// Formatter producing one human readable line per event.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormatter;

impl<S: Debug, A: Debug> EventFormatter<S, A> for DefaultFormatter {
    fn format(&self, event: &Event<S, A>) -> String {
        match event {
            Event::Created { initial_state } => format!("created, initial state: {initial_state:?}"),
            Event::Cleared => "cleared, effects cancelled".to_string(),
            Event::Action(action) => format!("processing {action:?}"),
            Event::Update { previous, updated } => {
                format!("state updated: {previous:?} -> {updated:?}")
            }
            Event::Interception {
                name,
                stage,
                state,
                action,
            } => match (stage, action) {
                (Stage::Received, Some(action)) => {
                    format!("{name} received {action:?} (state: {state:?})")
                }
                (Stage::Forwarded, Some(action)) => format!("{name} returned {action:?}"),
                _ => format!("{name} blocked the action"),
            },
            Event::Message(message) => format!("message: {message}"),
            Event::Custom(data) => format!("{data:?}"),
        }
    }
}

/// Plugin writing every event to `tracing` at debug level.
///
/// Events are logged under the `statevm::trace` target, so they can be
/// filtered separately from the engine's own diagnostics.
pub struct LoggerPlugin<S, A> {
    formatter: Arc<dyn EventFormatter<S, A>>,
}

impl<S: Debug + 'static, A: Debug + 'static> LoggerPlugin<S, A> {
    pub fn new() -> Self {
        Self::with_formatter(DefaultFormatter)
    }
}

impl<S: Debug + 'static, A: Debug + 'static> Default for LoggerPlugin<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A> LoggerPlugin<S, A> {
    pub fn with_formatter(formatter: impl EventFormatter<S, A> + 'static) -> Self {
        Self {
            formatter: Arc::new(formatter),
        }
    }
}

impl<S, A> Plugin<S, A> for LoggerPlugin<S, A> {
    fn name(&self) -> &str {
        "logger"
    }

    fn on_event(&self, dispatcher: &str, event: &Event<S, A>) {
        let message = self.formatter.format(event);
        tracing::debug!(
            target: "statevm::trace",
            dispatcher,
            kind = %event.kind(),
            "{}",
            message
        );
    }
}

impl<S, A> Debug for LoggerPlugin<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerPlugin").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_formatter_describes_updates() {
        let event: Event<i32, String> = Event::Update {
            previous: 1,
            updated: 2,
        };
        assert_eq!(DefaultFormatter.format(&event), "state updated: 1 -> 2");
    }

    #[test]
    fn default_formatter_describes_blocked_interceptions() {
        let event: Event<i32, String> = Event::Interception {
            name: "only-positive".to_string(),
            stage: Stage::Blocked,
            state: 0,
            action: None,
        };
        assert_eq!(
            DefaultFormatter.format(&event),
            "only-positive blocked the action"
        );
    }

    #[test]
    fn closures_are_formatters() {
        let formatter = |event: &Event<i32, String>| event.kind().to_string();
        let event: Event<i32, String> = Event::Cleared;
        assert_eq!(formatter.format(&event), "Cleared");
    }
}
