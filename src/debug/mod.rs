//! Debug tracing side channel.
//!
//! A [`DebugConfig`] is handed to a view model at construction. While it is
//! enabled, every processed action, every interception traversal and every
//! resulting state transition is delivered to the configured [`Plugin`]s.
//! Tracing never influences how actions are processed.

mod event;
mod plugin;

use std::fmt;
use std::sync::Arc;

use crate::mvi::{Action, State};

pub use event::{Event, EventKind, Stage};
pub use plugin::{DefaultFormatter, EventFormatter, LoggerPlugin, Plugin};

/// Debug configuration of a single view model.
///
/// The default configuration is disabled and has no plugins.
pub struct DebugConfig<S, A> {
    enabled: bool,
    trace_interceptions: bool,
    plugins: Vec<Arc<dyn Plugin<S, A>>>,
}

impl<S, A> DebugConfig<S, A> {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            trace_interceptions: true,
            plugins: Vec::new(),
        }
    }

    /// Enabled configuration without plugins. Add some with [`with_plugin`](Self::with_plugin).
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::disabled()
        }
    }

    pub fn with_plugin(mut self, plugin: impl Plugin<S, A> + 'static) -> Self {
        self.plugins.push(Arc::new(plugin));
        self
    }

    pub fn with_shared_plugin(mut self, plugin: Arc<dyn Plugin<S, A>>) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Whether interception traversals are reported. Defaults to `true`.
    pub fn trace_interceptions(mut self, trace: bool) -> Self {
        self.trace_interceptions = trace;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn is_active(&self) -> bool {
        self.enabled && !self.plugins.is_empty()
    }
}

impl<S: State, A: Action> DebugConfig<S, A> {
    /// Enabled configuration logging every event through [`LoggerPlugin`].
    pub fn logging() -> Self {
        Self::enabled().with_plugin(LoggerPlugin::new())
    }
}

impl<S, A> Default for DebugConfig<S, A> {
    fn default() -> Self {
        Self::disabled()
    }
}

impl<S, A> Clone for DebugConfig<S, A> {
    fn clone(&self) -> Self {
        Self {
            enabled: self.enabled,
            trace_interceptions: self.trace_interceptions,
            plugins: self.plugins.clone(),
        }
    }
}

impl<S, A> fmt::Debug for DebugConfig<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plugins: Vec<&str> = self.plugins.iter().map(|p| p.name()).collect();
        f.debug_struct("DebugConfig")
            .field("enabled", &self.enabled)
            .field("trace_interceptions", &self.trace_interceptions)
            .field("plugins", &plugins)
            .finish()
    }
}

/// Emits events of one view model to its plugins.
pub(crate) struct Tracer<S, A> {
    tag: Arc<str>,
    config: Arc<DebugConfig<S, A>>,
}

impl<S: State, A: Action> Tracer<S, A> {
    pub(crate) fn new(tag: Arc<str>, config: DebugConfig<S, A>) -> Self {
        Self {
            tag,
            config: Arc::new(config),
        }
    }

    pub(crate) fn disabled() -> Self {
        Self::new(Arc::from(""), DebugConfig::disabled())
    }

    /// Builds the event lazily, only when somebody listens.
    pub(crate) fn emit(&self, event: impl FnOnce() -> Event<S, A>) {
        if !self.config.is_active() {
            return;
        }
        let event = event();
        for plugin in &self.config.plugins {
            plugin.on_event(&self.tag, &event);
        }
    }

    pub(crate) fn interception(&self, name: &str, stage: Stage, state: &S, action: Option<&A>) {
        tracing::trace!(tag = %self.tag, interception = name, ?stage, ?action, "interception");
        if self.config.trace_interceptions {
            self.emit(|| Event::Interception {
                name: name.to_owned(),
                stage,
                state: state.clone(),
                action: action.cloned(),
            });
        }
    }
}

impl<S, A> Clone for Tracer<S, A> {
    fn clone(&self) -> Self {
        Self {
            tag: Arc::clone(&self.tag),
            config: Arc::clone(&self.config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct Count(u32);
    impl State for Count {}

    #[derive(Debug, Clone)]
    struct Bump;
    impl Action for Bump {}

    #[derive(Default)]
    struct Kinds(Mutex<Vec<(String, EventKind)>>);

    impl Plugin<Count, Bump> for Kinds {
        fn on_event(&self, dispatcher: &str, event: &Event<Count, Bump>) {
            self.0.lock().push((dispatcher.to_string(), event.kind()));
        }
    }

    #[test]
    fn disabled_config_skips_event_construction() {
        let tracer: Tracer<Count, Bump> = Tracer::disabled();
        tracer.emit(|| panic!("event built while tracing is disabled"));
    }

    #[test]
    fn enabled_config_reaches_every_plugin() {
        let first = Arc::new(Kinds::default());
        let second = Arc::new(Kinds::default());
        let config = DebugConfig::enabled()
            .with_shared_plugin(first.clone())
            .with_shared_plugin(second.clone());
        let tracer = Tracer::new(Arc::from("counter"), config);

        tracer.emit(|| Event::Action(Bump));

        let expected = vec![("counter".to_string(), EventKind::Action)];
        assert_eq!(*first.0.lock(), expected);
        assert_eq!(*second.0.lock(), expected);
    }

    #[test]
    fn interception_events_can_be_silenced() {
        let kinds = Arc::new(Kinds::default());
        let config = DebugConfig::enabled()
            .with_shared_plugin(kinds.clone())
            .trace_interceptions(false);
        let tracer = Tracer::new(Arc::from("counter"), config);

        tracer.interception("noop", Stage::Received, &Count(0), Some(&Bump));

        assert!(kinds.0.lock().is_empty());
    }
}
