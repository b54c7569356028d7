//! Shared test fixtures: a counter feature and a recording debug plugin.

#![allow(dead_code, unused_imports)]

use parking_lot::Mutex;
use statevm::debug::{DebugConfig, Event, EventKind, Plugin, Stage};
use statevm::interception::Interceptions;
use statevm::mvi::{Action, State};
use statevm::viewmodel::ViewModel;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Counter {
    pub count: i32,
    pub loading: bool,
}

impl State for Counter {}

#[derive(Debug, Clone, PartialEq)]
pub enum CounterAction {
    Increment,
    Decrement,
    Add(i32),
    Load,
    Loading,
    Loaded(i32),
    Noop,
}

impl Action for CounterAction {}

pub fn reduce(state: &Counter, action: &CounterAction) -> Option<Counter> {
    match action {
        CounterAction::Increment => Some(Counter {
            count: state.count + 1,
            ..state.clone()
        }),
        CounterAction::Decrement => Some(Counter {
            count: state.count - 1,
            ..state.clone()
        }),
        CounterAction::Add(n) => Some(Counter {
            count: state.count + n,
            ..state.clone()
        }),
        CounterAction::Loading => Some(Counter {
            loading: true,
            ..state.clone()
        }),
        CounterAction::Loaded(n) => Some(Counter {
            count: *n,
            loading: false,
        }),
        CounterAction::Noop => Some(state.clone()),
        CounterAction::Load => None,
    }
}

/// Counter view model on the ambient runtime.
pub fn counter_vm(interceptions: Interceptions<Counter, CounterAction>) -> ViewModel<Counter, CounterAction> {
    ViewModel::builder(Counter::default(), reduce)
        .interceptions(interceptions)
        .tag("counter")
        .build()
        .expect("tests run inside a tokio runtime")
}

/// Counter view model reporting every trace event to the returned recorder.
pub fn traced_counter_vm(
    interceptions: Interceptions<Counter, CounterAction>,
) -> (ViewModel<Counter, CounterAction>, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let vm = ViewModel::builder(Counter::default(), reduce)
        .interceptions(interceptions)
        .tag("counter")
        .debug(DebugConfig::enabled().with_shared_plugin(recorder.clone()))
        .build()
        .expect("tests run inside a tokio runtime");
    (vm, recorder)
}

/// Plugin keeping every event it receives.
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<(String, Event<Counter, CounterAction>)>>,
}

impl Recorder {
    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.lock().iter().map(|(_, e)| e.kind()).collect()
    }

    pub fn dispatchers(&self) -> Vec<String> {
        self.events.lock().iter().map(|(d, _)| d.clone()).collect()
    }

    /// Published states, in order.
    pub fn updates(&self) -> Vec<i32> {
        self.events
            .lock()
            .iter()
            .filter_map(|(_, e)| match e {
                Event::Update { updated, .. } => Some(updated.count),
                _ => None,
            })
            .collect()
    }

    /// `(interception, stage)` pairs, in order.
    pub fn traversal(&self) -> Vec<(String, Stage)> {
        self.events
            .lock()
            .iter()
            .filter_map(|(_, e)| match e {
                Event::Interception { name, stage, .. } => Some((name.clone(), *stage)),
                _ => None,
            })
            .collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|(_, e)| match e {
                Event::Message(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn customs(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|(_, e)| match e {
                Event::Custom(data) => Some(format!("{data:?}")),
                _ => None,
            })
            .collect()
    }
}

impl Plugin<Counter, CounterAction> for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    fn on_event(&self, dispatcher: &str, event: &Event<Counter, CounterAction>) {
        self.events.lock().push((dispatcher.to_string(), event.clone()));
    }
}

/// Write `content` to a `config.toml` inside a fresh temp dir.
pub fn temp_settings(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, content).expect("Failed to write config");
    (temp_dir, path)
}
