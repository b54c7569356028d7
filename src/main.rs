use std::fmt;
use std::time::Duration;

use clap::Parser;
use futures::{stream, StreamExt};
use tracing_subscriber::EnvFilter;

use statevm::config::EngineSettings;
use statevm::interception::{Interceptions, LiveReaction, Reaction};
use statevm::mvi::{Action, State};
use statevm::resource::{ErrorKind, Resource};
use statevm::view_event::ViewEvent;
use statevm::viewmodel::{Dispatcher, ViewModel};

/// Drive a counter view model and print every published state.
#[derive(Debug, Parser)]
#[command(name = "statevm-demo", version)]
struct Cli {
    /// Log every trace event of the view model.
    #[arg(long)]
    debug: bool,

    /// Number of ticks emitted by the ticker.
    #[arg(long, default_value_t = 3)]
    ticks: u32,

    /// Delay between two ticks, in milliseconds.
    #[arg(long, default_value_t = 100)]
    step: u64,
}

#[derive(Debug, Clone, PartialEq)]
struct Counter {
    value: i64,
    ticking: bool,
    saved: Resource<Option<i64>>,
    notice: Option<ViewEvent<String>>,
}

impl State for Counter {}

impl Default for Counter {
    fn default() -> Self {
        Self {
            value: 0,
            ticking: false,
            saved: Resource::Success(None),
            notice: None,
        }
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "value={} ticking={} saved=", self.value, self.ticking)?;
        match &self.saved {
            Resource::Success(Some(v)) => write!(f, "{v}"),
            Resource::Success(None) => f.write_str("never"),
            Resource::Pending(_) => f.write_str("saving..."),
            Resource::Error(_, kind) => write!(f, "failed ({kind})"),
        }
    }
}

#[derive(Debug, Clone)]
enum CounterAction {
    Increment,
    Decrement,
    Save,
    Saving,
    Saved(i64),
    SaveFailed(String),
    StartTicking,
    Ticking,
    Tick,
    Stopped,
}

impl Action for CounterAction {}

fn reduce(state: &Counter, action: &CounterAction) -> Option<Counter> {
    use CounterAction::*;

    let mut next = state.clone();
    match action {
        Increment | Tick => next.value += 1,
        Decrement => next.value -= 1,
        Saving => next.saved = Resource::Pending(*state.saved.value()),
        Saved(value) => {
            next.saved = Resource::Success(Some(*value));
            next.notice = Some(ViewEvent::new(format!("saved {value}")));
        }
        SaveFailed(reason) => {
            next.saved = Resource::Error(*state.saved.value(), ErrorKind::message(reason));
        }
        Ticking => next.ticking = true,
        Stopped => next.ticking = false,
        Save | StartTicking => return None,
    }
    Some(next)
}

fn interceptions(ticks: u32, step: Duration) -> Interceptions<Counter, CounterAction> {
    use CounterAction::*;

    Interceptions::<Counter, CounterAction>::builder()
        .before_pipe("log", |state, action| {
            tracing::info!(value = state.value, ?action, "received");
        })
        .filter("non-negative", |state, action| {
            !(matches!(action, Decrement) && state.value == 0)
        })
        .command("save", |action| match action {
            Save => Reaction::consuming(
                Saving,
                |state: Counter, dispatcher: Dispatcher<CounterAction>| async move {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    if state.value == 0 {
                        dispatcher.dispatch(SaveFailed("nothing to save".to_string()));
                    } else {
                        dispatcher.dispatch(Saved(state.value));
                    }
                    Ok(())
                },
            ),
            _ => Reaction::Ignoring,
        })
        .live_command("ticker", move |action| match action {
            StartTicking => LiveReaction::consuming(Ticking, move |_| {
                stream::iter(0..ticks)
                    .then(move |_| async move {
                        tokio::time::sleep(step).await;
                        Tick
                    })
                    .chain(stream::iter([Stopped]))
            }),
            _ => LiveReaction::Ignoring,
        })
        .build()
}

fn init_tracing(debug: bool) {
    let fallback = if debug { "info,statevm=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let mut settings = EngineSettings::from_env()?;
    settings.debug |= cli.debug;
    let step = Duration::from_millis(cli.step);

    let vm = ViewModel::builder(Counter::default(), reduce)
        .interceptions(interceptions(cli.ticks, step))
        .settings(settings)
        .build()?;

    let mut states = vm.subscribe();
    let printer = tokio::spawn(async move {
        while let Some(state) = states.next().await {
            println!("{state}");
            if let Some(text) = state.notice.as_ref().and_then(ViewEvent::take) {
                println!("  notice: {text}");
            }
        }
    });

    use CounterAction::*;
    for action in [Save, Increment, Increment, Decrement, Decrement, Decrement, Save] {
        vm.dispatch(action);
    }
    vm.dispatch(StartTicking);

    tokio::time::sleep(step * (cli.ticks + 1) + Duration::from_millis(50)).await;
    vm.flush().await;
    let last = vm.state();
    tracing::info!(tag = vm.tag(), value = last.value, "demo finished");

    drop(vm);
    printer.await?;
    println!("final: {last}");
    Ok(())
}
