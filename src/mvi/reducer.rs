//! Reducer trait for MVI architecture.

use super::action::Action;
use super::state::State;

/// Reducer transforms state based on actions.
///
/// The reducer is the only place where state transitions happen.
/// It must be a pure function: (State, Action) -> State. Side effects
/// belong in interceptions.
///
/// Returning `None` signals "no change". Returning a state equal to the
/// current one has the same effect: nothing is published.
pub trait Reducer<S: State, A: Action>: Send + Sync + 'static {
    /// Process an action and return the new state, if any.
    fn reduce(&self, state: &S, action: &A) -> Option<S>;
}

impl<S, A, F> Reducer<S, A> for F
where
    S: State,
    A: Action,
    F: Fn(&S, &A) -> Option<S> + Send + Sync + 'static,
{
    fn reduce(&self, state: &S, action: &A) -> Option<S> {
        self(state, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Flag(bool);
    impl State for Flag {}

    #[derive(Debug, Clone)]
    enum Toggle {
        On,
        Keep,
    }
    impl Action for Toggle {}

    fn reduce_flag(state: &Flag, action: &Toggle) -> Option<Flag> {
        match action {
            Toggle::On => Some(Flag(true)),
            Toggle::Keep => Some(state.clone()),
        }
    }

    #[test]
    fn closures_are_reducers() {
        let reducer = |_: &Flag, _: &Toggle| None;
        assert_eq!(Reducer::reduce(&reducer, &Flag(false), &Toggle::On), None);
    }

    #[test]
    fn fn_items_are_reducers() {
        assert_eq!(
            Reducer::reduce(&reduce_flag, &Flag(false), &Toggle::On),
            Some(Flag(true))
        );
        assert_eq!(
            Reducer::reduce(&reduce_flag, &Flag(false), &Toggle::Keep),
            Some(Flag(false))
        );
    }
}
