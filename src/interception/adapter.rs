use async_trait::async_trait;

use super::{name_or, Interception, Next};
use crate::mvi::{Action, State};
use crate::viewmodel::{Dispatcher, Scope};

/// Rewrites every received action and forwards the result.
///
/// ```
/// # use statevm::interception::Adapter;
/// # use statevm::mvi::{Action, State};
/// # #[derive(Debug, Clone, PartialEq)] struct Volume(u8);
/// # impl State for Volume {}
/// # #[derive(Debug, Clone)] enum VolumeAction { Set(u8) }
/// # impl Action for VolumeAction {}
/// let clamp = Adapter::new("clamp", |_: &Volume, action: VolumeAction| match action {
///     VolumeAction::Set(level) => VolumeAction::Set(level.min(100)),
/// });
/// ```
pub struct Adapter<S, A> {
    name: String,
    adapt: Box<dyn Fn(&S, A) -> A + Send + Sync>,
}

impl<S: State, A: Action> Adapter<S, A> {
    pub fn new(name: impl Into<String>, adapt: impl Fn(&S, A) -> A + Send + Sync + 'static) -> Self {
        Self {
            name: name_or(name, "Adapter"),
            adapt: Box::new(adapt),
        }
    }
}

#[async_trait]
impl<S: State, A: Action> Interception<S, A> for Adapter<S, A> {
    fn debug_name(&self) -> &str {
        &self.name
    }

    async fn intercept(
        &self,
        scope: &Scope,
        state: &S,
        action: A,
        dispatcher: &Dispatcher<A>,
        next: Next<'_, S, A>,
    ) -> Option<A> {
        let adapted = (self.adapt)(state, action);
        next.run(scope, state, adapted, dispatcher).await
    }
}

impl<S, A> std::fmt::Debug for Adapter<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Adapter").field("name", &self.name).finish()
    }
}
