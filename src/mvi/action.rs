//! Base trait for actions in MVI architecture.

use std::fmt::Debug;

/// Marker trait for action objects.
///
/// Actions represent:
/// - User actions (button clicks, key presses)
/// - Results of side effects (API responses, timers)
/// - Values forwarded from external sources
///
/// Actions are threaded through the interception chain and then
/// handed to the reducer.
pub trait Action: Clone + Debug + Send + Sync + 'static {}
