//! Base trait for view model state in MVI architecture.

use std::fmt::Debug;

/// Marker trait for state objects.
///
/// States should be:
/// - Immutable (Clone to create new states)
/// - Self-contained (all data needed to render the view)
/// - Comparable (PartialEq decides whether observers are notified)
pub trait State: Clone + PartialEq + Debug + Send + Sync + 'static {}
