use serde::{Deserialize, Serialize};

/// Settings shared by the view models of an application.
///
/// Apply them with [`ViewModelBuilder::settings`](crate::viewmodel::ViewModelBuilder::settings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Log every trace event through a `LoggerPlugin` (default: false).
    pub debug: bool,
    /// Tag of the view model. Generated from the state type name when unset.
    pub tag: Option<String>,
    /// Report interception traversals to debug plugins (default: true).
    pub trace_interceptions: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            debug: false,
            tag: None,
            trace_interceptions: true,
        }
    }
}
