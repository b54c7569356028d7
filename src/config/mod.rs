//! Engine settings loaded from disk and the environment.

mod loader;
mod types;

pub use loader::{ConfigError, DEBUG_ENV, TAG_ENV};
pub use types::EngineSettings;
