use thiserror::Error;

/// Errors raised while starting a view model.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no tokio runtime available to run the view model: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}
