use std::time::Duration;
use thiserror::Error;

/// Conversion failures as seen by callers of the worker
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Error during conversion: {0}")]
    Engine(String),

    #[error("Error during conversion: timed out after {}s", .0.as_secs())]
    TimedOut(Duration),

    #[error("Error during conversion: engine produced an unusable output path {0}")]
    InvalidOutput(String),

    #[error("Conversion task aborted: {0}")]
    Aborted(String),
}
