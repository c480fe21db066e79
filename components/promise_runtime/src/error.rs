//! Error types for the runtime components

use thiserror::Error;

/// Errors raised while setting up a scheduler.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The OS refused to start the worker thread
    #[error("failed to spawn worker thread `{name}`")]
    Spawn {
        /// Name the thread was going to get
        name: String,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },
}

/// Result type for scheduler setup
pub type SchedulerResult<T> = Result<T, SchedulerError>;
