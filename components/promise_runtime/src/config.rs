//! Worker configuration.

use serde::Deserialize;

const DEFAULT_THREAD_NAME: &str = "promise-worker";

/// Settings for a [`WorkerThread`](crate::WorkerThread).
///
/// Every field has a default, so a partial table in an embedder's config
/// file is enough:
///
/// ```
/// use promise_runtime::WorkerConfig;
///
/// let config = WorkerConfig::default().with_thread_name("reactions");
/// assert_eq!(config.thread_name, "reactions");
/// assert_eq!(config.stack_size, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Name given to the OS thread
    pub thread_name: String,
    /// Stack size in bytes; `None` keeps the platform default
    pub stack_size: Option<usize>,
}

impl WorkerConfig {
    /// Sets the thread name.
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Sets the stack size in bytes.
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            thread_name: DEFAULT_THREAD_NAME.to_string(),
            stack_size: None,
        }
    }
}
