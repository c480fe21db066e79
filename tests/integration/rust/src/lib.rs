//! Integration test suite for the promise workspace
//!
//! This crate verifies the components work together across their
//! boundaries: promises from `promise_runtime` settled on both scheduler
//! implementations, with reasons from `promise_types`.

use std::sync::Arc;

use parking_lot::Mutex;

/// Re-export components for test convenience
pub mod components {
    pub use promise_runtime;
    pub use promise_types;
}

/// Installs a test-writer tracing subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A shared sink continuations push what they observed into.
#[derive(Debug)]
pub struct Capture<T> {
    seen: Arc<Mutex<Vec<T>>>,
}

impl<T: Clone> Capture<T> {
    /// Creates an empty capture.
    pub fn new() -> Self {
        Self {
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Records a value.
    pub fn push(&self, value: T) {
        self.seen.lock().push(value);
    }

    /// Everything recorded so far, in order.
    pub fn seen(&self) -> Vec<T> {
        self.seen.lock().clone()
    }
}

impl<T: Clone> Default for Capture<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Capture<T> {
    fn clone(&self) -> Self {
        Self {
            seen: Arc::clone(&self.seen),
        }
    }
}
