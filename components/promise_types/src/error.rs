//! Errors produced by the promise primitive itself.
//!
//! User handlers and thenables fail with the caller's own reason type `E`.
//! The primitive needs to inject a few failures of its own into that same
//! channel, so every reason type used with a promise must implement
//! `From<PromiseError>`.

use std::any::Any;

use thiserror::Error;

/// A failure raised by the settlement machinery rather than by user code.
///
/// # Examples
///
/// ```
/// use promise_types::PromiseError;
///
/// let error = PromiseError::HandlerPanicked {
///     message: "index out of bounds".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "handler panicked: index out of bounds"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromiseError {
    /// A continuation tried to settle its derived promise with that same promise.
    #[error("TypeError: cannot resolve promise with itself")]
    SelfResolution,
    /// A fulfillment or rejection handler panicked instead of returning.
    #[error("handler panicked: {message}")]
    HandlerPanicked {
        /// The panic payload, if it was a string
        message: String,
    },
    /// A thenable's subscription panicked instead of returning.
    #[error("thenable panicked: {message}")]
    ThenablePanicked {
        /// The panic payload, if it was a string
        message: String,
    },
}

impl PromiseError {
    /// Returns true for the cycle-guard error.
    pub fn is_self_resolution(&self) -> bool {
        matches!(self, PromiseError::SelfResolution)
    }
}

impl From<PromiseError> for String {
    fn from(error: PromiseError) -> Self {
        error.to_string()
    }
}

/// Extracts a readable message from a `catch_unwind` payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
