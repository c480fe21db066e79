//! Continuation handlers passed to `then` and `chain`.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use promise_types::{panic_message, PromiseError};

use crate::promise::Promise;
use crate::resolution::{resolve_thenable, Resolution};

/// A fulfillment or rejection handler.
///
/// Takes the settled value (or reason) of type `A` and produces what the
/// derived `Promise<U, E>` should settle with. Returning `Err` is the
/// equivalent of throwing: the derived promise is rejected with that error.
///
/// # Examples
///
/// ```
/// use promise_runtime::{Handler, Resolution};
///
/// let plain: Handler<i32, i32, String> = Handler::from_fn(|v| v * 2);
/// let fallible: Handler<i32, i32, String> =
///     Handler::try_from_fn(|v| if v > 0 { Ok(v) } else { Err("negative".into()) });
/// let full: Handler<i32, i32, String> = Handler::new(|v| Ok(Resolution::Value(v)));
/// # let _ = (plain, fallible, full);
/// ```
pub struct Handler<A, U, E> {
    callback: Box<dyn FnOnce(A) -> Result<Resolution<U, E>, E> + Send>,
}

impl<A, U, E> Handler<A, U, E> {
    /// Creates a handler that may settle the derived promise with a value,
    /// a promise, or a thenable.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(A) -> Result<Resolution<U, E>, E> + Send + 'static,
    {
        Self {
            callback: Box::new(f),
        }
    }

    /// Creates a handler that always produces a plain value.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnOnce(A) -> U + Send + 'static,
    {
        Self::new(move |arg| Ok(Resolution::Value(f(arg))))
    }

    /// Creates a handler that produces a plain value or fails.
    pub fn try_from_fn<F>(f: F) -> Self
    where
        F: FnOnce(A) -> Result<U, E> + Send + 'static,
    {
        Self::new(move |arg| f(arg).map(Resolution::Value))
    }
}

impl<A, U, E> Handler<A, U, E>
where
    E: From<PromiseError>,
{
    /// Runs the handler. A panic is reported as an error instead of
    /// unwinding into the scheduler.
    pub(crate) fn call(self, arg: A) -> Result<Resolution<U, E>, E> {
        let callback = self.callback;
        match panic::catch_unwind(AssertUnwindSafe(move || callback(arg))) {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::warn!(%message, "promise handler panicked");
                Err(PromiseError::HandlerPanicked { message }.into())
            }
        }
    }
}

impl<T, E> Handler<T, T, E> {
    /// The pass-through handler used when `then` gets no fulfillment handler.
    pub fn identity() -> Self {
        Self::new(|value| Ok(Resolution::Value(value)))
    }
}

impl<A, U, E> fmt::Debug for Handler<A, U, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler {{ ... }}")
    }
}

/// Body of a scheduled continuation: run the handler, then settle `target`
/// through the resolution procedure, or reject it if the handler failed.
pub(crate) fn run_handler<A, U, E>(target: &Promise<U, E>, handler: Handler<A, U, E>, arg: A)
where
    U: Clone + Send + 'static,
    E: Clone + Send + From<PromiseError> + 'static,
{
    match handler.call(arg) {
        Ok(candidate) => resolve_thenable(target, candidate),
        Err(reason) => {
            target.reject(reason);
        }
    }
}
