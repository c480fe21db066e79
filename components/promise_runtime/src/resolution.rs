//! The resolution procedure.
//!
//! When a continuation returns, its result decides how the derived promise
//! settles. A plain value fulfills it directly. A promise or any other
//! [`Thenable`] is adopted instead: the derived promise settles however the
//! thenable eventually does. Foreign thenables are untrusted, so every
//! adoption attempt hands out a pair of capabilities guarded by one shared
//! used-once flag: the first call to either capability wins and everything
//! after it, including a late error from `subscribe`, is ignored.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use promise_types::{panic_message, PromiseError};

use crate::promise::Promise;

/// What a continuation hands back to settle its derived promise.
pub enum Resolution<T, E> {
    /// A plain value; fulfills the derived promise as-is.
    Value(T),
    /// A promise to adopt.
    Promise(Promise<T, E>),
    /// A foreign thenable to adopt.
    Thenable(Box<dyn Thenable<T, E> + Send>),
}

impl<T, E> Resolution<T, E> {
    /// Wraps a foreign thenable.
    pub fn thenable<Th>(thenable: Th) -> Self
    where
        Th: Thenable<T, E> + Send + 'static,
    {
        Resolution::Thenable(Box::new(thenable))
    }
}

impl<T, E> From<Promise<T, E>> for Resolution<T, E> {
    fn from(promise: Promise<T, E>) -> Self {
        Resolution::Promise(promise)
    }
}

impl<T: fmt::Debug, E> fmt::Debug for Resolution<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Resolution::Promise(promise) => f.debug_tuple("Promise").field(promise).finish(),
            Resolution::Thenable(_) => write!(f, "Thenable(...)"),
        }
    }
}

/// Anything that can report a later outcome through a pair of capabilities.
///
/// This is the explicit stand-in for a JavaScript object with a callable
/// `then` member. Implementations call `resolve` or `reject` at most once
/// (extra calls are ignored) now or at any later time, from any thread.
/// Returning `Err` is the equivalent of `then` throwing: it rejects the
/// adopting promise, unless a capability was already called.
///
/// # Examples
///
/// ```
/// use promise_runtime::{RejectCapability, ResolveCapability, Thenable};
///
/// struct Ready(i32);
///
/// impl Thenable<i32, String> for Ready {
///     fn subscribe(
///         &self,
///         resolve: ResolveCapability<i32, String>,
///         _reject: RejectCapability<i32, String>,
///     ) -> Result<(), String> {
///         resolve.resolve(self.0);
///         Ok(())
///     }
/// }
/// ```
pub trait Thenable<T, E> {
    /// Registers the capabilities that settle the adopting promise.
    fn subscribe(
        &self,
        resolve: ResolveCapability<T, E>,
        reject: RejectCapability<T, E>,
    ) -> Result<(), E>;
}

impl<T, E> Thenable<T, E> for Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + From<PromiseError> + 'static,
{
    fn subscribe(
        &self,
        resolve: ResolveCapability<T, E>,
        reject: RejectCapability<T, E>,
    ) -> Result<(), E> {
        self.react(
            Box::new(move |value| {
                resolve.resolve(value);
            }),
            Box::new(move |reason| {
                reject.reject(reason);
            }),
        );
        Ok(())
    }
}

/// Resolve half of one adoption attempt.
pub struct ResolveCapability<T, E> {
    target: Promise<T, E>,
    used: Arc<AtomicBool>,
}

impl<T, E> ResolveCapability<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + From<PromiseError> + 'static,
{
    /// Settles the adopting promise with a plain value.
    ///
    /// Returns false if this attempt's capabilities were already used.
    pub fn resolve(&self, value: T) -> bool {
        self.resolve_with(Resolution::Value(value))
    }

    /// Runs `candidate` through the resolution procedure, so a thenable may
    /// resolve to another thenable.
    pub fn resolve_with(&self, candidate: Resolution<T, E>) -> bool {
        if self.used.swap(true, Ordering::AcqRel) {
            tracing::trace!("resolve capability ignored, attempt already settled");
            return false;
        }
        resolve_thenable(&self.target, candidate);
        true
    }
}

impl<T, E> Clone for ResolveCapability<T, E> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            used: Arc::clone(&self.used),
        }
    }
}

impl<T, E> fmt::Debug for ResolveCapability<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveCapability")
            .field("used", &self.used.load(Ordering::Acquire))
            .finish()
    }
}

/// Reject half of one adoption attempt.
pub struct RejectCapability<T, E> {
    target: Promise<T, E>,
    used: Arc<AtomicBool>,
}

impl<T, E> RejectCapability<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + From<PromiseError> + 'static,
{
    /// Rejects the adopting promise.
    ///
    /// Returns false if this attempt's capabilities were already used.
    pub fn reject(&self, reason: E) -> bool {
        if self.used.swap(true, Ordering::AcqRel) {
            tracing::trace!("reject capability ignored, attempt already settled");
            return false;
        }
        self.target.reject(reason);
        true
    }
}

impl<T, E> Clone for RejectCapability<T, E> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            used: Arc::clone(&self.used),
        }
    }
}

impl<T, E> fmt::Debug for RejectCapability<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RejectCapability")
            .field("used", &self.used.load(Ordering::Acquire))
            .finish()
    }
}

/// Settles `target` according to `candidate`.
pub(crate) fn resolve_thenable<T, E>(target: &Promise<T, E>, candidate: Resolution<T, E>)
where
    T: Clone + Send + 'static,
    E: Clone + Send + From<PromiseError> + 'static,
{
    match candidate {
        Resolution::Value(value) => {
            target.resolve(value);
        }
        Resolution::Promise(promise) if promise.ptr_eq(target) => {
            tracing::debug!("continuation resolved its own derived promise");
            target.reject(PromiseError::SelfResolution.into());
        }
        Resolution::Promise(promise) => adopt(target, &promise),
        Resolution::Thenable(thenable) => adopt(target, &*thenable),
    }
}

fn adopt<T, E>(target: &Promise<T, E>, thenable: &dyn Thenable<T, E>)
where
    T: Clone + Send + 'static,
    E: Clone + Send + From<PromiseError> + 'static,
{
    let used = Arc::new(AtomicBool::new(false));
    let resolve = ResolveCapability {
        target: target.clone(),
        used: Arc::clone(&used),
    };
    let reject = RejectCapability {
        target: target.clone(),
        used: Arc::clone(&used),
    };

    let subscribed = panic::catch_unwind(AssertUnwindSafe(|| thenable.subscribe(resolve, reject)))
        .unwrap_or_else(|payload| {
            let message = panic_message(payload.as_ref());
            tracing::warn!(%message, "thenable panicked during subscribe");
            Err(PromiseError::ThenablePanicked { message }.into())
        });

    if let Err(reason) = subscribed {
        if used.swap(true, Ordering::AcqRel) {
            tracing::debug!("thenable failed after a capability was used, error ignored");
        } else {
            target.reject(reason);
        }
    }
}
