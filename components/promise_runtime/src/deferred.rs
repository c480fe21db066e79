//! Deferred factory.

use std::fmt;

use crate::promise::{Promise, Rejecter, Resolver};

/// A pending promise bundled with the capabilities that settle it.
///
/// Useful when the code that settles the promise is not known at
/// construction time, so an initializer closure would be awkward.
///
/// # Examples
///
/// ```
/// use promise_runtime::{EventLoop, Promise};
///
/// let event_loop = EventLoop::new();
/// let deferred = Promise::<&str, String>::deferred(event_loop.scheduler());
/// assert!(deferred.promise.is_pending());
///
/// deferred.resolver.resolve("done");
/// assert_eq!(deferred.promise.outcome(), Some(Ok("done")));
/// ```
pub struct Deferred<T, E> {
    /// The promise settled by the two capabilities below
    pub promise: Promise<T, E>,
    /// Fulfills `promise`
    pub resolver: Resolver<T, E>,
    /// Rejects `promise`
    pub rejecter: Rejecter<T, E>,
}

impl<T, E> fmt::Debug for Deferred<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("promise", &self.promise)
            .finish_non_exhaustive()
    }
}
