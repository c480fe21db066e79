//! Promise implementation following Promise/A+.
//!
//! A [`Promise`] settles at most once. Continuations registered with
//! [`Promise::then`] or [`Promise::chain`] never run inside the call that
//! registered them or inside the call that settled the promise; they are
//! handed to the promise's [`Scheduler`](crate::Scheduler) and run on a
//! later turn, in registration order.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use promise_types::{PromiseError, PromiseState};

use crate::deferred::Deferred;
use crate::handler::{run_handler, Handler};
use crate::scheduler::SchedulerRef;
use crate::task_queue::Task;

pub(crate) type FulfillReaction<T> = Box<dyn FnOnce(T) + Send>;
pub(crate) type RejectReaction<E> = Box<dyn FnOnce(E) + Send>;

/// A value of type `T` that will be available later, or a failure of type `E`.
///
/// `Promise` is a handle: clones observe and settle the same underlying
/// state. The only way to settle a promise from outside this crate is through
/// the [`Resolver`] and [`Rejecter`] passed to the initializer (or returned by
/// [`Promise::deferred`]).
///
/// # Examples
///
/// ```
/// use promise_runtime::{EventLoop, Handler, Promise};
///
/// let event_loop = EventLoop::new();
/// let promise: Promise<i32, String> = Promise::new(event_loop.scheduler(), |resolve, _| {
///     resolve.resolve(1);
/// });
/// let derived = promise.then(Some(Handler::from_fn(|v| v + 1)), None);
///
/// event_loop.run_until_done();
/// assert_eq!(derived.outcome(), Some(Ok(2)));
/// ```
pub struct Promise<T, E> {
    shared: Arc<Shared<T, E>>,
}

struct Shared<T, E> {
    core: Mutex<Core<T, E>>,
    settled: Condvar,
    scheduler: SchedulerRef,
}

struct Core<T, E> {
    state: State<T, E>,
    fulfillment_queue: Vec<FulfillReaction<T>>,
    rejection_queue: Vec<RejectReaction<E>>,
}

enum State<T, E> {
    Pending,
    Fulfilled(T),
    Rejected(E),
}

impl<T: Clone, E: Clone> Core<T, E> {
    fn outcome(&self) -> Option<Result<T, E>> {
        match &self.state {
            State::Pending => None,
            State::Fulfilled(value) => Some(Ok(value.clone())),
            State::Rejected(reason) => Some(Err(reason.clone())),
        }
    }
}

impl<T, E> Core<T, E> {
    fn is_pending(&self) -> bool {
        matches!(self.state, State::Pending)
    }

    fn state(&self) -> PromiseState {
        match self.state {
            State::Pending => PromiseState::Pending,
            State::Fulfilled(_) => PromiseState::Fulfilled,
            State::Rejected(_) => PromiseState::Rejected,
        }
    }
}

impl<T, E> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + From<PromiseError> + 'static,
{
    /// Creates a promise and runs `initializer` synchronously with its
    /// resolve and reject capabilities.
    ///
    /// A panic inside `initializer` is not caught; it unwinds through this
    /// call.
    pub fn new<F>(scheduler: SchedulerRef, initializer: F) -> Self
    where
        F: FnOnce(Resolver<T, E>, Rejecter<T, E>),
    {
        let Deferred {
            promise,
            resolver,
            rejecter,
        } = Self::deferred(scheduler);
        initializer(resolver, rejecter);
        promise
    }

    /// Creates a pending promise together with its capabilities.
    pub fn deferred(scheduler: SchedulerRef) -> Deferred<T, E> {
        let promise = Self::pending(scheduler);
        Deferred {
            resolver: Resolver {
                promise: promise.clone(),
            },
            rejecter: Rejecter {
                promise: promise.clone(),
            },
            promise,
        }
    }

    /// Creates a promise already fulfilled with `value`.
    pub fn resolved(scheduler: SchedulerRef, value: T) -> Self {
        Self::new(scheduler, move |resolver, _| {
            resolver.resolve(value);
        })
    }

    /// Creates a promise already rejected with `reason`.
    pub fn rejected(scheduler: SchedulerRef, reason: E) -> Self {
        Self::new(scheduler, move |_, rejecter| {
            rejecter.reject(reason);
        })
    }

    pub(crate) fn pending(scheduler: SchedulerRef) -> Self {
        Self {
            shared: Arc::new(Shared {
                core: Mutex::new(Core {
                    state: State::Pending,
                    fulfillment_queue: Vec::new(),
                    rejection_queue: Vec::new(),
                }),
                settled: Condvar::new(),
                scheduler,
            }),
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> PromiseState {
        self.shared.core.lock().state()
    }

    /// Returns true while the promise is neither fulfilled nor rejected.
    pub fn is_pending(&self) -> bool {
        self.shared.core.lock().is_pending()
    }

    /// Returns a copy of the settled value or reason, or `None` while pending.
    pub fn outcome(&self) -> Option<Result<T, E>> {
        self.shared.core.lock().outcome()
    }

    /// Blocks the calling thread until the promise settles.
    ///
    /// Only useful when continuations run on another thread, such as a
    /// [`WorkerThread`](crate::WorkerThread). Waiting on the thread that
    /// drives an [`EventLoop`](crate::EventLoop) blocks forever.
    pub fn wait(&self) -> Result<T, E> {
        let mut core = self.shared.core.lock();
        loop {
            if let Some(outcome) = core.outcome() {
                return outcome;
            }
            self.shared.settled.wait(&mut core);
        }
    }

    /// Like [`wait`](Promise::wait), giving up after `timeout`.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<T, E>> {
        let deadline = Instant::now() + timeout;
        let mut core = self.shared.core.lock();
        loop {
            if let Some(outcome) = core.outcome() {
                return Some(outcome);
            }
            if self.shared.settled.wait_until(&mut core, deadline).timed_out() {
                return core.outcome();
            }
        }
    }

    /// The scheduler continuations of this promise (and promises derived
    /// from it) run on.
    pub fn scheduler(&self) -> &SchedulerRef {
        &self.shared.scheduler
    }

    /// Returns true if both handles refer to the same promise.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Registers continuations and returns the derived promise.
    ///
    /// - `on_fulfilled` absent: the value passes through unchanged.
    /// - `on_rejected` absent: the rejection passes through unchanged.
    ///
    /// Whatever a handler returns is run through the resolution procedure
    /// against the derived promise; a handler error rejects it.
    pub fn then(
        &self,
        on_fulfilled: Option<Handler<T, T, E>>,
        on_rejected: Option<Handler<E, T, E>>,
    ) -> Promise<T, E> {
        self.chain(on_fulfilled.unwrap_or_else(Handler::identity), on_rejected)
    }

    /// Like [`then`](Promise::then), but the fulfillment handler may change
    /// the value type. Since the value cannot pass through untouched, the
    /// fulfillment handler is required.
    pub fn chain<U>(
        &self,
        on_fulfilled: Handler<T, U, E>,
        on_rejected: Option<Handler<E, U, E>>,
    ) -> Promise<U, E>
    where
        U: Clone + Send + 'static,
    {
        let derived = Promise::pending(self.shared.scheduler.clone());

        let fulfil_target = derived.clone();
        let reject_target = derived.clone();
        self.react(
            Box::new(move |value| run_handler(&fulfil_target, on_fulfilled, value)),
            Box::new(move |reason| match on_rejected {
                Some(handler) => run_handler(&reject_target, handler, reason),
                None => {
                    reject_target.reject(reason);
                }
            }),
        );

        derived
    }

    /// Queues the reactions while pending, otherwise schedules the matching
    /// one right away. Never runs either reaction inline.
    pub(crate) fn react(&self, on_fulfilled: FulfillReaction<T>, on_rejected: RejectReaction<E>) {
        let mut guard = self.shared.core.lock();
        let core = &mut *guard;
        match &core.state {
            State::Pending => {
                core.fulfillment_queue.push(on_fulfilled);
                core.rejection_queue.push(on_rejected);
            }
            State::Fulfilled(value) => self.dispatch(on_fulfilled, value.clone()),
            State::Rejected(reason) => self.dispatch(on_rejected, reason.clone()),
        }
    }

    // Reactions are scheduled before the lock is released, so a `react` racing
    // with settlement cannot overtake continuations registered earlier.
    // `Scheduler::schedule` never runs a task inline, so this cannot reenter.
    pub(crate) fn resolve(&self, value: T) -> bool {
        let mut core = self.shared.core.lock();
        if !core.is_pending() {
            tracing::trace!(state = %core.state(), "resolve ignored, promise already settled");
            return false;
        }
        core.rejection_queue.clear();
        let reactions = std::mem::take(&mut core.fulfillment_queue);
        tracing::trace!(continuations = reactions.len(), "promise fulfilled");
        for reaction in reactions {
            self.dispatch(reaction, value.clone());
        }
        core.state = State::Fulfilled(value);
        drop(core);

        self.shared.settled.notify_all();
        true
    }

    pub(crate) fn reject(&self, reason: E) -> bool {
        let mut core = self.shared.core.lock();
        if !core.is_pending() {
            tracing::trace!(state = %core.state(), "reject ignored, promise already settled");
            return false;
        }
        core.fulfillment_queue.clear();
        let reactions = std::mem::take(&mut core.rejection_queue);
        tracing::trace!(continuations = reactions.len(), "promise rejected");
        for reaction in reactions {
            self.dispatch(reaction, reason.clone());
        }
        core.state = State::Rejected(reason);
        drop(core);

        self.shared.settled.notify_all();
        true
    }

    fn dispatch<A: Send + 'static>(&self, reaction: Box<dyn FnOnce(A) + Send>, arg: A) {
        self.shared
            .scheduler
            .schedule(Task::new(move || reaction(arg)));
    }
}

impl<T, E> Clone for Promise<T, E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T, E> fmt::Debug for Promise<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("state", &self.shared.core.lock().state())
            .finish()
    }
}

/// The fulfill capability of a promise.
///
/// Settles the promise with a plain value; it does not unwrap promises or
/// thenables. Calls after the promise settled are no-ops.
pub struct Resolver<T, E> {
    promise: Promise<T, E>,
}

impl<T, E> Resolver<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + From<PromiseError> + 'static,
{
    /// Fulfills the promise. Returns false if it was already settled.
    pub fn resolve(&self, value: T) -> bool {
        self.promise.resolve(value)
    }
}

impl<T, E> Clone for Resolver<T, E> {
    fn clone(&self) -> Self {
        Self {
            promise: self.promise.clone(),
        }
    }
}

impl<T, E> fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("promise", &self.promise)
            .finish()
    }
}

/// The reject capability of a promise.
pub struct Rejecter<T, E> {
    promise: Promise<T, E>,
}

impl<T, E> Rejecter<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + From<PromiseError> + 'static,
{
    /// Rejects the promise. Returns false if it was already settled.
    pub fn reject(&self, reason: E) -> bool {
        self.promise.reject(reason)
    }
}

impl<T, E> Clone for Rejecter<T, E> {
    fn clone(&self) -> Self {
        Self {
            promise: self.promise.clone(),
        }
    }
}

impl<T, E> fmt::Debug for Rejecter<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejecter")
            .field("promise", &self.promise)
            .finish()
    }
}
