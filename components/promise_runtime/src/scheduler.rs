//! The seam between promises and whatever runs their continuations.

use std::sync::Arc;

use crate::task_queue::Task;

/// Runs promise continuations on a later turn.
///
/// Implementations must never run a task inside the `schedule` call itself,
/// and must run tasks handed to the same scheduler in the order they were
/// scheduled. A cooperative loop on the current thread
/// ([`EventLoop`](crate::EventLoop)) and a dedicated background thread
/// ([`WorkerThread`](crate::WorkerThread)) both qualify.
///
/// Promises call `schedule` while holding their own lock, so an
/// implementation must not settle or inspect promises from inside it.
pub trait Scheduler: Send + Sync {
    /// Queues `task` to run after the current call stack unwinds.
    fn schedule(&self, task: Task);
}

/// Shared handle to a scheduler, as stored by every promise.
pub type SchedulerRef = Arc<dyn Scheduler>;

impl<S: Scheduler + ?Sized> Scheduler for Arc<S> {
    fn schedule(&self, task: Task) {
        (**self).schedule(task)
    }
}
