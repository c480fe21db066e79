//! Event loop implementation.
//!
//! This module provides a cooperative, single-threaded scheduler that follows
//! the JavaScript event loop model: promise reactions are microtasks, and
//! everything else the embedder wants to defer (simulated timers, I/O
//! completions) is a task.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::scheduler::{Scheduler, SchedulerRef};
use crate::task_queue::{Task, TaskQueue};

/// A cooperative event loop.
///
/// Each iteration (turn) of the loop:
/// 1. Takes the oldest task from the task queue and executes it
/// 2. Drains all microtasks, including ones queued while draining
/// 3. Repeats while either queue has work
///
/// `EventLoop` is a handle; clones share the same queues. Work only happens
/// when the owner calls one of the `run_*` methods, so settled promises
/// observe nothing until the loop is driven.
///
/// # Examples
///
/// ```
/// use promise_runtime::{EventLoop, Task};
///
/// let event_loop = EventLoop::new();
/// event_loop.enqueue_task(Task::new(|| {}));
/// assert_eq!(event_loop.run_until_done(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventLoop {
    queues: Arc<Mutex<Queues>>,
}

#[derive(Debug, Default)]
struct Queues {
    tasks: TaskQueue,
    microtasks: TaskQueue,
}

impl EventLoop {
    /// Creates a new EventLoop with empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns this loop as a scheduler for promises.
    ///
    /// Promise continuations land in the microtask queue.
    pub fn scheduler(&self) -> SchedulerRef {
        Arc::new(self.clone())
    }

    /// Runs the event loop until both queues are empty.
    ///
    /// Returns the number of tasks and microtasks executed.
    pub fn run_until_done(&self) -> usize {
        let mut executed = 0;
        loop {
            executed += self.process_one_cycle();
            if self.is_task_queue_empty() && self.is_microtask_queue_empty() {
                break;
            }
        }
        tracing::trace!(executed, "event loop idle");
        executed
    }

    /// Adds a task to the task queue.
    ///
    /// The task will be executed in the next available iteration of the event loop.
    pub fn enqueue_task(&self, task: Task) {
        self.queues.lock().tasks.enqueue(task);
    }

    /// Adds a microtask to the microtask queue.
    ///
    /// The microtask will be executed after the current task completes.
    pub fn enqueue_microtask(&self, microtask: Task) {
        self.queues.lock().microtasks.enqueue(microtask);
    }

    /// Returns true if the task queue is empty.
    pub fn is_task_queue_empty(&self) -> bool {
        self.queues.lock().tasks.is_empty()
    }

    /// Returns true if the microtask queue is empty.
    pub fn is_microtask_queue_empty(&self) -> bool {
        self.queues.lock().microtasks.is_empty()
    }

    /// Runs all microtasks in the queue until empty.
    ///
    /// New microtasks added during execution are also processed before this
    /// method returns. Returns how many ran.
    pub fn run_all_microtasks(&self) -> usize {
        let mut executed = 0;
        while let Some(microtask) = self.next_microtask() {
            microtask.run();
            executed += 1;
        }
        executed
    }

    /// Runs all tasks in the queue without draining microtasks between them.
    ///
    /// This is primarily for testing purposes.
    pub fn run_all_tasks(&self) -> usize {
        let mut executed = 0;
        while let Some(task) = self.next_task() {
            task.run();
            executed += 1;
        }
        executed
    }

    /// Processes one complete cycle: one task followed by all microtasks.
    pub fn process_one_cycle(&self) -> usize {
        let mut executed = 0;
        if let Some(task) = self.next_task() {
            task.run();
            executed += 1;
        }
        executed + self.run_all_microtasks()
    }

    // The queue lock must not be held while a task runs; tasks enqueue more.
    fn next_task(&self) -> Option<Task> {
        self.queues.lock().tasks.dequeue()
    }

    fn next_microtask(&self) -> Option<Task> {
        self.queues.lock().microtasks.dequeue()
    }
}

impl Scheduler for EventLoop {
    fn schedule(&self, task: Task) {
        self.enqueue_microtask(task);
    }
}
