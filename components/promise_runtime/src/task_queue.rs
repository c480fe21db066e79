//! Task queue management.
//!
//! This module provides the FIFO queue used by the event loop for both
//! tasks and microtasks. A task is a deferred unit of work; promise
//! continuations are delivered to schedulers as tasks.

use std::collections::VecDeque;

/// A unit of deferred work.
///
/// Tasks run exactly once, on whatever thread drains the queue they were
/// placed in.
pub struct Task {
    callback: Box<dyn FnOnce() + Send>,
}

impl Task {
    /// Wraps `f` as a task.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            callback: Box::new(f),
        }
    }

    /// Executes the task, consuming it.
    pub fn run(self) {
        (self.callback)()
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task {{ ... }}")
    }
}

/// FIFO queue of tasks.
///
/// The event loop keeps two of these, one for tasks and one for microtasks.
#[derive(Debug, Default)]
pub struct TaskQueue {
    queue: VecDeque<Task>,
}

impl TaskQueue {
    /// Creates a new empty TaskQueue.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Adds a task to the end of the queue.
    pub fn enqueue(&mut self, task: Task) {
        self.queue.push_back(task);
    }

    /// Removes and returns the next task from the queue.
    pub fn dequeue(&mut self) -> Option<Task> {
        self.queue.pop_front()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of tasks in the queue.
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}
