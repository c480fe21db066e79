//! A scheduler backed by one dedicated OS thread.
//!
//! Tasks are sent over a `crossbeam` channel and run one at a time in the
//! order they were scheduled, which gives promises settled from any thread a
//! FIFO continuation order.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;
use promise_types::panic_message;

use crate::config::WorkerConfig;
use crate::error::{SchedulerError, SchedulerResult};
use crate::scheduler::{Scheduler, SchedulerRef};
use crate::task_queue::Task;

/// Handle to a background thread that runs scheduled tasks.
///
/// Clones share the same thread. The thread stops once [`shutdown`] is
/// called or the last handle (including those held by promises) is dropped;
/// tasks already queued at that point still run.
///
/// [`shutdown`]: WorkerThread::shutdown
///
/// # Examples
///
/// ```
/// use promise_runtime::{Task, WorkerConfig, WorkerThread};
/// use promise_runtime::Scheduler;
///
/// let worker = WorkerThread::spawn(WorkerConfig::default()).unwrap();
/// let (tx, rx) = crossbeam::channel::bounded(1);
/// worker.schedule(Task::new(move || tx.send(7).unwrap()));
/// assert_eq!(rx.recv().unwrap(), 7);
/// worker.shutdown();
/// ```
#[derive(Debug, Clone)]
pub struct WorkerThread {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    name: String,
    sender: Mutex<Option<Sender<Task>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl WorkerThread {
    /// Starts the worker thread.
    pub fn spawn(config: WorkerConfig) -> SchedulerResult<Self> {
        let (sender, receiver) = channel::unbounded();

        let mut builder = thread::Builder::new().name(config.thread_name.clone());
        if let Some(bytes) = config.stack_size {
            builder = builder.stack_size(bytes);
        }

        let name = config.thread_name.clone();
        let handle = builder
            .spawn(move || run_worker(&name, &receiver))
            .map_err(|source| SchedulerError::Spawn {
                name: config.thread_name.clone(),
                source,
            })?;

        tracing::debug!(worker = %config.thread_name, "worker thread started");

        Ok(Self {
            shared: Arc::new(Shared {
                name: config.thread_name,
                sender: Mutex::new(Some(sender)),
                handle: Mutex::new(Some(handle)),
            }),
        })
    }

    /// Returns this worker as a scheduler for promises.
    pub fn scheduler(&self) -> SchedulerRef {
        Arc::new(self.clone())
    }

    /// The thread name this worker was started with.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Stops accepting tasks, lets queued ones finish, and joins the thread.
    ///
    /// Safe to call more than once and from inside a task running on this
    /// worker; in the latter case the thread is not joined.
    pub fn shutdown(&self) {
        self.shared.shutdown();
    }
}

impl Scheduler for WorkerThread {
    fn schedule(&self, task: Task) {
        let sender = self.shared.sender.lock();
        match sender.as_ref() {
            Some(sender) => {
                if sender.send(task).is_err() {
                    tracing::warn!(worker = %self.shared.name, "worker thread gone, task dropped");
                }
            }
            None => {
                tracing::warn!(
                    worker = %self.shared.name,
                    "task scheduled after shutdown, dropped"
                );
            }
        }
    }
}

impl Shared {
    fn shutdown(&self) {
        // Dropping the sender disconnects the channel; the worker drains and exits.
        self.sender.lock().take();

        let Some(handle) = self.handle.lock().take() else {
            return;
        };
        if handle.thread().id() == thread::current().id() {
            return;
        }
        if handle.join().is_err() {
            tracing::error!(worker = %self.name, "worker thread terminated abnormally");
        } else {
            tracing::debug!(worker = %self.name, "worker thread stopped");
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(name: &str, receiver: &Receiver<Task>) {
    for task in receiver.iter() {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(move || task.run())) {
            tracing::error!(
                worker = %name,
                message = %panic_message(payload.as_ref()),
                "task panicked"
            );
        }
    }
}
