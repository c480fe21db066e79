//! Promise/A+ settle-once primitive with pluggable deferred scheduling.
//!
//! This crate provides:
//! - [`Promise`] - A value that settles later, at most once, with chainable
//!   continuations and thenable adoption
//! - [`Handler`], [`Resolution`], [`Thenable`] - What continuations are and
//!   what they may hand back
//! - [`Deferred`] - A pending promise bundled with its capabilities
//! - [`Scheduler`] - The seam continuations are deferred through, with two
//!   implementations: [`EventLoop`] (cooperative, caller-driven) and
//!   [`WorkerThread`] (one background thread)
//!
//! # Examples
//!
//! ## Chaining on an event loop
//!
//! ```
//! use promise_runtime::{EventLoop, Handler, Promise};
//!
//! let event_loop = EventLoop::new();
//! let promise: Promise<String, String> =
//!     Promise::new(event_loop.scheduler(), |_, reject| {
//!         reject.reject("boom".to_string());
//!     });
//!
//! let length = promise.chain(
//!     Handler::from_fn(|value: String| value.len()),
//!     Some(Handler::from_fn(|reason: String| reason.len())),
//! );
//!
//! event_loop.run_until_done();
//! assert_eq!(length.outcome(), Some(Ok(4)));
//! ```
//!
//! ## Waiting on a worker thread
//!
//! ```
//! use promise_runtime::{Handler, Promise, WorkerConfig, WorkerThread};
//!
//! let worker = WorkerThread::spawn(WorkerConfig::default()).unwrap();
//! let promise: Promise<i32, String> = Promise::resolved(worker.scheduler(), 20);
//! let doubled = promise.then(Some(Handler::from_fn(|v| v * 2)), None);
//! assert_eq!(doubled.wait(), Ok(40));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod deferred;
pub mod error;
pub mod event_loop;
pub mod handler;
pub mod promise;
pub mod resolution;
pub mod scheduler;
pub mod task_queue;
pub mod worker;

// Re-export main types at crate root
pub use config::WorkerConfig;
pub use deferred::Deferred;
pub use error::{SchedulerError, SchedulerResult};
pub use event_loop::EventLoop;
pub use handler::Handler;
pub use promise::{Promise, Rejecter, Resolver};
pub use promise_types::{PromiseError, PromiseState};
pub use resolution::{RejectCapability, ResolveCapability, Resolution, Thenable};
pub use scheduler::{Scheduler, SchedulerRef};
pub use task_queue::{Task, TaskQueue};
pub use worker::WorkerThread;
