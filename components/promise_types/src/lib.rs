//! Shared vocabulary for the settle-once promise primitive.
//!
//! This crate holds the types that every other component speaks:
//!
//! - [`PromiseState`] - Payload-free view of where a promise is in its lifecycle
//! - [`PromiseError`] - Errors the primitive itself produces while settling
//!
//! # Examples
//!
//! ```
//! use promise_types::{PromiseError, PromiseState};
//!
//! let state = PromiseState::Pending;
//! assert!(!state.is_settled());
//!
//! let reason: String = PromiseError::SelfResolution.into();
//! assert_eq!(reason, "TypeError: cannot resolve promise with itself");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod state;

pub use error::{panic_message, PromiseError};
pub use state::PromiseState;
