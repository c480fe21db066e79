//! Promise lifecycle states.

use std::fmt;

/// The state of a promise.
///
/// Promises move from `Pending` to exactly one of the settled states and
/// never leave it. The settled value or reason is not carried here; this is
/// the discriminant callers can inspect cheaply.
///
/// # Examples
///
/// ```
/// use promise_types::PromiseState;
///
/// assert!(PromiseState::Fulfilled.is_settled());
/// assert!(PromiseState::Rejected.is_settled());
/// assert!(!PromiseState::Pending.is_settled());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromiseState {
    /// The initial state; the promise is neither fulfilled nor rejected.
    Pending,
    /// The promise has been resolved with a value.
    Fulfilled,
    /// The promise has been rejected with a reason.
    Rejected,
}

impl PromiseState {
    /// Returns true once the promise has left `Pending`.
    pub fn is_settled(self) -> bool {
        !matches!(self, PromiseState::Pending)
    }
}

impl fmt::Display for PromiseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PromiseState::Pending => "pending",
            PromiseState::Fulfilled => "fulfilled",
            PromiseState::Rejected => "rejected",
        };
        f.write_str(name)
    }
}
