//! Unit tests for PromiseState

use promise_types::PromiseState;
use std::collections::HashSet;

#[test]
fn test_states_are_distinct() {
    let states: HashSet<PromiseState> = [
        PromiseState::Pending,
        PromiseState::Fulfilled,
        PromiseState::Rejected,
    ]
    .into_iter()
    .collect();
    assert_eq!(states.len(), 3);
}

#[test]
fn test_state_is_copy() {
    let state = PromiseState::Fulfilled;
    let copy = state;
    assert_eq!(state, copy);
}
