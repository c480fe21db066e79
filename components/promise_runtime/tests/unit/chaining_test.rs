//! Unit tests for then/chain and handler outcomes

use std::sync::Arc;

use parking_lot::Mutex;
use promise_runtime::{EventLoop, Handler, Promise, PromiseError, Resolution};

use crate::common::{init_tracing, log, TestError};

#[test]
fn increments_through_two_links() {
    let el = EventLoop::new();
    let captured = log();

    let c = captured.clone();
    Promise::<i32, String>::new(el.scheduler(), |resolve, _| {
        resolve.resolve(1);
    })
    .then(Some(Handler::from_fn(|v| v + 1)), None)
    .then(
        Some(Handler::from_fn(move |v| {
            c.lock().push(v);
            v
        })),
        None,
    );

    el.run_until_done();
    assert_eq!(*captured.lock(), vec![2]);
}

#[test]
fn rejection_handler_recovers_with_value() {
    let el = EventLoop::new();
    let promise = Promise::<usize, String>::new(el.scheduler(), |_, reject| {
        reject.reject("boom".to_string());
    });
    let derived = promise.then(None, Some(Handler::from_fn(|reason: String| reason.len())));
    el.run_until_done();
    assert_eq!(derived.outcome(), Some(Ok(4)));
}

#[test]
fn failing_handler_rejects_with_its_error() {
    let el = EventLoop::new();
    let promise = Promise::<i32, TestError>::resolved(el.scheduler(), 1);
    let derived = promise.then(
        Some(Handler::try_from_fn(|_| {
            Err(TestError::Message("x".to_string()))
        })),
        None,
    );
    el.run_until_done();
    assert_eq!(
        derived.outcome(),
        Some(Err(TestError::Message("x".to_string())))
    );
}

#[test]
fn failing_rejection_handler_rejects_with_new_error() {
    let el = EventLoop::new();
    let promise = Promise::<i32, TestError>::rejected(
        el.scheduler(),
        TestError::Message("first".to_string()),
    );
    let derived = promise.then(
        None,
        Some(Handler::try_from_fn(|_| {
            Err(TestError::Message("second".to_string()))
        })),
    );
    el.run_until_done();
    assert_eq!(
        derived.outcome(),
        Some(Err(TestError::Message("second".to_string())))
    );
}

#[test]
fn panicking_handler_rejects_derived() {
    init_tracing();
    let el = EventLoop::new();
    let promise = Promise::<i32, TestError>::resolved(el.scheduler(), 1);
    let derived = promise.then(Some(Handler::from_fn(|_| panic!("exploded"))), None);
    el.run_until_done();
    assert_eq!(
        derived.outcome(),
        Some(Err(TestError::Promise(PromiseError::HandlerPanicked {
            message: "exploded".to_string()
        })))
    );
}

#[test]
fn rejection_skips_fulfillment_handlers() {
    let el = EventLoop::new();
    let calls = log();

    let c = calls.clone();
    let derived = Promise::<i32, String>::rejected(el.scheduler(), "stop".to_string())
        .then(
            Some(Handler::from_fn(move |v| {
                c.lock().push(v);
                v
            })),
            None,
        )
        .then(Some(Handler::from_fn(|v| v + 1)), None);

    el.run_until_done();
    assert!(calls.lock().is_empty());
    assert_eq!(derived.outcome(), Some(Err("stop".to_string())));
}

#[test]
fn chain_changes_value_type() {
    let el = EventLoop::new();
    let promise = Promise::<i32, String>::resolved(el.scheduler(), 12);
    let text = promise.chain(Handler::from_fn(|v: i32| format!("#{v}")), None);
    el.run_until_done();
    assert_eq!(text.outcome(), Some(Ok("#12".to_string())));
}

#[test]
fn chain_without_rejection_handler_propagates_reason() {
    let el = EventLoop::new();
    let promise = Promise::<i32, String>::rejected(el.scheduler(), "bad".to_string());
    let text = promise.chain(Handler::from_fn(|v: i32| v.to_string()), None);
    el.run_until_done();
    assert_eq!(text.outcome(), Some(Err("bad".to_string())));
}

#[test]
fn returned_promise_is_adopted() {
    let el = EventLoop::new();
    let inner = Promise::<i32, String>::deferred(el.scheduler());
    let inner_promise = inner.promise.clone();

    let derived = Promise::<i32, String>::resolved(el.scheduler(), 0).then(
        Some(Handler::new(move |_| Ok(Resolution::from(inner_promise)))),
        None,
    );

    el.run_until_done();
    assert!(derived.is_pending());

    inner.resolver.resolve(99);
    el.run_until_done();
    assert_eq!(derived.outcome(), Some(Ok(99)));
}

#[test]
fn returned_rejected_promise_rejects_derived() {
    let el = EventLoop::new();
    let failing = Promise::<i32, String>::rejected(el.scheduler(), "inner".to_string());

    let derived = Promise::<i32, String>::resolved(el.scheduler(), 0).then(
        Some(Handler::new(move |_| Ok(Resolution::from(failing)))),
        None,
    );

    el.run_until_done();
    assert_eq!(derived.outcome(), Some(Err("inner".to_string())));
}

#[test]
fn returning_the_derived_promise_rejects_with_type_error() {
    init_tracing();
    let el = EventLoop::new();
    let slot: Arc<Mutex<Option<Promise<i32, TestError>>>> = Arc::new(Mutex::new(None));

    let s = slot.clone();
    let derived = Promise::<i32, TestError>::resolved(el.scheduler(), 1).then(
        Some(Handler::new(move |_| match s.lock().take() {
            Some(itself) => Ok(Resolution::from(itself)),
            None => Err(TestError::Message("slot empty".to_string())),
        })),
        None,
    );
    *slot.lock() = Some(derived.clone());

    el.run_until_done();
    assert_eq!(
        derived.outcome(),
        Some(Err(TestError::Promise(PromiseError::SelfResolution)))
    );
}
