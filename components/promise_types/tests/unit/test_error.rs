//! Unit tests for PromiseError

use promise_types::{panic_message, PromiseError};

#[cfg(test)]
mod promise_error_tests {
    use super::*;

    #[test]
    fn test_self_resolution_is_detected() {
        assert!(PromiseError::SelfResolution.is_self_resolution());
        assert!(!PromiseError::HandlerPanicked {
            message: String::new()
        }
        .is_self_resolution());
    }

    #[test]
    fn test_handler_panicked_display() {
        let error = PromiseError::HandlerPanicked {
            message: "x".to_string(),
        };
        assert_eq!(error.to_string(), "handler panicked: x");
    }

    #[test]
    fn test_errors_compare_by_value() {
        let a = PromiseError::ThenablePanicked {
            message: "same".to_string(),
        };
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, PromiseError::SelfResolution);
    }

    #[test]
    fn test_error_is_std_error() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>(_: &E) {}
        assert_error(&PromiseError::SelfResolution);
    }
}

#[cfg(test)]
mod panic_payload_tests {
    use super::*;

    #[test]
    fn test_caught_panic_message_is_recovered() {
        let payload = std::panic::catch_unwind(|| panic!("formatted {}", 42))
            .expect_err("closure panics");
        assert_eq!(panic_message(payload.as_ref()), "formatted 42");
    }
}
