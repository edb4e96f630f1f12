use crate::{AsyncError, StateError, Status};

#[test]
fn test_async_error_methods() {
    let none_error = AsyncError::None;
    assert!(none_error.is_none());
    assert!(!none_error.is_error());
    assert!(!none_error.is_timeout());

    let error = AsyncError::message("message");
    assert!(!error.is_none());
    assert!(error.is_error());
    assert!(!error.is_timeout());

    let timeout = AsyncError::Timeout;
    assert!(!timeout.is_none());
    assert!(!timeout.is_error());
    assert!(timeout.is_timeout());
}

#[test]
fn test_async_error_display() {
    assert_eq!(AsyncError::message("boom").to_string(), "boom");
    assert_eq!(AsyncError::None.to_string(), "Operation returned None!");
    assert_eq!(AsyncError::Timeout.to_string(), "deadline has elapsed!");
}

#[test]
fn test_state_error_methods() {
    let invalid_argument = StateError::invalid_argument("nothing to resolve");
    assert!(invalid_argument.is_invalid_argument());
    assert!(!invalid_argument.is_invalid_state());
    assert_eq!(
        invalid_argument.to_string(),
        "invalid argument: nothing to resolve"
    );

    let invalid_state = StateError::InvalidState {
        status: Status::Submitting,
    };
    assert!(invalid_state.is_invalid_state());
    assert_eq!(
        invalid_state.to_string(),
        "can only patch resolved states, state was submitting"
    );
}

#[cfg(feature = "serde")]
#[test]
fn test_async_error_serde() {
    let error = AsyncError::message("message");
    let serialized = serde_json::to_string(&error).unwrap();
    assert_eq!(serialized, r#"{"error":"message"}"#);

    let deserialized: AsyncError = serde_json::from_str(&serialized).unwrap();
    assert_eq!(deserialized, error);

    let timeout = serde_json::to_string(&AsyncError::Timeout).unwrap();
    assert_eq!(timeout, r#""timeout""#);
    assert_eq!(
        serde_json::from_str::<AsyncError>(&timeout).unwrap(),
        AsyncError::Timeout
    );
}
