use crate::{AsyncError, ExecutionResult};

#[test]
fn test_value_into_outcome() {
    let outcome: Result<i32, AsyncError> = 42.into_outcome();
    assert_eq!(outcome, Ok(42));
}

#[test]
fn test_result_ok_into_outcome() {
    let result: Result<i32, &str> = Ok(42);
    let outcome: Result<i32, AsyncError> = result.into_outcome();
    assert_eq!(outcome, Ok(42));
}

#[test]
fn test_result_err_into_outcome() {
    let result: Result<i32, &str> = Err("error message");
    let outcome: Result<i32, AsyncError> = result.into_outcome();
    assert_eq!(outcome, Err(AsyncError::Error("error message".to_string())));
}

#[test]
fn test_result_async_error_keeps_message() {
    let result: Result<i32, AsyncError> = Err(AsyncError::Timeout);
    let outcome: Result<i32, AsyncError> = result.into_outcome();
    assert_eq!(
        outcome,
        Err(AsyncError::Error("deadline has elapsed!".to_string()))
    );
}

#[test]
fn test_option_into_outcome() {
    let outcome: Result<i32, AsyncError> = Some(42).into_outcome();
    assert_eq!(outcome, Ok(42));

    let option: Option<i32> = None;
    let outcome: Result<i32, AsyncError> = option.into_outcome();
    assert_eq!(outcome, Err(AsyncError::None));
}

#[test]
fn test_optional_payload_resolves_to_none() {
    // A payload that may be absent is modelled as the value type itself.
    let outcome: Result<Option<i32>, AsyncError> = None::<i32>.into_outcome();
    assert_eq!(outcome, Ok(None));
}
