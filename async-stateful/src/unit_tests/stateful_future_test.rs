use crate::{to_stateful, AsyncError, Status};
use std::time::Duration;

#[tokio::test]
async fn test_stateful_future_resolves() {
    let mut fetch = Box::pin(to_stateful(async {
        tokio::time::sleep(Duration::from_millis(1)).await;
        Ok::<_, AsyncError>("Async Result".to_string())
    }));
    assert_eq!(fetch.state().status(), Status::Submitting);

    let output = fetch.as_mut().await;
    assert_eq!(output, Ok("Async Result".to_string()));
    assert!(fetch.state().is_resolved());
    assert_eq!(fetch.state().value(), Some(&"Async Result".to_string()));
}

#[tokio::test]
async fn test_stateful_future_rejects() {
    let mut fetch = Box::pin(to_stateful(async {
        Err::<u32, _>(AsyncError::message("Operation failed"))
    }));

    let output = fetch.as_mut().await;
    assert_eq!(output, Err(AsyncError::message("Operation failed")));
    assert!(fetch.state().is_rejected());
    assert_eq!(
        fetch.state().error(),
        Some(&AsyncError::message("Operation failed"))
    );
    assert!(fetch.state().settled_at().is_some());
}
