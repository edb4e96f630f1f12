use crate::{classify, AsyncError, AsyncState, FlagView, Flags, MatchCases, Status, SubmitType};

fn flags(pending: bool, resolved: bool, rejected: bool, submit_type: Option<SubmitType>) -> Flags {
    Flags {
        pending,
        resolved,
        rejected,
        submit_type,
        ..Flags::default()
    }
}

#[test]
fn test_classify_precedence() {
    assert_eq!(classify(&flags(false, false, false, None)), Status::Pristine);
    assert_eq!(
        classify(&flags(true, false, false, Some(SubmitType::Refresh))),
        Status::Refreshing
    );
    assert_eq!(
        classify(&flags(true, false, false, Some(SubmitType::Submit))),
        Status::Submitting
    );
    assert_eq!(classify(&flags(false, true, false, None)), Status::Resolved);
    assert_eq!(classify(&flags(false, false, true, None)), Status::Rejected);

    // Contradictory flags are resolved by precedence, first match wins.
    assert_eq!(
        classify(&flags(true, true, false, Some(SubmitType::Refresh))),
        Status::Refreshing
    );
    assert_eq!(classify(&flags(false, true, true, None)), Status::Resolved);
}

#[test]
fn test_classify_invalid() {
    assert_eq!(classify(&flags(true, false, false, None)), Status::Invalid);
}

#[test]
fn test_cancelled_classifies_as_pristine() {
    let cancelled = Flags {
        cancelled: true,
        submit_type: Some(SubmitType::Submit),
        ..Flags::default()
    };
    assert_eq!(cancelled.status(), Status::Pristine);
}

#[test]
fn test_status_display() {
    assert_eq!(Status::Pristine.to_string(), "pristine");
    assert_eq!(Status::Refreshing.to_string(), "refreshing");
    assert_eq!(Status::Invalid.to_string(), "invalid");
}

#[test]
fn test_flag_view() {
    let state: AsyncState<i32, &str> = AsyncState::new(Some(0)).submit().resolve(9);
    let view = FlagView::from(&state);
    assert_eq!(view.value, Some(9));
    assert_eq!(view.default_value, Some(0));
    assert!(view.resolved);
    assert!(view.settled);
    assert!(!view.pending);
    assert_eq!(view.resolved_at, state.resolved_at());
    assert_eq!(view.status(), Status::Resolved);
}

fn cases<'a>() -> MatchCases<'a, i32, &'static str> {
    MatchCases::new()
        .pristine("idle")
        .submitting("loading")
        .refreshing("reloading")
        .resolved("done")
        .rejected("failed")
}

#[test]
fn test_match_status_literals() {
    let state: AsyncState<i32> = AsyncState::new(None);
    assert_eq!(state.match_status(cases(), "unknown"), "idle");
    let state = state.submit();
    assert_eq!(state.match_status(cases(), "unknown"), "loading");
    let state = state.resolve(1);
    assert_eq!(state.match_status(cases(), "unknown"), "done");
    let state = state.refresh();
    assert_eq!(state.match_status(cases(), "unknown"), "reloading");
    let state = state.reject(AsyncError::None);
    assert_eq!(state.match_status(cases(), "unknown"), "failed");
}

#[test]
fn test_match_status_functions() {
    let resolved: AsyncState<i32> = AsyncState::new(None).submit().resolve(20);
    let label = resolved.match_status(
        MatchCases::new().resolved_with(|value: &i32| format!("got {value}")),
        String::new(),
    );
    assert_eq!(label, "got 20");

    let rejected: AsyncState<i32> = AsyncState::new(None).submit().reject(AsyncError::Timeout);
    let label = rejected.match_status(
        MatchCases::new().rejected_with(|error: &AsyncError| error.to_string()),
        String::new(),
    );
    assert_eq!(label, "deadline has elapsed!");
}

#[test]
fn test_match_status_falls_back_to_default() {
    let state: AsyncState<i32> = AsyncState::new(None).submit();
    let label = state.match_status(MatchCases::new().resolved("done"), "default");
    assert_eq!(label, "default");
}

#[cfg(feature = "serde")]
#[test]
fn test_flag_view_serde() {
    let state: AsyncState<i32> = AsyncState::new(None).submit();
    let view = FlagView::from(&state);
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["pending"], serde_json::Value::Bool(true));
    assert_eq!(json["submitType"], serde_json::json!("submit"));
    assert!(json["pendingAt"].is_string());
    assert!(json["defaultValue"].is_null());
}
