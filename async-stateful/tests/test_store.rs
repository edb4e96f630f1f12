use async_stateful::redux::{AsyncActions, AsyncStateReducer, Store};
use async_stateful::{AsyncState, State, Status};
use futures::StreamExt;
use std::time::Duration;

#[derive(Clone, Debug, Default, PartialEq)]
struct AppState {
    todos: AsyncState<Vec<String>>,
    clicks: u32,
}

impl State for AppState {}

fn todo_store() -> Store<AppState> {
    Store::new(
        AppState::default(),
        AsyncStateReducer::new().field(
            "TODOS",
            |state: &AppState| &state.todos,
            |state: &mut AppState, todos| state.todos = todos,
        ),
    )
}

#[tokio::test(start_paused = true)]
async fn test_unrelated_action_does_not_notify() {
    let store = todo_store();
    let actions: AsyncActions<(), Vec<String>> = AsyncActions::new("TODOS");
    let mut stream = store.to_stream();

    assert_eq!(stream.next().await, Some(AppState::default()));

    let other: AsyncActions<(), u32> = AsyncActions::new("CLICKS");
    store.dispatch(other.submit(())).unwrap();
    let quiet = tokio::time::timeout(Duration::from_millis(10), stream.next()).await;
    assert!(quiet.is_err());

    store.dispatch(actions.submit(())).unwrap();
    let next = stream.next().await.unwrap();
    assert_eq!(next.todos.status(), Status::Submitting);
    assert_eq!(next.clicks, 0);
}

#[tokio::test]
async fn test_reducer_error_leaves_state_untouched() {
    let store = todo_store();
    let wrong: AsyncActions<(), u32> = AsyncActions::new("TODOS");

    let error = store.dispatch(wrong.resolved(3)).unwrap_err();
    assert!(error.is_invalid_argument());
    assert_eq!(store.get_state(), AppState::default());
}
