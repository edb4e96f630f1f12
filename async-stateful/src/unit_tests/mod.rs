use crate::redux::{AsyncActions, AsyncStateReducer};
use crate::{AsyncError, AsyncState, State};

// Import test modules
mod async_error_test;
mod execution_result_test;
mod status_test;

mod stateful_future_test;

pub const USER: &str = "USER";
pub const POSTS: &str = "POSTS";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TestState {
    pub user: AsyncState<String>,
    pub posts: AsyncState<Vec<String>, u32>,
}

impl State for TestState {}

impl TestState {
    pub fn set_user(self, user: AsyncState<String>) -> Self {
        Self { user, ..self }
    }
}

pub fn user_actions() -> AsyncActions<u64, String> {
    AsyncActions::new(USER)
}

pub fn posts_actions() -> AsyncActions<(), Vec<String>> {
    AsyncActions::new(POSTS)
}

pub fn test_reducer() -> AsyncStateReducer<TestState> {
    AsyncStateReducer::new()
        .field(
            USER,
            |state: &TestState| &state.user,
            |state: &mut TestState, user| state.user = user,
        )
        .field(
            POSTS,
            |state: &TestState| &state.posts,
            |state: &mut TestState, posts| state.posts = posts,
        )
}

/// Every state reachable from pristine in up to three transitions.
pub fn reachable_states() -> Vec<AsyncState<String>> {
    type Transition = fn(AsyncState<String>) -> AsyncState<String>;
    let transitions: [Transition; 6] = [
        AsyncState::submit,
        AsyncState::refresh,
        |state| state.resolve("value".to_string()),
        |state| state.reject(AsyncError::message("failed")),
        AsyncState::cancel,
        AsyncState::reset,
    ];

    let mut frontier = vec![AsyncState::new(Some("default".to_string()))];
    let mut reached = frontier.clone();
    for _ in 0..3 {
        frontier = frontier
            .iter()
            .flat_map(|state| transitions.iter().map(move |transition| transition(state.clone())))
            .collect();
        reached.extend(frontier.iter().cloned());
    }
    reached
}
