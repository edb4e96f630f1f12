use async_stateful::redux::{
    Action, AsyncActions, AsyncStateReducer, AsyncThunks, Payload, Reducer, Store,
};
use async_stateful::{AsyncError, AsyncState, State, StateError};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;

pub const TODOS: &str = "TODOS";
pub const STATS: &str = "STATS";
const TOGGLE: &str = "TODOS__TOGGLE";

#[derive(Clone, Debug, PartialEq)]
pub struct Todo {
    pub id: u32,
    pub text: String,
    pub done: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub total: usize,
    pub done: usize,
}

#[derive(Clone, Debug, Default)]
pub struct TodoState {
    pub todos: AsyncState<Vec<Todo>>,
    pub stats: AsyncState<Stats>,
}

impl State for TodoState {}

impl TodoState {
    pub fn summary(&self) -> String {
        let todos = self
            .todos
            .value()
            .map(|todos| {
                todos
                    .iter()
                    .map(|todo| format!("[{}] {}", if todo.done { "x" } else { " " }, todo.text))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        let stats = self.stats.lens(|stats| format!("{}/{}", stats.done, stats.total), "-".into());
        format!(
            "todos {:<10} {todos} | stats {:<10} {}",
            self.todos.status(),
            stats.status,
            stats.value
        )
    }
}

pub fn todo_reducer() -> impl Reducer<TodoState> {
    let lifecycle = AsyncStateReducer::new()
        .field(
            TODOS,
            |state: &TodoState| &state.todos,
            |state: &mut TodoState, todos| state.todos = todos,
        )
        .field(
            STATS,
            |state: &TodoState| &state.stats,
            |state: &mut TodoState, stats| state.stats = stats,
        );

    move |state: &TodoState, action: &Action| -> Result<Option<TodoState>, StateError> {
        if action.action_type != TOGGLE {
            return lifecycle.reduce(state, action);
        }
        let id = action
            .payload
            .downcast_ref::<u32>()
            .copied()
            .ok_or_else(|| StateError::invalid_argument("toggle needs a todo id"))?;
        let todos = state.todos.clone().patch(|todos| {
            todos
                .into_iter()
                .map(|todo| {
                    if todo.id == id {
                        Todo {
                            done: !todo.done,
                            ..todo
                        }
                    } else {
                        todo
                    }
                })
                .collect()
        })?;
        Ok(Some(TodoState {
            todos,
            ..state.clone()
        }))
    }
}

pub fn toggle(id: u32) -> Action {
    Action::new(TOGGLE, Payload::value(id))
}

type BoxedHandler<P, V> =
    fn(P, Store<TodoState>) -> Pin<Box<dyn Future<Output = Result<V, AsyncError>> + Send>>;

/// Loads the todo list, simulating `latency_ms` of network time.
pub fn load_todos() -> AsyncThunks<u64, Vec<Todo>, BoxedHandler<u64, Vec<Todo>>> {
    let actions: AsyncActions<u64, Vec<Todo>> = AsyncActions::new(TODOS);
    actions.with_handler::<BoxedHandler<u64, Vec<Todo>>>(|latency_ms, _store| {
        Box::pin(async move {
            sleep(Duration::from_millis(latency_ms)).await;
            Ok::<_, AsyncError>(vec![
                todo(1, "write the reducer"),
                todo(2, "wire the thunks"),
                todo(3, "ship it"),
            ])
        })
    })
}

/// Derives stats from whatever list the store holds.
pub fn load_stats() -> AsyncThunks<(), Stats, BoxedHandler<(), Stats>> {
    let actions: AsyncActions<(), Stats> = AsyncActions::new(STATS);
    actions.with_handler::<BoxedHandler<(), Stats>>(|(), store| {
        Box::pin(async move {
            sleep(Duration::from_millis(20)).await;
            let state = store.get_state();
            let todos = state.todos.value().ok_or(AsyncError::None)?;
            Ok::<_, AsyncError>(Stats {
                total: todos.len(),
                done: todos.iter().filter(|todo| todo.done).count(),
            })
        })
    })
}

fn todo(id: u32, text: &str) -> Todo {
    Todo {
        id,
        text: text.to_string(),
        done: false,
    }
}
