use crate::redux::{Action, ActionKind};
use crate::{AsyncState, StateError};
use std::any::Any;

/// Applies actions to a state of type `S`.
///
/// `Ok(None)` means the action did not concern this reducer and the state is to
/// be kept exactly as it was, which lets callers skip change notification.
pub trait Reducer<S>: Send + Sync {
    fn reduce(&self, state: &S, action: &Action) -> Result<Option<S>, StateError>;
}

impl<S, F> Reducer<S> for F
where
    F: Fn(&S, &Action) -> Result<Option<S>, StateError> + Send + Sync,
{
    fn reduce(&self, state: &S, action: &Action) -> Result<Option<S>, StateError> {
        self(state, action)
    }
}

type FieldReducer<S> = Box<dyn Fn(&S, &Action, &mut Option<S>) -> Result<(), StateError> + Send + Sync>;

/// Reduces lifecycle actions onto the [`AsyncState`] fields of `S`, one base
/// type per field.
///
/// Only fields whose base type matches the action are replaced; the state is
/// cloned once, on the first change.
pub struct AsyncStateReducer<S> {
    fields: Vec<FieldReducer<S>>,
}

impl<S> Default for AsyncStateReducer<S> {
    fn default() -> Self {
        AsyncStateReducer { fields: Vec::new() }
    }
}

impl<S: Clone> AsyncStateReducer<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the field reached through `get`/`set` to the actions of `base_type`.
    pub fn field<T, M, G, U>(mut self, base_type: impl Into<String>, get: G, set: U) -> Self
    where
        T: Clone + Any + Send + Sync,
        M: Clone + Any + Send + Sync,
        G: Fn(&S) -> &AsyncState<T, M> + Send + Sync + 'static,
        U: Fn(&mut S, AsyncState<T, M>) + Send + Sync + 'static,
    {
        let base_type = base_type.into();
        self.fields.push(Box::new(move |state: &S, action: &Action, copy: &mut Option<S>| {
            let Some(kind) = ActionKind::parse(&base_type, &action.action_type) else {
                return Ok(());
            };
            let next = reduce_async_state(get(state).clone(), kind, action)?;
            set(copy.get_or_insert_with(|| state.clone()), next);
            Ok(())
        }));
        self
    }
}

impl<S: Clone> Reducer<S> for AsyncStateReducer<S> {
    fn reduce(&self, state: &S, action: &Action) -> Result<Option<S>, StateError> {
        let mut copy = None;
        for field in &self.fields {
            field(state, action, &mut copy)?;
        }
        Ok(copy)
    }
}

/// Applies the transition for `kind` to a single state.
pub fn reduce_async_state<T, M>(
    state: AsyncState<T, M>,
    kind: ActionKind,
    action: &Action,
) -> Result<AsyncState<T, M>, StateError>
where
    T: Clone + Any,
    M: Clone + Any,
{
    match kind {
        ActionKind::Reset => Ok(state.reset()),
        ActionKind::Submit => Ok(state.submit()),
        ActionKind::Refresh | ActionKind::Pending => Ok(state.refresh()),
        ActionKind::Resolved => {
            let value = action.payload.downcast_ref::<T>().cloned().ok_or_else(|| {
                StateError::invalid_argument(format!(
                    "{} must carry a value of the field's type",
                    action.action_type
                ))
            })?;
            match &action.extra {
                None => Ok(state.resolve(value)),
                Some(extra) => {
                    let meta = extra.downcast_ref::<M>().cloned().ok_or_else(|| {
                        StateError::invalid_argument(format!(
                            "{} carries extra that is not the field's meta type",
                            action.action_type
                        ))
                    })?;
                    Ok(state.resolve_with_meta(value, meta))
                }
            }
        }
        ActionKind::Rejected => match action.payload.error() {
            Some(error) => Ok(state.reject(error.clone())),
            None => Err(StateError::invalid_argument(format!(
                "{} must carry an error",
                action.action_type
            ))),
        },
    }
}
