use crate::redux::{Action, Reducer};
use crate::{State, StateError};
use futures_signals::signal::{Mutable, MutableSignalCloned, SignalExt, SignalStream};
use std::sync::Arc;
use tracing::warn;

/// The boundary thunks dispatch through.
pub trait Dispatch: Clone + Send + Sync + 'static {
    type State;

    fn dispatch(&self, action: Action) -> Result<(), StateError>;

    fn get_state(&self) -> Self::State;
}

/// A single source of truth reduced by actions, observable as a signal.
///
/// Clones share the same state and reducer.
pub struct Store<S: State> {
    state: Mutable<S>,
    reducer: Arc<dyn Reducer<S>>,
}

impl<S: State> Clone for Store<S> {
    fn clone(&self) -> Self {
        Store {
            state: self.state.clone(),
            reducer: self.reducer.clone(),
        }
    }
}

impl<S: State> Store<S> {
    pub fn new<R>(initial_state: S, reducer: R) -> Self
    where
        R: Reducer<S> + 'static,
    {
        Store {
            state: Mutable::new(initial_state),
            reducer: Arc::new(reducer),
        }
    }

    pub fn to_stream(&self) -> SignalStream<MutableSignalCloned<S>> {
        self.state.signal_cloned().to_stream()
    }

    pub fn to_signal(&self) -> MutableSignalCloned<S> {
        self.state.signal_cloned()
    }

    pub fn get_state(&self) -> S {
        self.state.get_cloned()
    }

    /// Reduces `action` onto the current state.
    ///
    /// Subscribers are only notified if the reducer changed something.
    pub fn dispatch(&self, action: Action) -> Result<(), StateError> {
        let mut state = self.state.lock_mut();
        match self.reducer.reduce(&*state, &action) {
            Ok(Some(next)) => {
                *state = next;
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(error) => {
                warn!(action_type = %action.action_type, %error, "dispatch rejected by reducer");
                Err(error)
            }
        }
    }
}

impl<S: State> Dispatch for Store<S> {
    type State = S;

    fn dispatch(&self, action: Action) -> Result<(), StateError> {
        Store::dispatch(self, action)
    }

    fn get_state(&self) -> S {
        Store::get_state(self)
    }
}
