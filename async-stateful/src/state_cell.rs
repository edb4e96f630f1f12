use crate::{AsyncState, CreateOptions};
use futures_signals::signal::{Mutable, MutableSignalCloned, SignalExt, SignalStream};

/// A mutable slot holding the current [`AsyncState`] of one lineage.
///
/// Every write goes through an updater that sees the most recent value, and the
/// result is visible to the next `get` or replace on any handle to the cell.
pub trait StateCell<T, M = ()> {
    fn get(&self) -> AsyncState<T, M>;

    /// Runs `updater` against the current state under the cell's lock.
    ///
    /// Returns `Ok(new_state)` if the updater produced a replacement, or
    /// `Err(current_state)` if it declined and the cell was left untouched.
    fn try_replace<F>(&self, updater: F) -> Result<AsyncState<T, M>, AsyncState<T, M>>
    where
        F: FnOnce(&AsyncState<T, M>) -> Option<AsyncState<T, M>>;

    fn replace<F>(&self, updater: F) -> AsyncState<T, M>
    where
        T: Clone,
        M: Clone,
        F: FnOnce(AsyncState<T, M>) -> AsyncState<T, M>,
    {
        match self.try_replace(|current| Some(updater(current.clone()))) {
            Ok(state) | Err(state) => state,
        }
    }
}

/// A [`StateCell`] backed by a `futures-signals` `Mutable`, so every write is
/// observable as a signal or stream.
///
/// Clones share the same underlying state.
pub struct AsyncCell<T, M = ()> {
    state: Mutable<AsyncState<T, M>>,
}

impl<T, M> Clone for AsyncCell<T, M> {
    fn clone(&self) -> Self {
        AsyncCell {
            state: self.state.clone(),
        }
    }
}

impl<T, M> Default for AsyncCell<T, M> {
    fn default() -> Self {
        AsyncCell::from_state(AsyncState::default())
    }
}

impl<T, M> AsyncCell<T, M> {
    pub fn new(default_value: Option<T>) -> Self {
        AsyncCell::from_state(AsyncState::new(default_value))
    }

    pub fn with_options(default_value: Option<T>, options: CreateOptions<M>) -> Self {
        AsyncCell::from_state(AsyncState::create(default_value, options))
    }

    pub fn from_state(state: AsyncState<T, M>) -> Self {
        AsyncCell {
            state: Mutable::new(state),
        }
    }
}

impl<T: Clone, M: Clone> AsyncCell<T, M> {
    pub fn to_signal(&self) -> MutableSignalCloned<AsyncState<T, M>> {
        self.state.signal_cloned()
    }

    pub fn to_stream(&self) -> SignalStream<MutableSignalCloned<AsyncState<T, M>>> {
        self.state.signal_cloned().to_stream()
    }
}

impl<T: Clone, M: Clone> StateCell<T, M> for AsyncCell<T, M> {
    fn get(&self) -> AsyncState<T, M> {
        self.state.get_cloned()
    }

    fn try_replace<F>(&self, updater: F) -> Result<AsyncState<T, M>, AsyncState<T, M>>
    where
        F: FnOnce(&AsyncState<T, M>) -> Option<AsyncState<T, M>>,
    {
        let mut state = self.state.lock_mut();
        match updater(&*state) {
            Some(next) => {
                *state = next;
                Ok((*state).clone())
            }
            None => Err((*state).clone()),
        }
    }
}
