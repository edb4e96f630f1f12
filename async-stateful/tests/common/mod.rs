#![allow(dead_code)]

use async_stateful::{AsyncState, StateCell};
use std::sync::{Arc, Mutex};

/// A cell that keeps every state written to it, oldest first.
#[derive(Clone)]
pub struct RecordingCell<T> {
    state: Arc<Mutex<AsyncState<T>>>,
    history: Arc<Mutex<Vec<AsyncState<T>>>>,
}

impl<T: Clone> RecordingCell<T> {
    pub fn new(default_value: Option<T>) -> Self {
        RecordingCell {
            state: Arc::new(Mutex::new(AsyncState::new(default_value))),
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn history(&self) -> Vec<AsyncState<T>> {
        self.history.lock().unwrap().clone()
    }

    pub fn writes(&self) -> usize {
        self.history.lock().unwrap().len()
    }
}

impl<T: Clone> StateCell<T> for RecordingCell<T> {
    fn get(&self) -> AsyncState<T> {
        self.state.lock().unwrap().clone()
    }

    fn try_replace<F>(&self, updater: F) -> Result<AsyncState<T>, AsyncState<T>>
    where
        F: FnOnce(&AsyncState<T>) -> Option<AsyncState<T>>,
    {
        let mut state = self.state.lock().unwrap();
        match updater(&*state) {
            Some(next) => {
                *state = next.clone();
                self.history.lock().unwrap().push(next.clone());
                Ok(next)
            }
            None => Err((*state).clone()),
        }
    }
}
