use crate::{AsyncError, AsyncState, ExecutionResult, StateCell};
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// How an update drives its cell.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct UpdateOptions {
    /// Keep the current value while pending instead of falling back to the default.
    pub refresh: bool,
    /// Hold a successful result until this long after the update started.
    pub minimum_pending: Option<Duration>,
    /// Reject with [`AsyncError::Timeout`] if the operation takes longer.
    pub timeout: Option<Duration>,
}

impl UpdateOptions {
    pub fn submit() -> Self {
        UpdateOptions::default()
    }

    pub fn refresh() -> Self {
        UpdateOptions {
            refresh: true,
            ..UpdateOptions::default()
        }
    }

    pub fn with_minimum_pending(self, minimum_pending: Duration) -> Self {
        UpdateOptions {
            minimum_pending: Some(minimum_pending),
            ..self
        }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        UpdateOptions {
            timeout: Some(timeout),
            ..self
        }
    }
}

/// What an update did to its cell.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum UpdateOutcome<T, M = ()> {
    /// The update settled the cell; this is the state it wrote.
    Applied(AsyncState<T, M>),
    /// A newer update or a cancel took over the cell before this one settled.
    /// Holds the cell's state at that moment, which this update left untouched.
    Superseded(AsyncState<T, M>),
}

impl<T, M> UpdateOutcome<T, M> {
    pub fn is_applied(&self) -> bool {
        matches!(self, UpdateOutcome::Applied(_))
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, UpdateOutcome::Superseded(_))
    }

    pub fn state(&self) -> &AsyncState<T, M> {
        match self {
            UpdateOutcome::Applied(state) | UpdateOutcome::Superseded(state) => state,
        }
    }

    pub fn into_state(self) -> AsyncState<T, M> {
        match self {
            UpdateOutcome::Applied(state) | UpdateOutcome::Superseded(state) => state,
        }
    }
}

/// Runs `operation` against `cell`. See [`update_state_with`].
pub async fn update_state<C, T, M, R, F>(
    cell: &C,
    operation: F,
    options: UpdateOptions,
) -> UpdateOutcome<T, M>
where
    C: StateCell<T, M>,
    T: Clone,
    M: Clone,
    F: Future<Output = R>,
    R: ExecutionResult<T>,
{
    update_state_with(cell, move || operation, options).await
}

/// Marks `cell` pending, runs the operation produced by `supplier`, and settles
/// the cell with its result.
///
/// The pending transition is applied before `supplier` is called. The
/// generation it stamps is the update's fencing token: the terminal transition
/// is only written if the cell is still on that generation, so an update that
/// was overtaken by a later submit, refresh, cancel or reset never overwrites
/// the newer state.
///
/// Operation failures and timeouts are folded into the rejected state and never
/// returned as errors.
pub async fn update_state_with<C, T, M, R, F, S>(
    cell: &C,
    supplier: S,
    options: UpdateOptions,
) -> UpdateOutcome<T, M>
where
    C: StateCell<T, M>,
    T: Clone,
    M: Clone,
    S: FnOnce() -> F,
    F: Future<Output = R>,
    R: ExecutionResult<T>,
{
    let started = Instant::now();
    let pending = cell.replace(|state| {
        if options.refresh {
            state.refresh()
        } else {
            state.submit()
        }
    });
    let token = pending.generation();

    let operation = supplier();
    let outcome = match options.timeout {
        Some(limit) => match tokio::time::timeout(limit, operation).await {
            Ok(result) => result.into_outcome(),
            Err(_) => Err(AsyncError::Timeout),
        },
        None => operation.await.into_outcome(),
    };

    if outcome.is_ok() {
        if let Some(minimum) = options.minimum_pending {
            tokio::time::sleep_until(started + minimum).await;
        }
    }

    settle(cell, token, outcome)
}

fn settle<C, T, M>(cell: &C, token: u64, outcome: Result<T, AsyncError>) -> UpdateOutcome<T, M>
where
    C: StateCell<T, M>,
    T: Clone,
    M: Clone,
{
    if let Err(error) = &outcome {
        warn!(generation = token, %error, "updating async state failed");
    }

    let written = cell.try_replace(move |current| {
        if current.generation() != token {
            return None;
        }
        Some(match outcome {
            Ok(value) => current.clone().resolve(value),
            Err(error) => current.clone().reject(error),
        })
    });

    match written {
        Ok(state) => UpdateOutcome::Applied(state),
        Err(current) => {
            debug!(
                generation = token,
                current = current.generation(),
                "async state update superseded"
            );
            UpdateOutcome::Superseded(current)
        }
    }
}

/// Delays updates on a cell so that only the last call within `delay` runs.
///
/// Dropping the debouncer, or calling [`Debounced::cancel`], releases the
/// pending timer. Updates that already started are not interrupted.
pub struct Debounced<C> {
    cell: C,
    delay: Duration,
    scheduled: Mutex<Option<CancellationToken>>,
}

impl<C> Debounced<C> {
    pub fn new(cell: C, delay: Duration) -> Self {
        Debounced {
            cell,
            delay,
            scheduled: Mutex::new(None),
        }
    }

    pub fn cell(&self) -> &C {
        &self.cell
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules an update, replacing the previous one if it has not fired yet.
    ///
    /// The handle yields `Some(outcome)` once the update ran, or `None` if a
    /// later call or a cancel replaced it first.
    pub fn call<T, M, R, F, S>(
        &self,
        supplier: S,
        options: UpdateOptions,
    ) -> JoinHandle<Option<UpdateOutcome<T, M>>>
    where
        C: StateCell<T, M> + Clone + Send + Sync + 'static,
        T: Clone + Send + 'static,
        M: Clone + Send + 'static,
        S: FnOnce() -> F + Send + 'static,
        F: Future<Output = R> + Send + 'static,
        R: ExecutionResult<T> + Send + 'static,
    {
        let token = CancellationToken::new();
        if let Some(previous) = self.swap_scheduled(Some(token.clone())) {
            previous.cancel();
        }

        let cell = self.cell.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!("debounced update replaced before firing");
                    None
                }
                _ = tokio::time::sleep(delay) => {
                    Some(update_state_with(&cell, supplier, options).await)
                }
            }
        })
    }

    /// Drops the scheduled update, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.swap_scheduled(None) {
            previous.cancel();
        }
    }

    fn swap_scheduled(&self, next: Option<CancellationToken>) -> Option<CancellationToken> {
        let mut scheduled = self.scheduled.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *scheduled, next)
    }
}

impl<C> Drop for Debounced<C> {
    fn drop(&mut self) {
        self.cancel();
    }
}
