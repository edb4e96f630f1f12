use crate::redux::{ActionKind, AsyncActions, Dispatch};
use crate::{AsyncError, StateError};
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

/// How long a thunk waits before dispatching its request action.
pub const DEFAULT_PENDING_GRACE: Duration = Duration::from_millis(200);

/// Tracks the most recent thunk per base type.
///
/// Every run takes a fresh id; only the holder of the latest id for a base type
/// may dispatch follow-up actions for it.
#[derive(Debug, Default)]
pub struct ActionLocks {
    last_id: AtomicU64,
    current: Mutex<HashMap<String, u64>>,
}

impl ActionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used unless a thunk is given its own.
    pub fn shared() -> Arc<ActionLocks> {
        static SHARED: OnceLock<Arc<ActionLocks>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(ActionLocks::new())).clone()
    }

    pub fn acquire(&self, base_type: &str) -> u64 {
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(base_type.to_string(), id);
        id
    }

    pub fn is_current(&self, base_type: &str, id: u64) -> bool {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(base_type)
            == Some(&id)
    }
}

/// What a thunk ended up dispatching.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ThunkOutcome {
    Resolved,
    Rejected,
    /// A newer thunk of the same base type started; nothing was dispatched.
    Superseded,
}

/// Action creators whose submit and refresh run a handler.
pub struct AsyncThunks<P, V, H> {
    actions: AsyncActions<P, V>,
    handler: Arc<H>,
    locks: Arc<ActionLocks>,
    grace: Duration,
}

impl<P, V> AsyncActions<P, V>
where
    P: Any + Send + Sync,
    V: Any + Send + Sync,
{
    pub fn with_handler<H>(&self, handler: H) -> AsyncThunks<P, V, H> {
        AsyncThunks {
            actions: self.clone(),
            handler: Arc::new(handler),
            locks: ActionLocks::shared(),
            grace: DEFAULT_PENDING_GRACE,
        }
    }
}

impl<P, V, H> AsyncThunks<P, V, H>
where
    P: Any + Send + Sync,
    V: Any + Send + Sync,
{
    pub fn with_grace(self, grace: Duration) -> Self {
        AsyncThunks { grace, ..self }
    }

    pub fn with_locks(self, locks: Arc<ActionLocks>) -> Self {
        AsyncThunks { locks, ..self }
    }

    pub fn actions(&self) -> &AsyncActions<P, V> {
        &self.actions
    }

    pub fn submit(&self, payload: P) -> Thunk<P, V, H> {
        self.thunk(ActionKind::Submit, payload)
    }

    pub fn refresh(&self, payload: P) -> Thunk<P, V, H> {
        self.thunk(ActionKind::Refresh, payload)
    }

    fn thunk(&self, kind: ActionKind, payload: P) -> Thunk<P, V, H> {
        Thunk {
            kind,
            payload,
            actions: self.actions.clone(),
            handler: self.handler.clone(),
            locks: self.locks.clone(),
            grace: self.grace,
        }
    }
}

/// One pending submit or refresh, ready to run against a dispatcher.
#[must_use = "thunks do nothing unless run"]
pub struct Thunk<P, V, H> {
    kind: ActionKind,
    payload: P,
    actions: AsyncActions<P, V>,
    handler: Arc<H>,
    locks: Arc<ActionLocks>,
    grace: Duration,
}

impl<P, V, H> Thunk<P, V, H>
where
    P: Clone + Any + Send + Sync,
    V: Any + Send + Sync,
{
    /// Runs the handler and dispatches the resulting lifecycle actions.
    ///
    /// The request action is only dispatched if the handler is still running
    /// after the grace delay, so fast handlers go straight to resolved. Follow-up
    /// actions are dropped once a newer thunk for the same base type started.
    pub async fn run<D, F>(self, dispatcher: D) -> Result<ThunkOutcome, StateError>
    where
        D: Dispatch,
        H: Fn(P, D) -> F,
        F: Future<Output = Result<V, AsyncError>>,
    {
        let base_type = self.actions.base_type().to_string();
        let operation_id = self.locks.acquire(&base_type);
        let request = match self.kind {
            ActionKind::Refresh => self.actions.refresh(self.payload.clone()),
            _ => self.actions.submit(self.payload.clone()),
        };

        let work = (*self.handler)(self.payload, dispatcher.clone());
        tokio::pin!(work);
        let result = tokio::select! {
            biased;
            result = &mut work => result,
            _ = tokio::time::sleep(self.grace) => {
                if self.locks.is_current(&base_type, operation_id) {
                    debug!(action_type = %request.action_type, "handler still running, dispatching request");
                    dispatcher.dispatch(request)?;
                }
                work.await
            }
        };

        let (outcome, follow_up) = match result {
            Ok(value) => (ThunkOutcome::Resolved, self.actions.resolved(value)),
            Err(error) => {
                warn!(%base_type, %error, "thunk handler failed");
                (ThunkOutcome::Rejected, self.actions.rejected(error))
            }
        };

        if !self.locks.is_current(&base_type, operation_id) {
            debug!(%base_type, operation_id, "thunk superseded");
            return Ok(ThunkOutcome::Superseded);
        }
        dispatcher.dispatch(follow_up)?;
        Ok(outcome)
    }
}
