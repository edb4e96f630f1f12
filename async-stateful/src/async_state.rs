use crate::{AsyncError, Flags, StateError, Status};
use chrono::{DateTime, Utc};
use std::fmt;

/// Wall-clock instant stamped by transitions.
pub type Timestamp = DateTime<Utc>;

/// Distinguishes a first load from a reload.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum SubmitType {
    /// The value falls back to the default while pending.
    Submit,
    /// The prior value is kept while pending.
    Refresh,
}

/// Where an operation currently is in its lifecycle.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Phase<T> {
    Pristine,
    Submitting,
    Refreshing { retained: Option<T> },
    Resolved { value: T },
    Rejected { error: AsyncError },
    Cancelled,
}

impl<T> Phase<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Phase::Submitting | Phase::Refreshing { .. })
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Phase::Resolved { .. } | Phase::Rejected { .. })
    }

    /// The payload carried by this phase, either resolved or retained by a refresh.
    pub fn value_ref(&self) -> Option<&T> {
        match self {
            Phase::Refreshing { retained } => retained.as_ref(),
            Phase::Resolved { value } => Some(value),
            _ => None,
        }
    }

    fn into_value(self) -> Option<T> {
        match self {
            Phase::Refreshing { retained } => retained,
            Phase::Resolved { value } => Some(value),
            _ => None,
        }
    }

    fn map<U, F>(self, f: F) -> Phase<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Phase::Pristine => Phase::Pristine,
            Phase::Submitting => Phase::Submitting,
            Phase::Refreshing { retained } => Phase::Refreshing {
                retained: retained.map(f),
            },
            Phase::Resolved { value } => Phase::Resolved { value: f(value) },
            Phase::Rejected { error } => Phase::Rejected { error },
            Phase::Cancelled => Phase::Cancelled,
        }
    }
}

/// The instants at which each flag was last raised.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Timestamps {
    pub pending_at: Option<Timestamp>,
    pub resolved_at: Option<Timestamp>,
    pub rejected_at: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,
    pub settled_at: Option<Timestamp>,
}

impl Timestamps {
    fn latest(&self) -> Option<Timestamp> {
        [
            self.pending_at,
            self.resolved_at,
            self.rejected_at,
            self.cancelled_at,
            self.settled_at,
        ]
        .into_iter()
        .flatten()
        .max()
    }
}

/// Options accepted by [`AsyncState::create`].
pub struct CreateOptions<M> {
    pub pending: bool,
    pub meta: Option<M>,
}

impl<M> Default for CreateOptions<M> {
    fn default() -> Self {
        CreateOptions {
            pending: false,
            meta: None,
        }
    }
}

impl<M> CreateOptions<M> {
    pub fn pending() -> Self {
        CreateOptions {
            pending: true,
            meta: None,
        }
    }

    pub fn with_meta(self, meta: M) -> Self {
        CreateOptions {
            meta: Some(meta),
            ..self
        }
    }
}

/// Options accepted by [`AsyncState::submit_with`] and [`AsyncState::refresh_with`].
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct SubmitOptions {
    /// Overrides the stamped `pending_at`.
    pub pending_at: Option<Timestamp>,
}

/// A change to a state's meta, either a direct value or a function of the current one.
pub enum MetaUpdate<M> {
    Set(Option<M>),
    Update(Box<dyn FnOnce(Option<M>) -> Option<M> + Send>),
}

impl<M> MetaUpdate<M> {
    pub fn set(meta: M) -> Self {
        MetaUpdate::Set(Some(meta))
    }

    pub fn clear() -> Self {
        MetaUpdate::Set(None)
    }

    pub fn update<F>(updater: F) -> Self
    where
        F: FnOnce(Option<M>) -> Option<M> + Send + 'static,
    {
        MetaUpdate::Update(Box::new(updater))
    }

    fn apply(self, current: Option<M>) -> Option<M> {
        match self {
            MetaUpdate::Set(meta) => meta,
            MetaUpdate::Update(updater) => updater(current),
        }
    }
}

impl<M> From<M> for MetaUpdate<M> {
    fn from(meta: M) -> Self {
        MetaUpdate::set(meta)
    }
}

impl<M: fmt::Debug> fmt::Debug for MetaUpdate<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaUpdate::Set(meta) => f.debug_tuple("Set").field(meta).finish(),
            MetaUpdate::Update(_) => f.write_str("Update(..)"),
        }
    }
}

/// An immutable snapshot of one asynchronous operation's lifecycle.
///
/// Every transition consumes the state and returns the next one; clone first
/// if the previous snapshot is still needed. The `generation` counter advances
/// on every transition that starts or abandons an operation (`submit`,
/// `refresh`, `cancel`, `reset`) and is what the update orchestrator compares
/// to detect superseded updates.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AsyncState<T, M = ()> {
    default_value: Option<T>,
    phase: Phase<T>,
    submit_type: Option<SubmitType>,
    timestamps: Timestamps,
    meta: Option<M>,
    generation: u64,
}

impl<T, M> Default for AsyncState<T, M> {
    fn default() -> Self {
        AsyncState::new(None)
    }
}

impl<T, M> AsyncState<T, M> {
    /// A pristine state falling back to `default_value`.
    pub fn new(default_value: Option<T>) -> Self {
        AsyncState {
            default_value,
            phase: Phase::Pristine,
            submit_type: None,
            timestamps: Timestamps::default(),
            meta: None,
            generation: 0,
        }
    }

    /// A pristine state, or a submitting one when `options.pending` is set.
    pub fn create(default_value: Option<T>, options: CreateOptions<M>) -> Self {
        let state = AsyncState {
            meta: options.meta,
            ..AsyncState::new(default_value)
        };
        if options.pending {
            state.submit()
        } else {
            state
        }
    }

    fn stamp(&self) -> Timestamp {
        let now = Utc::now();
        match self.timestamps.latest() {
            Some(latest) if latest > now => latest,
            _ => now,
        }
    }

    /// A pristine state with the same default value and meta.
    ///
    /// Starts a new generation, so updates still in flight are fenced out.
    pub fn reset(self) -> Self {
        AsyncState {
            meta: self.meta,
            generation: self.generation + 1,
            ..AsyncState::new(self.default_value)
        }
    }

    /// Marks a first load as pending. The value falls back to the default.
    pub fn submit(self) -> Self {
        self.submit_with(SubmitOptions::default())
    }

    /// Like [`submit`](Self::submit), stamping `options.pending_at` if given.
    pub fn submit_with(self, options: SubmitOptions) -> Self {
        let pending_at = options.pending_at.unwrap_or_else(|| self.stamp());
        AsyncState {
            phase: Phase::Submitting,
            submit_type: Some(SubmitType::Submit),
            timestamps: Timestamps {
                pending_at: Some(pending_at),
                ..self.timestamps
            },
            generation: self.generation + 1,
            ..self
        }
    }

    /// Marks a reload as pending, keeping the current value readable.
    pub fn refresh(self) -> Self {
        self.refresh_with(SubmitOptions::default())
    }

    pub fn refresh_with(self, options: SubmitOptions) -> Self {
        let pending_at = options.pending_at.unwrap_or_else(|| self.stamp());
        AsyncState {
            phase: Phase::Refreshing {
                retained: self.phase.into_value(),
            },
            submit_type: Some(SubmitType::Refresh),
            timestamps: Timestamps {
                pending_at: Some(pending_at),
                ..self.timestamps
            },
            generation: self.generation + 1,
            ..self
        }
    }

    /// Settles with `value`, clearing any previous error.
    pub fn resolve(self, value: T) -> Self {
        let at = self.stamp();
        AsyncState {
            phase: Phase::Resolved { value },
            timestamps: Timestamps {
                resolved_at: Some(at),
                settled_at: Some(at),
                ..self.timestamps
            },
            ..self
        }
    }

    /// Settles with `value` and applies a meta update in the same step.
    pub fn resolve_with_meta(mut self, value: T, update: impl Into<MetaUpdate<M>>) -> Self {
        let meta = update.into().apply(self.meta.take());
        AsyncState {
            meta,
            ..self.resolve(value)
        }
    }

    /// Resolves to `value`, refusing to resolve to nothing.
    pub fn try_resolve(self, value: Option<T>) -> Result<Self, StateError> {
        match value {
            Some(value) => Ok(self.resolve(value)),
            None => Err(StateError::invalid_argument(
                "cannot resolve an async state to nothing, did you mean reset()?",
            )),
        }
    }

    /// Settles with `error`. The value falls back to the default.
    pub fn reject(self, error: AsyncError) -> Self {
        let at = self.stamp();
        AsyncState {
            phase: Phase::Rejected { error },
            timestamps: Timestamps {
                rejected_at: Some(at),
                settled_at: Some(at),
                ..self.timestamps
            },
            ..self
        }
    }

    /// Abandons the current operation without settling.
    ///
    /// The value falls back to the default and the generation advances, so an
    /// update that completes afterwards is not written.
    pub fn cancel(self) -> Self {
        let at = self.stamp();
        AsyncState {
            phase: Phase::Cancelled,
            timestamps: Timestamps {
                cancelled_at: Some(at),
                ..self.timestamps
            },
            generation: self.generation + 1,
            ..self
        }
    }

    /// Replaces the value of a resolved state.
    ///
    /// Fails with [`StateError::InvalidState`] for any other status.
    pub fn patch<F>(self, patcher: F) -> Result<Self, StateError>
    where
        F: FnOnce(T) -> T,
    {
        let status = self.status();
        match self.phase {
            Phase::Resolved { value } => Ok(AsyncState {
                phase: Phase::Resolved {
                    value: patcher(value),
                },
                ..self
            }),
            _ => Err(StateError::InvalidState { status }),
        }
    }

    /// Projects the value and the default value to another payload type.
    pub fn map<U, F>(self, mut mapper: F) -> AsyncState<U, M>
    where
        F: FnMut(T) -> U,
    {
        AsyncState {
            phase: self.phase.map(&mut mapper),
            default_value: self.default_value.map(&mut mapper),
            submit_type: self.submit_type,
            timestamps: self.timestamps,
            meta: self.meta,
            generation: self.generation,
        }
    }

    /// Replaces or transforms the meta, leaving the lifecycle untouched.
    pub fn update_meta(mut self, update: impl Into<MetaUpdate<M>>) -> Self {
        let meta = update.into().apply(self.meta.take());
        AsyncState { meta, ..self }
    }

    /// The resolved or retained value, otherwise the default value.
    pub fn value(&self) -> Option<&T> {
        self.phase.value_ref().or(self.default_value.as_ref())
    }

    /// Consumes the state, returning what [`value`](Self::value) would borrow.
    pub fn into_value(self) -> Option<T> {
        match self.phase.into_value() {
            Some(value) => Some(value),
            None => self.default_value,
        }
    }

    pub fn default_value(&self) -> Option<&T> {
        self.default_value.as_ref()
    }

    /// The error, only while rejected.
    pub fn error(&self) -> Option<&AsyncError> {
        match &self.phase {
            Phase::Rejected { error } => Some(error),
            _ => None,
        }
    }

    pub fn meta(&self) -> Option<&M> {
        self.meta.as_ref()
    }

    pub fn phase(&self) -> &Phase<T> {
        &self.phase
    }

    pub fn submit_type(&self) -> Option<SubmitType> {
        self.submit_type
    }

    /// The fencing token of this lineage. Never decreases.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    /// Returns true while submitting or refreshing.
    pub fn is_pending(&self) -> bool {
        self.phase.is_pending()
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.phase, Phase::Resolved { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self.phase, Phase::Rejected { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.phase, Phase::Cancelled)
    }

    /// Returns true once resolved or rejected. Cancelled states are not settled.
    pub fn is_settled(&self) -> bool {
        self.phase.is_settled()
    }

    /// Returns true if nothing is pending or settled, including after a cancel.
    pub fn is_pristine(&self) -> bool {
        self.status() == Status::Pristine
    }

    pub fn pending_at(&self) -> Option<Timestamp> {
        self.timestamps.pending_at
    }

    pub fn resolved_at(&self) -> Option<Timestamp> {
        self.timestamps.resolved_at
    }

    pub fn rejected_at(&self) -> Option<Timestamp> {
        self.timestamps.rejected_at
    }

    pub fn cancelled_at(&self) -> Option<Timestamp> {
        self.timestamps.cancelled_at
    }

    pub fn settled_at(&self) -> Option<Timestamp> {
        self.timestamps.settled_at
    }

    /// The boolean view of the phase.
    pub fn flags(&self) -> Flags {
        Flags {
            pending: self.is_pending(),
            resolved: self.is_resolved(),
            rejected: self.is_rejected(),
            cancelled: self.is_cancelled(),
            settled: self.is_settled(),
            submit_type: self.submit_type,
        }
    }

    /// The discrete status. Never [`Status::Invalid`] for a state built
    /// through transitions.
    pub fn status(&self) -> Status {
        self.flags().status()
    }

    /// Moves the generation past `generation`, keeping everything else.
    pub(crate) fn fenced_after(self, generation: u64) -> Self {
        AsyncState {
            generation: self.generation.max(generation + 1),
            ..self
        }
    }
}
