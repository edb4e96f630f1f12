use crate::{AsyncError, AsyncState, Status};

/// A read-only projection of a state, computed eagerly.
#[derive(Debug, Clone, PartialEq)]
pub struct Lensed<V> {
    /// The projected value when resolved, otherwise the fallback.
    pub value: V,
    pub status: Status,
    pub pending: bool,
    pub resolved: bool,
    pub rejected: bool,
    pub cancelled: bool,
    pub settled: bool,
    pub error: Option<AsyncError>,
}

/// Projects a sub-value out of a resolved state, passing the flags through.
pub fn lens<T, M, V, F>(state: &AsyncState<T, M>, project: F, fallback: V) -> Lensed<V>
where
    F: FnOnce(&T) -> V,
{
    let flags = state.flags();
    let value = match state.phase().value_ref() {
        Some(value) if flags.resolved => project(value),
        _ => fallback,
    };
    Lensed {
        value,
        status: flags.status(),
        pending: flags.pending,
        resolved: flags.resolved,
        rejected: flags.rejected,
        cancelled: flags.cancelled,
        settled: flags.settled,
        error: state.error().cloned(),
    }
}

impl<T, M> AsyncState<T, M> {
    pub fn lens<V, F>(&self, project: F, fallback: V) -> Lensed<V>
    where
        F: FnOnce(&T) -> V,
    {
        lens(self, project, fallback)
    }
}
