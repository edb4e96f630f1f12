use crate::AsyncError;

/// Converts what an operation produced into the outcome that settles a state.
///
/// Plain values resolve. `Result` errors reject with their message. `None`
/// rejects with [`AsyncError::None`]; payload types that may legitimately be
/// empty should be `Option<U>` themselves, in which case `None` is the
/// resolved value.
pub trait ExecutionResult<T> {
    fn into_outcome(self) -> Result<T, AsyncError>;
}

impl<T> ExecutionResult<T> for T {
    fn into_outcome(self) -> Result<T, AsyncError> {
        Ok(self)
    }
}

impl<T, E> ExecutionResult<T> for Result<T, E>
where
    E: ToString,
{
    fn into_outcome(self) -> Result<T, AsyncError> {
        self.map_err(|error| AsyncError::Error(error.to_string()))
    }
}

impl<T> ExecutionResult<T> for Option<T> {
    fn into_outcome(self) -> Result<T, AsyncError> {
        self.ok_or(AsyncError::None)
    }
}
