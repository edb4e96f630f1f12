use crate::Status;
use thiserror::Error;

/// Represents the failure of an asynchronous operation.
///
/// This is the error that gets stored inside a rejected [`AsyncState`](crate::AsyncState).
/// It never escapes the update orchestrator as an `Err`; callers observe it by
/// reading the settled state.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum AsyncError {
    /// A general error with a message describing what went wrong.
    #[error("{0}")]
    Error(String),

    /// An operation returned None when a value was expected.
    #[error("Operation returned None!")]
    None,

    /// The operation did not settle before its deadline.
    #[error("deadline has elapsed!")]
    Timeout,
}

impl AsyncError {
    /// Creates a general error from anything that can be turned into a message.
    pub fn message(message: impl Into<String>) -> Self {
        AsyncError::Error(message.into())
    }

    /// Returns true if this error represents a None result.
    pub fn is_none(&self) -> bool {
        matches!(self, AsyncError::None)
    }

    /// Returns true if this error is a general error with a message.
    pub fn is_error(&self) -> bool {
        matches!(self, AsyncError::Error { .. })
    }

    /// Returns true if this error represents a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, AsyncError::Timeout)
    }
}

/// Misuse of the state API, surfaced to the caller immediately and never
/// stored in a state.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum StateError {
    /// An argument the operation cannot accept, e.g. resolving to nothing.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation is not allowed in the state's current status.
    #[error("can only patch resolved states, state was {status}")]
    InvalidState { status: Status },
}

impl StateError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        StateError::InvalidArgument(message.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, StateError::InvalidArgument(_))
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self, StateError::InvalidState { .. })
    }
}
