use crate::AsyncError;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// The lifecycle event an action stands for.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ActionKind {
    Reset,
    Submit,
    Refresh,
    /// Deprecated alias of [`ActionKind::Refresh`].
    Pending,
    Resolved,
    Rejected,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        ActionKind::Reset,
        ActionKind::Submit,
        ActionKind::Refresh,
        ActionKind::Pending,
        ActionKind::Resolved,
        ActionKind::Rejected,
    ];

    pub fn suffix(&self) -> &'static str {
        match self {
            ActionKind::Reset => "__RESET",
            ActionKind::Submit => "__SUBMIT",
            ActionKind::Refresh => "__REFRESH",
            ActionKind::Pending => "__PENDING",
            ActionKind::Resolved => "__RESOLVED",
            ActionKind::Rejected => "__REJECTED",
        }
    }

    /// Splits `action_type` into its kind, if it was generated for `base_type`.
    pub fn parse(base_type: &str, action_type: &str) -> Option<ActionKind> {
        let suffix = action_type.strip_prefix(base_type)?;
        ActionKind::ALL
            .into_iter()
            .find(|kind| kind.suffix() == suffix)
    }
}

/// `"{base_type}__{KIND}"`
pub fn action_type(base_type: &str, kind: ActionKind) -> String {
    format!("{base_type}{}", kind.suffix())
}

/// What an action carries.
#[derive(Clone)]
pub enum Payload {
    Empty,
    Value(Arc<dyn Any + Send + Sync>),
    Error(AsyncError),
}

impl Payload {
    pub fn value<V: Any + Send + Sync>(value: V) -> Self {
        Payload::Value(Arc::new(value))
    }

    /// The carried value, if there is one of type `V`.
    pub fn downcast_ref<V: Any>(&self) -> Option<&V> {
        match self {
            Payload::Value(value) => value.downcast_ref::<V>(),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AsyncError> {
        match self {
            Payload::Error(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::Empty)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Empty => f.write_str("Empty"),
            Payload::Value(_) => f.write_str("Value(..)"),
            Payload::Error(error) => f.debug_tuple("Error").field(error).finish(),
        }
    }
}

/// A message describing one lifecycle event for one base type.
#[derive(Debug, Clone)]
pub struct Action {
    pub action_type: String,
    pub payload: Payload,
    /// A meta update accompanying a resolved value.
    pub extra: Option<Payload>,
}

impl Action {
    pub fn new(action_type: impl Into<String>, payload: Payload) -> Self {
        Action {
            action_type: action_type.into(),
            payload,
            extra: None,
        }
    }

    pub fn with_extra(self, extra: Payload) -> Self {
        Action {
            extra: Some(extra),
            ..self
        }
    }
}

/// Creates the actions of one base type.
///
/// `P` is the request payload of submit and refresh, `V` the resolved value.
pub struct AsyncActions<P, V> {
    base_type: String,
    _types: PhantomData<fn(P) -> V>,
}

impl<P, V> Clone for AsyncActions<P, V> {
    fn clone(&self) -> Self {
        AsyncActions {
            base_type: self.base_type.clone(),
            _types: PhantomData,
        }
    }
}

impl<P, V> fmt::Debug for AsyncActions<P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncActions")
            .field("base_type", &self.base_type)
            .finish()
    }
}

impl<P, V> AsyncActions<P, V>
where
    P: Any + Send + Sync,
    V: Any + Send + Sync,
{
    pub fn new(base_type: impl Into<String>) -> Self {
        AsyncActions {
            base_type: base_type.into(),
            _types: PhantomData,
        }
    }

    pub fn base_type(&self) -> &str {
        &self.base_type
    }

    pub fn type_of(&self, kind: ActionKind) -> String {
        action_type(&self.base_type, kind)
    }

    pub fn reset(&self) -> Action {
        Action::new(self.type_of(ActionKind::Reset), Payload::Empty)
    }

    pub fn submit(&self, payload: P) -> Action {
        Action::new(self.type_of(ActionKind::Submit), Payload::value(payload))
    }

    pub fn refresh(&self, payload: P) -> Action {
        Action::new(self.type_of(ActionKind::Refresh), Payload::value(payload))
    }

    pub fn pending(&self) -> Action {
        Action::new(self.type_of(ActionKind::Pending), Payload::Empty)
    }

    pub fn resolved(&self, value: V) -> Action {
        Action::new(self.type_of(ActionKind::Resolved), Payload::value(value))
    }

    pub fn resolved_with_meta<M: Any + Send + Sync>(&self, value: V, meta: M) -> Action {
        self.resolved(value).with_extra(Payload::value(meta))
    }

    pub fn rejected(&self, error: AsyncError) -> Action {
        Action::new(self.type_of(ActionKind::Rejected), Payload::Error(error))
    }
}
