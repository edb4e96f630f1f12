use crate::{AsyncError, AsyncState, SubmitType, Timestamp};
use std::fmt;

/// The one discrete status derived from a set of lifecycle flags.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Status {
    Pristine,
    Refreshing,
    Submitting,
    Resolved,
    Rejected,
    /// No other status matched. Only reachable from hand-built flags.
    Invalid,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Pristine => "pristine",
            Status::Refreshing => "refreshing",
            Status::Submitting => "submitting",
            Status::Resolved => "resolved",
            Status::Rejected => "rejected",
            Status::Invalid => "invalid",
        };
        f.pad(name)
    }
}

/// The boolean lifecycle flags of a state.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Flags {
    pub pending: bool,
    pub resolved: bool,
    pub rejected: bool,
    pub cancelled: bool,
    pub settled: bool,
    pub submit_type: Option<SubmitType>,
}

impl Flags {
    pub fn status(&self) -> Status {
        classify(self)
    }
}

/// Derives the status from flags, first match wins:
/// pristine, refreshing, submitting, resolved, rejected, then invalid.
pub fn classify(flags: &Flags) -> Status {
    if !flags.pending && !flags.resolved && !flags.rejected {
        return Status::Pristine;
    }
    if flags.pending && flags.submit_type == Some(SubmitType::Refresh) {
        return Status::Refreshing;
    }
    if flags.pending && flags.submit_type == Some(SubmitType::Submit) {
        return Status::Submitting;
    }
    if flags.resolved {
        return Status::Resolved;
    }
    if flags.rejected {
        return Status::Rejected;
    }
    Status::Invalid
}

/// Owned, boolean-shaped projection of an [`AsyncState`].
///
/// Serializes in camelCase with the `serde` feature, matching the flag layout
/// consumers of the record shape expect.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct FlagView<T, M = ()> {
    pub default_value: Option<T>,
    pub value: Option<T>,
    pub error: Option<AsyncError>,
    pub pending: bool,
    pub pending_at: Option<Timestamp>,
    pub resolved: bool,
    pub resolved_at: Option<Timestamp>,
    pub rejected: bool,
    pub rejected_at: Option<Timestamp>,
    pub cancelled: bool,
    pub cancelled_at: Option<Timestamp>,
    pub settled: bool,
    pub settled_at: Option<Timestamp>,
    pub submit_type: Option<SubmitType>,
    pub meta: Option<M>,
}

impl<T, M> FlagView<T, M> {
    pub fn flags(&self) -> Flags {
        Flags {
            pending: self.pending,
            resolved: self.resolved,
            rejected: self.rejected,
            cancelled: self.cancelled,
            settled: self.settled,
            submit_type: self.submit_type,
        }
    }

    pub fn status(&self) -> Status {
        classify(&self.flags())
    }
}

impl<T: Clone, M: Clone> From<&AsyncState<T, M>> for FlagView<T, M> {
    fn from(state: &AsyncState<T, M>) -> Self {
        let flags = state.flags();
        let stamps = state.timestamps();
        FlagView {
            default_value: state.default_value().cloned(),
            value: state.value().cloned(),
            error: state.error().cloned(),
            pending: flags.pending,
            pending_at: stamps.pending_at,
            resolved: flags.resolved,
            resolved_at: stamps.resolved_at,
            rejected: flags.rejected,
            rejected_at: stamps.rejected_at,
            cancelled: flags.cancelled,
            cancelled_at: stamps.cancelled_at,
            settled: flags.settled,
            settled_at: stamps.settled_at,
            submit_type: flags.submit_type,
            meta: state.meta().cloned(),
        }
    }
}

enum Arm<'a, A, V> {
    Value(V),
    Call(Box<dyn FnOnce(A) -> V + 'a>),
}

impl<A, V> Arm<'_, A, V> {
    fn run(self, argument: A) -> V {
        match self {
            Arm::Value(value) => value,
            Arm::Call(call) => call(argument),
        }
    }
}

/// Per-status cases for [`AsyncState::match_status`].
///
/// Each status holds either a literal value or a function. Resolved functions
/// receive the value, rejected functions receive the error.
pub struct MatchCases<'a, T, V> {
    pristine: Option<Arm<'a, (), V>>,
    refreshing: Option<Arm<'a, (), V>>,
    submitting: Option<Arm<'a, (), V>>,
    resolved: Option<Arm<'a, &'a T, V>>,
    rejected: Option<Arm<'a, &'a AsyncError, V>>,
    invalid: Option<Arm<'a, (), V>>,
}

impl<T, V> Default for MatchCases<'_, T, V> {
    fn default() -> Self {
        MatchCases {
            pristine: None,
            refreshing: None,
            submitting: None,
            resolved: None,
            rejected: None,
            invalid: None,
        }
    }
}

impl<'a, T, V> MatchCases<'a, T, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pristine(self, value: V) -> Self {
        MatchCases { pristine: Some(Arm::Value(value)), ..self }
    }

    pub fn pristine_with(self, f: impl FnOnce() -> V + 'a) -> Self {
        MatchCases { pristine: Some(Arm::Call(Box::new(move |()| f()))), ..self }
    }

    pub fn refreshing(self, value: V) -> Self {
        MatchCases { refreshing: Some(Arm::Value(value)), ..self }
    }

    pub fn refreshing_with(self, f: impl FnOnce() -> V + 'a) -> Self {
        MatchCases { refreshing: Some(Arm::Call(Box::new(move |()| f()))), ..self }
    }

    pub fn submitting(self, value: V) -> Self {
        MatchCases { submitting: Some(Arm::Value(value)), ..self }
    }

    pub fn submitting_with(self, f: impl FnOnce() -> V + 'a) -> Self {
        MatchCases { submitting: Some(Arm::Call(Box::new(move |()| f()))), ..self }
    }

    pub fn resolved(self, value: V) -> Self {
        MatchCases { resolved: Some(Arm::Value(value)), ..self }
    }

    pub fn resolved_with(self, f: impl FnOnce(&'a T) -> V + 'a) -> Self {
        MatchCases { resolved: Some(Arm::Call(Box::new(f))), ..self }
    }

    pub fn rejected(self, value: V) -> Self {
        MatchCases { rejected: Some(Arm::Value(value)), ..self }
    }

    pub fn rejected_with(self, f: impl FnOnce(&'a AsyncError) -> V + 'a) -> Self {
        MatchCases { rejected: Some(Arm::Call(Box::new(f))), ..self }
    }

    pub fn invalid(self, value: V) -> Self {
        MatchCases { invalid: Some(Arm::Value(value)), ..self }
    }
}

impl<T, M> AsyncState<T, M> {
    /// Picks the case for the current status, or `default` when none was given.
    pub fn match_status<'a, V>(&'a self, cases: MatchCases<'a, T, V>, default: V) -> V {
        let picked = match self.status() {
            Status::Pristine => cases.pristine.map(|arm| arm.run(())),
            Status::Refreshing => cases.refreshing.map(|arm| arm.run(())),
            Status::Submitting => cases.submitting.map(|arm| arm.run(())),
            Status::Resolved => match (cases.resolved, self.phase().value_ref()) {
                (Some(arm), Some(value)) => Some(arm.run(value)),
                _ => None,
            },
            Status::Rejected => match (cases.rejected, self.error()) {
                (Some(arm), Some(error)) => Some(arm.run(error)),
                _ => None,
            },
            Status::Invalid => cases.invalid.map(|arm| arm.run(())),
        };
        picked.unwrap_or(default)
    }
}
