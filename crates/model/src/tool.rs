use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One external tool call embedded in a [`crate::Message`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInvocation {
    /// Unique identifier of this call, stable for its whole lifetime.
    pub tool_call_id: String,
    /// Name of the tool, which decides how its result is rendered.
    pub tool_name: String,
    /// Arguments the assistant passed to the tool.
    #[serde(default)]
    pub args: Value,
    /// Where the call currently is in its lifecycle.
    #[serde(flatten)]
    pub state: ToolState,
}

/// Lifecycle state of a [`ToolInvocation`].
///
/// States only move forward: `partial-call` -> `call` -> one of the
/// terminal states (`result`, `error`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum ToolState {
    /// The assistant is still streaming the call arguments.
    PartialCall,
    /// The call has been dispatched and its result is awaited.
    Call,
    /// The result has been received.
    Result {
        /// Tool-specific payload, either structured or a JSON string.
        #[serde(default)]
        result: Value,
    },
    /// The call failed and will not produce a result.
    Error {
        /// Human readable reason.
        #[serde(default)]
        error: String,
    },
}

impl ToolState {
    /// Returns the wire name of this state.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            ToolState::PartialCall => "partial-call",
            ToolState::Call => "call",
            ToolState::Result { .. } => "result",
            ToolState::Error { .. } => "error",
        }
    }

    /// Returns `true` if no further transition is possible.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, ToolState::Result { .. } | ToolState::Error { .. })
    }

    /// Returns `true` while the call is dispatched and awaiting its result.
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, ToolState::Call)
    }

    #[inline]
    fn rank(&self) -> u8 {
        match self {
            ToolState::PartialCall => 0,
            ToolState::Call => 1,
            ToolState::Result { .. } | ToolState::Error { .. } => 2,
        }
    }
}

impl ToolInvocation {
    /// Creates an invocation in the `call` state.
    #[inline]
    pub fn call<I: Into<String>, N: Into<String>>(
        tool_call_id: I,
        tool_name: N,
    ) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            args: Value::Null,
            state: ToolState::Call,
        }
    }

    /// Sets the arguments.
    #[inline]
    pub fn with_args(mut self, args: Value) -> Self {
        self.args = args;
        self
    }

    /// Moves this invocation into the `result` state.
    #[inline]
    pub fn with_result(mut self, result: Value) -> Self {
        self.state = ToolState::Result { result };
        self
    }

    /// Returns the result payload, if the call has produced one.
    #[inline]
    pub fn result(&self) -> Option<&Value> {
        match &self.state {
            ToolState::Result { result } => Some(result),
            _ => None,
        }
    }

    /// Applies a newer delivery of the same invocation.
    ///
    /// Returns `Ok(true)` if the state changed, `Ok(false)` if the delivery
    /// carried nothing new. A delivery that would move the state backwards,
    /// or replace one terminal state with a different one, is rejected and
    /// leaves `self` untouched.
    pub fn advance(&mut self, next: &ToolInvocation) -> Result<bool, TransitionError> {
        if next.state.rank() < self.state.rank() {
            return Err(TransitionError::new(
                TransitionErrorKind::Regression,
                &self.state,
                &next.state,
            ));
        }
        if self.state.is_terminal() {
            if self.state == next.state {
                return Ok(false);
            }
            return Err(TransitionError::new(
                TransitionErrorKind::AlreadyResolved,
                &self.state,
                &next.state,
            ));
        }

        // Arguments may still be streaming in until the call is resolved.
        if self.args != next.args {
            self.args = next.args.clone();
        }
        if self.state == next.state {
            return Ok(false);
        }
        self.state = next.state.clone();
        Ok(true)
    }
}

/// Why a tool state transition was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionErrorKind {
    /// The delivery would move the state backwards.
    Regression,
    /// The invocation is already terminal with a different outcome.
    AlreadyResolved,
}

impl Display for TransitionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionErrorKind::Regression => write!(f, "State regression"),
            TransitionErrorKind::AlreadyResolved => write!(f, "Already resolved"),
        }
    }
}

/// Describes a rejected tool state transition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TransitionError {
    kind: TransitionErrorKind,
    from: &'static str,
    to: &'static str,
}

impl TransitionError {
    #[inline]
    fn new(kind: TransitionErrorKind, from: &ToolState, to: &ToolState) -> Self {
        Self {
            kind,
            from: from.name(),
            to: to.name(),
        }
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> TransitionErrorKind {
        self.kind
    }
}

impl Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.kind, self.from, self.to)
    }
}

impl std::error::Error for TransitionError {}
