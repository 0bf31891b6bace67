use thiserror::Error;

use crate::GoalId;

/// Structural misuse of a [`GoalGraph`](crate::GoalGraph).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("goal name already in use: {0}")]
    DuplicateName(String),
    #[error("unknown goal id: {0}")]
    UnknownGoal(GoalId),
}

/// Failure of a user-supplied urgency or utility function.
///
/// These never escape evaluation; the failing term contributes `0.0`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TermError {
    #[error("{0}")]
    Failed(String),
    #[error("non-finite result: {0}")]
    NonFinite(f64),
}

impl TermError {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }
}
