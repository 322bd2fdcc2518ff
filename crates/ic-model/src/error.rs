// error.rs - Error types for the goal model.

use thiserror::Error;

use crate::ids::GoalId;
use crate::status::GoalStatus;

/// Errors raised by the model itself (independent of any store).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// Invalid status transition.
    #[error("invalid transition from {from} to {to} for goal {goal_id}")]
    InvalidTransition {
        goal_id: GoalId,
        from: GoalStatus,
        to: GoalStatus,
    },
}
