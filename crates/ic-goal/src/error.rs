// error.rs - Error types for goal store operations.
//
// Every failed operation leaves the store unchanged.

use std::fmt;
use std::path::PathBuf;

use ic_model::{EvidenceContext, GoalId, GoalStatus, ModelError};
use ic_policy::Guard;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of entity a lookup failed for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Goal,
    Hypothesis,
    Intervention,
    FollowUp,
    Evaluation,
    Evidence,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Goal => "goal",
            EntityKind::Hypothesis => "hypothesis",
            EntityKind::Intervention => "intervention",
            EntityKind::FollowUp => "follow-up",
            EntityKind::Evaluation => "evaluation",
            EntityKind::Evidence => "evidence",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during goal store operations.
#[derive(Debug, Error)]
pub enum GoalError {
    /// A referenced goal or child entity does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// The operation's guard denied it in the goal's current status.
    #[error("{guard} rejected for goal {goal_id} in status {status}: {reason}")]
    GuardRejected {
        goal_id: GoalId,
        guard: Guard,
        status: GoalStatus,
        reason: String,
    },

    /// A required field was empty.
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    /// Evidence points at something that does not exist in the goal.
    #[error("evidence context {context} does not exist in goal {goal_id}")]
    InvalidReference {
        goal_id: GoalId,
        context: EvidenceContext,
    },

    /// The goal model refused a status transition.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    /// Failed to serialize/deserialize goal data.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// The engine configuration file could not be parsed.
    #[error("invalid config at {path}: {source}")]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Engine configuration text could not be parsed.
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A notification dispatch failed (non-fatal).
    #[error("notification error: {0}")]
    NotificationError(String),
}

impl GoalError {
    pub fn not_found(kind: EntityKind, id: impl fmt::Display) -> Self {
        GoalError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GoalError::NotFound { .. })
    }

    pub fn is_guard_rejected(&self) -> bool {
        matches!(self, GoalError::GuardRejected { .. })
    }
}
