// ids.rs - Strongly-typed identifiers for goals and their child entities.
//
// Every id wraps a random UUID v4, so an id is never handed out twice and a
// deleted entity's id is never reused.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh, never-before-used id.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            #[must_use]
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            #[must_use]
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

entity_id!(
    /// Identifies a [`Goal`](crate::Goal).
    GoalId
);
entity_id!(
    /// Identifies a [`Hypothesis`](crate::Hypothesis) within its goal.
    HypothesisId
);
entity_id!(
    /// Identifies an [`Intervention`](crate::Intervention) within its goal.
    InterventionId
);
entity_id!(
    /// Identifies a [`FollowUp`](crate::FollowUp) within its intervention.
    FollowUpId
);
entity_id!(
    /// Identifies an [`Evaluation`](crate::Evaluation) within its goal.
    EvaluationId
);
entity_id!(
    /// Identifies an [`Evidence`](crate::Evidence) attachment within its goal.
    EvidenceId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_distinct() {
        let a = HypothesisId::new();
        let b = HypothesisId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn id_parses_from_display() {
        let id = GoalId::new();
        let parsed: GoalId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn id_serializes_as_bare_uuid() {
        let id = EvidenceId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
    }
}
