// status.rs - GoalStatus: the lifecycle state of a goal.
//
// The state machine:
//   Draft → Active → Closed → Archived
//   Closed → Active            (reopen)
//   Draft/Active → Archived    (archive)
//   Archived → Active          (legacy reactivate)
//
// Edge preconditions (hypotheses before the first intervention, an evaluation
// before closing) are guard rules in ic-policy, not part of this table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The lifecycle status of a goal.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// Newly created; situation analysis and hypotheses are being drafted.
    #[default]
    Draft,

    /// At least one intervention exists; follow-ups are being recorded.
    Active,

    /// Evaluated and closed. Only evaluation material may still be added.
    Closed,

    /// Frozen. Nothing may be added.
    Archived,
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl GoalStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [GoalStatus; 4] = [
        GoalStatus::Draft,
        GoalStatus::Active,
        GoalStatus::Closed,
        GoalStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Draft => "draft",
            GoalStatus::Active => "active",
            GoalStatus::Closed => "closed",
            GoalStatus::Archived => "archived",
        }
    }

    /// Check whether moving from this status to `next` follows an edge of
    /// the lifecycle graph.
    pub fn can_transition_to(&self, next: GoalStatus) -> bool {
        matches!(
            (self, next),
            (GoalStatus::Draft, GoalStatus::Active)
                | (GoalStatus::Active, GoalStatus::Closed)
                | (GoalStatus::Closed, GoalStatus::Active)
                | (GoalStatus::Draft, GoalStatus::Archived)
                | (GoalStatus::Active, GoalStatus::Archived)
                | (GoalStatus::Closed, GoalStatus::Archived)
                // Legacy reactivation path.
                | (GoalStatus::Archived, GoalStatus::Active)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_draft() {
        assert_eq!(GoalStatus::default(), GoalStatus::Draft);
    }

    #[test]
    fn lifecycle_edges() {
        use GoalStatus::*;
        let allowed = [
            (Draft, Active),
            (Active, Closed),
            (Closed, Active),
            (Draft, Archived),
            (Active, Archived),
            (Closed, Archived),
            (Archived, Active),
        ];
        for from in GoalStatus::ALL {
            for to in GoalStatus::ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn draft_cannot_close_directly() {
        assert!(!GoalStatus::Draft.can_transition_to(GoalStatus::Closed));
    }

    #[test]
    fn status_display_and_serde_agree() {
        for status in GoalStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }
}
