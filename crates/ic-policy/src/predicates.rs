// predicates.rs - Pure guard predicates over a goal's current state.
//
// Every predicate is a plain function of the goal (and, for evidence, the
// target context type). Nothing is cached: a goal's status can change between
// two calls, so callers re-evaluate on every operation.
//
// The first eight predicates are the lifecycle rules the presentation layer
// uses for affordances (enabling buttons, showing forms). The remaining ones
// cover operations whose rule is not one of those eight.

use ic_model::{ContextType, Goal, GoalStatus};

/// Descriptive and classification fields may be edited.
pub fn can_edit_goal(goal: &Goal) -> bool {
    matches!(goal.status, GoalStatus::Draft | GoalStatus::Active)
}

/// Hypotheses may be added (and edited or deleted).
pub fn can_add_hypothesis(goal: &Goal) -> bool {
    matches!(goal.status, GoalStatus::Draft | GoalStatus::Active)
}

/// An intervention may be added. In Draft this needs at least one
/// hypothesis, and adding it promotes the goal to Active.
pub fn can_add_intervention(goal: &Goal) -> bool {
    match goal.status {
        GoalStatus::Active => true,
        GoalStatus::Draft => !goal.hypotheses.is_empty(),
        GoalStatus::Closed | GoalStatus::Archived => false,
    }
}

/// Follow-ups may be recorded (and edited or deleted).
pub fn can_add_follow_up(goal: &Goal) -> bool {
    goal.status == GoalStatus::Active
}

/// Evaluations may be added or edited.
pub fn can_add_evaluation(goal: &Goal) -> bool {
    matches!(goal.status, GoalStatus::Active | GoalStatus::Closed)
}

/// The goal may be closed: it is Active and has been evaluated at least once.
pub fn can_close_goal(goal: &Goal) -> bool {
    goal.status == GoalStatus::Active && !goal.evaluations.is_empty()
}

pub fn can_reopen_goal(goal: &Goal) -> bool {
    goal.status == GoalStatus::Closed
}

/// Evidence may be attached to a context of the given type.
///
/// Once a goal is closed only evaluation evidence may still be added;
/// an archived goal accepts none.
pub fn can_add_evidence(goal: &Goal, context_type: ContextType) -> bool {
    match goal.status {
        GoalStatus::Archived => false,
        GoalStatus::Closed => context_type == ContextType::Evaluation,
        GoalStatus::Draft | GoalStatus::Active => true,
    }
}

/// An existing intervention may be edited. Active only, which is stricter
/// than creation: an intervention created while in Draft promotes the goal,
/// so a Draft goal never holds one under normal operation.
pub fn can_update_intervention(goal: &Goal) -> bool {
    goal.status == GoalStatus::Active
}

pub fn can_delete_intervention(goal: &Goal) -> bool {
    !matches!(goal.status, GoalStatus::Closed | GoalStatus::Archived)
}

pub fn can_delete_evaluation(goal: &Goal) -> bool {
    is_not_archived(goal)
}

/// Evidence may be removed. Unlike [`can_add_evidence`] this ignores the
/// context type, so non-evaluation evidence can still be removed while Closed.
pub fn can_remove_evidence(goal: &Goal) -> bool {
    is_not_archived(goal)
}

pub fn can_update_situation_analysis(goal: &Goal) -> bool {
    is_not_archived(goal)
}

pub fn can_delete_goal(goal: &Goal) -> bool {
    is_not_archived(goal)
}

pub fn can_archive_goal(goal: &Goal) -> bool {
    is_not_archived(goal)
}

/// Archived goals may be brought back to Active only on the legacy path.
pub fn can_reactivate_goal(goal: &Goal, legacy_reactivation: bool) -> bool {
    legacy_reactivation && goal.status == GoalStatus::Archived
}

fn is_not_archived(goal: &Goal) -> bool {
    goal.status != GoalStatus::Archived
}
