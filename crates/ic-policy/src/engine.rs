// engine.rs - Lifecycle policy: one named guard per store operation.
//
// Every GoalStore mutation names the Guard it is subject to and asks the
// LifecyclePolicy for a decision before touching the goal. The rule for each
// guard is one of the predicates in `predicates.rs`; the policy adds
// readable reasons and an ordered trace of what was checked, so a rejection
// can be reported and logged instead of silently ignored.

use std::fmt;

use ic_model::{ContextType, Goal, GoalStatus};
use serde::{Deserialize, Serialize};

use crate::predicates;

/// A named guard, one per kind of mutation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Guard {
    /// Edit descriptive/classification fields (`can_edit_goal`).
    EditGoal,
    /// Hard-delete the goal (not Archived).
    DeleteGoal,
    /// Draft/Active/Closed → Archived.
    ArchiveGoal,
    /// Archived → Active on the legacy path.
    ReactivateGoal,
    /// Active → Closed (`can_close_goal`).
    CloseGoal,
    /// Closed → Active (`can_reopen_goal`).
    ReopenGoal,
    /// Add a hypothesis (`can_add_hypothesis`).
    AddHypothesis,
    /// Update or delete a hypothesis (same rule as adding).
    ModifyHypothesis,
    /// Add an intervention; promotes a Draft goal (`can_add_intervention`).
    AddIntervention,
    /// Update an intervention (Active only).
    UpdateIntervention,
    /// Delete an intervention (not Closed or Archived).
    DeleteIntervention,
    /// Add a follow-up (`can_add_follow_up`).
    AddFollowUp,
    /// Update or delete a follow-up (same rule as adding).
    ModifyFollowUp,
    /// Add an evaluation (`can_add_evaluation`).
    AddEvaluation,
    /// Update an evaluation or the evaluation plan (same rule as adding).
    ModifyEvaluation,
    /// Delete an evaluation (not Archived).
    DeleteEvaluation,
    /// Attach evidence to a context of the given type (`can_add_evidence`).
    AddEvidence(ContextType),
    /// Remove evidence (not Archived, regardless of context).
    RemoveEvidence,
    /// Replace the situation analysis (not Archived).
    UpdateSituationAnalysis,
}

impl Guard {
    pub fn name(&self) -> &'static str {
        match self {
            Guard::EditGoal => "edit_goal",
            Guard::DeleteGoal => "delete_goal",
            Guard::ArchiveGoal => "archive_goal",
            Guard::ReactivateGoal => "reactivate_goal",
            Guard::CloseGoal => "close_goal",
            Guard::ReopenGoal => "reopen_goal",
            Guard::AddHypothesis => "add_hypothesis",
            Guard::ModifyHypothesis => "modify_hypothesis",
            Guard::AddIntervention => "add_intervention",
            Guard::UpdateIntervention => "update_intervention",
            Guard::DeleteIntervention => "delete_intervention",
            Guard::AddFollowUp => "add_follow_up",
            Guard::ModifyFollowUp => "modify_follow_up",
            Guard::AddEvaluation => "add_evaluation",
            Guard::ModifyEvaluation => "modify_evaluation",
            Guard::DeleteEvaluation => "delete_evaluation",
            Guard::AddEvidence(_) => "add_evidence",
            Guard::RemoveEvidence => "remove_evidence",
            Guard::UpdateSituationAnalysis => "update_situation_analysis",
        }
    }
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guard::AddEvidence(context) => write!(f, "add_evidence({context})"),
            other => f.write_str(other.name()),
        }
    }
}

/// The outcome of evaluating a guard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GuardDecision {
    Allow,
    Deny { reason: String },
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// One check performed while evaluating a guard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvaluationStep {
    /// Which check was performed (e.g., "status", "hypotheses").
    pub check: String,
    /// The outcome of this check (e.g., "passed: active").
    pub outcome: String,
    /// Whether this step decided the result.
    pub terminal: bool,
}

/// A decision plus the ordered checks that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationTrace {
    pub guard: Guard,
    pub status: GoalStatus,
    pub decision: GuardDecision,
    pub steps: Vec<EvaluationStep>,
}

/// Evaluates guards against goals.
///
/// The only tunable is whether the legacy Archived → Active reactivation
/// path is open.
#[derive(Debug, Clone)]
pub struct LifecyclePolicy {
    legacy_reactivation: bool,
}

impl LifecyclePolicy {
    pub fn new(legacy_reactivation: bool) -> Self {
        Self {
            legacy_reactivation,
        }
    }

    pub fn legacy_reactivation(&self) -> bool {
        self.legacy_reactivation
    }

    /// Shorthand for `evaluate(..).is_allowed()`.
    pub fn allows(&self, guard: Guard, goal: &Goal) -> bool {
        self.evaluate(guard, goal).is_allowed()
    }

    pub fn evaluate(&self, guard: Guard, goal: &Goal) -> GuardDecision {
        self.evaluate_with_trace(guard, goal).decision
    }

    /// Evaluate a guard and record every check made along the way.
    ///
    /// The decision always comes from the predicate behind the guard; the
    /// recorded steps describe it.
    pub fn evaluate_with_trace(&self, guard: Guard, goal: &Goal) -> EvaluationTrace {
        let status = goal.status;
        let allowed = self.predicate(guard, goal);

        let mut checks = Checks::default();
        self.explain(guard, goal, &mut checks);

        let decision = if allowed {
            GuardDecision::Allow
        } else {
            let failure = checks
                .failure()
                .unwrap_or_else(|| format!("status is {status}"));
            GuardDecision::Deny {
                reason: format!("{guard} not allowed: {failure}"),
            }
        };
        tracing::trace!(%guard, goal_id = %goal.id, %status, allowed, "guard evaluated");

        EvaluationTrace {
            guard,
            status,
            decision,
            steps: checks.finish(allowed),
        }
    }

    /// Record the checks that describe a guard's outcome, stopping at the
    /// first one that fails. Returns whether every recorded check passed.
    fn explain(&self, guard: Guard, goal: &Goal, checks: &mut Checks) -> bool {
        use GoalStatus::*;

        let status = goal.status;
        match guard {
            Guard::EditGoal | Guard::AddHypothesis | Guard::ModifyHypothesis => {
                checks.status(status, &[Draft, Active])
            }
            Guard::AddFollowUp | Guard::ModifyFollowUp | Guard::UpdateIntervention => {
                checks.status(status, &[Active])
            }
            Guard::AddEvaluation | Guard::ModifyEvaluation => {
                checks.status(status, &[Active, Closed])
            }
            Guard::DeleteIntervention => checks.status(status, &[Draft, Active]),
            Guard::DeleteGoal
            | Guard::ArchiveGoal
            | Guard::DeleteEvaluation
            | Guard::RemoveEvidence
            | Guard::UpdateSituationAnalysis => checks.status(status, &[Draft, Active, Closed]),
            Guard::ReopenGoal => checks.status(status, &[Closed]),
            Guard::CloseGoal => {
                checks.status(status, &[Active])
                    && checks.at_least_one("evaluations", goal.evaluations.len())
            }
            Guard::AddIntervention => match status {
                Draft => {
                    checks.status(status, &[Draft, Active])
                        && checks.at_least_one("hypotheses", goal.hypotheses.len())
                }
                _ => checks.status(status, &[Draft, Active]),
            },
            Guard::ReactivateGoal => {
                checks.status(status, &[Archived])
                    && checks.flag("legacy_reactivation", self.legacy_reactivation)
            }
            Guard::AddEvidence(context) => match status {
                Closed => {
                    checks.status(status, &[Draft, Active, Closed])
                        && checks.context(context, ContextType::Evaluation)
                }
                _ => checks.status(status, &[Draft, Active, Closed]),
            },
        }
    }

    /// The plain predicate behind a guard.
    fn predicate(&self, guard: Guard, goal: &Goal) -> bool {
        match guard {
            Guard::EditGoal => predicates::can_edit_goal(goal),
            Guard::DeleteGoal => predicates::can_delete_goal(goal),
            Guard::ArchiveGoal => predicates::can_archive_goal(goal),
            Guard::ReactivateGoal => {
                predicates::can_reactivate_goal(goal, self.legacy_reactivation)
            }
            Guard::CloseGoal => predicates::can_close_goal(goal),
            Guard::ReopenGoal => predicates::can_reopen_goal(goal),
            Guard::AddHypothesis | Guard::ModifyHypothesis => predicates::can_add_hypothesis(goal),
            Guard::AddIntervention => predicates::can_add_intervention(goal),
            Guard::UpdateIntervention => predicates::can_update_intervention(goal),
            Guard::DeleteIntervention => predicates::can_delete_intervention(goal),
            Guard::AddFollowUp | Guard::ModifyFollowUp => predicates::can_add_follow_up(goal),
            Guard::AddEvaluation | Guard::ModifyEvaluation => predicates::can_add_evaluation(goal),
            Guard::DeleteEvaluation => predicates::can_delete_evaluation(goal),
            Guard::AddEvidence(context) => predicates::can_add_evidence(goal, context),
            Guard::RemoveEvidence => predicates::can_remove_evidence(goal),
            Guard::UpdateSituationAnalysis => predicates::can_update_situation_analysis(goal),
        }
    }
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Accumulates evaluation steps; each check stops the chain on failure.
#[derive(Default)]
struct Checks {
    steps: Vec<EvaluationStep>,
}

impl Checks {
    fn status(&mut self, status: GoalStatus, allowed: &[GoalStatus]) -> bool {
        let passed = allowed.contains(&status);
        let outcome = if passed {
            format!("passed: {status}")
        } else {
            let names: Vec<&str> = allowed.iter().map(GoalStatus::as_str).collect();
            format!("status is {status}, requires {}", names.join(" or "))
        };
        self.push("status", passed, outcome)
    }

    fn at_least_one(&mut self, what: &str, count: usize) -> bool {
        let passed = count > 0;
        let outcome = if passed {
            format!("passed: {count} {what}")
        } else {
            format!("goal has no {what}")
        };
        self.push(what, passed, outcome)
    }

    fn flag(&mut self, name: &str, enabled: bool) -> bool {
        let outcome = if enabled {
            format!("passed: {name} enabled")
        } else {
            format!("{name} is disabled")
        };
        self.push(name, enabled, outcome)
    }

    fn context(&mut self, context: ContextType, required: ContextType) -> bool {
        let passed = context == required;
        let outcome = if passed {
            format!("passed: {context}")
        } else {
            format!("only {required} evidence may be added to a closed goal, got {context}")
        };
        self.push("context_type", passed, outcome)
    }

    fn push(&mut self, check: &str, passed: bool, outcome: String) -> bool {
        self.steps.push(EvaluationStep {
            check: check.to_string(),
            outcome,
            terminal: !passed,
        });
        passed
    }

    fn failure(&self) -> Option<String> {
        self.steps
            .iter()
            .find(|s| s.terminal)
            .map(|s| s.outcome.clone())
    }

    fn finish(mut self, allowed: bool) -> Vec<EvaluationStep> {
        if allowed {
            if let Some(last) = self.steps.last_mut() {
                last.terminal = true;
            }
        }
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ic_model::{ConfidenceLevel, Evaluation, Hypothesis};

    const ALL_GUARDS: [Guard; 22] = [
        Guard::EditGoal,
        Guard::DeleteGoal,
        Guard::ArchiveGoal,
        Guard::ReactivateGoal,
        Guard::CloseGoal,
        Guard::ReopenGoal,
        Guard::AddHypothesis,
        Guard::ModifyHypothesis,
        Guard::AddIntervention,
        Guard::UpdateIntervention,
        Guard::DeleteIntervention,
        Guard::AddFollowUp,
        Guard::ModifyFollowUp,
        Guard::AddEvaluation,
        Guard::ModifyEvaluation,
        Guard::DeleteEvaluation,
        Guard::AddEvidence(ContextType::Goal),
        Guard::AddEvidence(ContextType::Hypothesis),
        Guard::AddEvidence(ContextType::FollowUp),
        Guard::AddEvidence(ContextType::Evaluation),
        Guard::RemoveEvidence,
        Guard::UpdateSituationAnalysis,
    ];

    fn goal_in(status: GoalStatus) -> Goal {
        let mut g = Goal::new("Improve reading", "De Regenboog", "2025-2026");
        g.status = status;
        g
    }

    /// Goals in `status` with no children, a hypothesis, and an evaluation.
    fn goal_shapes(status: GoalStatus) -> Vec<Goal> {
        let bare = goal_in(status);
        let mut with_hypothesis = goal_in(status);
        with_hypothesis
            .hypotheses
            .push(Hypothesis::new("x", ConfidenceLevel::Certain));
        let mut with_evaluation = with_hypothesis.clone();
        with_evaluation
            .evaluations
            .push(Evaluation::new("tutoring", "homework", "keep going"));
        vec![bare, with_hypothesis, with_evaluation]
    }

    #[test]
    fn decisions_follow_predicates_everywhere() {
        for legacy in [true, false] {
            let policy = LifecyclePolicy::new(legacy);
            for status in GoalStatus::ALL {
                for goal in goal_shapes(status) {
                    for guard in ALL_GUARDS {
                        assert_eq!(
                            policy.allows(guard, &goal),
                            policy.predicate(guard, &goal),
                            "{guard} in {status}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn trace_steps_describe_the_decision() {
        for legacy in [true, false] {
            let policy = LifecyclePolicy::new(legacy);
            for status in GoalStatus::ALL {
                for goal in goal_shapes(status) {
                    for guard in ALL_GUARDS {
                        let mut checks = Checks::default();
                        let passed = policy.explain(guard, &goal, &mut checks);
                        assert_eq!(passed, policy.predicate(guard, &goal), "{guard} in {status}");
                    }
                }
            }
        }
    }

    #[test]
    fn close_allowed_once_active_goal_has_evaluation() {
        let policy = LifecyclePolicy::default();
        let mut goal = goal_in(GoalStatus::Active);
        goal.evaluations
            .push(Evaluation::new("tutoring", "homework", "keep going"));
        let trace = policy.evaluate_with_trace(Guard::CloseGoal, &goal);
        assert_eq!(trace.decision, GuardDecision::Allow);
        assert_eq!(trace.steps.len(), 2);
        assert_eq!(trace.steps[1].outcome, "passed: 1 evaluations");
        assert!(trace.steps[1].terminal);
    }

    #[test]
    fn follow_up_on_draft_is_denied_with_reason() {
        let policy = LifecyclePolicy::default();
        let decision = policy.evaluate(Guard::AddFollowUp, &goal_in(GoalStatus::Draft));
        assert_eq!(
            decision,
            GuardDecision::Deny {
                reason: "add_follow_up not allowed: status is draft, requires active".to_string()
            }
        );
    }

    #[test]
    fn close_without_evaluation_reports_missing_evaluations() {
        let policy = LifecyclePolicy::default();
        let trace = policy.evaluate_with_trace(Guard::CloseGoal, &goal_in(GoalStatus::Active));
        assert!(!trace.decision.is_allowed());
        assert_eq!(trace.steps.len(), 2);
        assert_eq!(trace.steps[0].check, "status");
        assert!(!trace.steps[0].terminal);
        assert_eq!(trace.steps[1].check, "evaluations");
        assert!(trace.steps[1].terminal);
    }

    #[test]
    fn closed_goal_rejects_follow_up_evidence() {
        let policy = LifecyclePolicy::default();
        let closed = goal_in(GoalStatus::Closed);
        let trace =
            policy.evaluate_with_trace(Guard::AddEvidence(ContextType::FollowUp), &closed);
        match trace.decision {
            GuardDecision::Deny { reason } => assert!(reason.contains("follow-up")),
            GuardDecision::Allow => panic!("follow-up evidence accepted on closed goal"),
        }
        assert!(policy.allows(Guard::AddEvidence(ContextType::Evaluation), &closed));
    }

    #[test]
    fn allowed_trace_marks_last_step_terminal() {
        let policy = LifecyclePolicy::default();
        let trace = policy.evaluate_with_trace(Guard::EditGoal, &goal_in(GoalStatus::Active));
        assert_eq!(trace.decision, GuardDecision::Allow);
        assert!(trace.steps.last().unwrap().terminal);
    }

    #[test]
    fn reactivation_closed_when_legacy_disabled() {
        let archived = goal_in(GoalStatus::Archived);
        assert!(LifecyclePolicy::new(true).allows(Guard::ReactivateGoal, &archived));
        assert!(!LifecyclePolicy::new(false).allows(Guard::ReactivateGoal, &archived));
    }

    #[test]
    fn guard_display_names() {
        assert_eq!(Guard::AddFollowUp.to_string(), "add_follow_up");
        assert_eq!(
            Guard::AddEvidence(ContextType::FollowUp).to_string(),
            "add_evidence(follow-up)"
        );
    }

    #[test]
    fn decision_serializes_tagged() {
        let json = serde_json::to_string(&GuardDecision::Deny {
            reason: "x".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"decision":"deny","reason":"x"}"#);
    }
}
