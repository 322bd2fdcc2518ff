// store.rs - GoalStore: the single source of truth for goals.
//
// Goals live in memory, in creation order. Every mutation follows the same
// path:
//
//   1. Look up the goal (NotFound if absent)
//   2. Ask the LifecyclePolicy about the operation's guard (GuardRejected)
//   3. Apply the change to a clone of the goal, validating as it goes
//   4. Swap the clone in and dispatch events
//
// A failure at any step leaves the stored goal untouched. The store is a
// plain value: hosts that share it between threads wrap it in a Mutex.

use chrono::Utc;
use ic_model::{EvaluationPlan, Goal, GoalId, GoalStatus, Hypothesis, SituationAnalysis};
use ic_policy::{Guard, GuardDecision, LifecyclePolicy};

use crate::config::EngineConfig;
use crate::error::{EntityKind, GoalError};
use crate::events::{EventDispatcher, GoalEvent, LogSink};
use crate::payload::{DuplicateMode, GoalFilter, GoalUpdate, NewGoal};

/// In-memory store of goals with guarded mutation operations.
pub struct GoalStore {
    goals: Vec<Goal>,
    policy: LifecyclePolicy,
    dispatcher: EventDispatcher,
}

impl GoalStore {
    /// Create an empty store with the default policy and no event sinks.
    pub fn new() -> Self {
        Self::with_policy(LifecyclePolicy::default())
    }

    pub fn with_policy(policy: LifecyclePolicy) -> Self {
        Self {
            goals: Vec::new(),
            policy,
            dispatcher: EventDispatcher::new(),
        }
    }

    /// Create an empty store as described by `config`, registering a JSONL
    /// event log if one is configured.
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut dispatcher = EventDispatcher::new();
        if let Some(path) = &config.events_log {
            dispatcher.add_sink(Box::new(LogSink::new(path)));
        }
        Self::with_policy(LifecyclePolicy::new(config.legacy_reactivation))
            .with_dispatcher(dispatcher)
    }

    /// Replace the event dispatcher.
    pub fn with_dispatcher(mut self, dispatcher: EventDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn policy(&self) -> &LifecyclePolicy {
        &self.policy
    }

    // ── Read access ─────────────────────────────────────────────

    pub fn get(&self, goal_id: GoalId) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == goal_id)
    }

    /// All goals, oldest first.
    pub fn list(&self) -> &[Goal] {
        &self.goals
    }

    pub fn list_filtered(&self, filter: &GoalFilter) -> Vec<&Goal> {
        self.goals.iter().filter(|g| filter.matches(g)).collect()
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// Export every goal as pretty-printed JSON.
    pub fn export_json(&self) -> Result<String, GoalError> {
        Ok(serde_json::to_string_pretty(&self.goals)?)
    }

    // ── Goal-level operations ───────────────────────────────────

    /// Create a goal in Draft and return its id.
    ///
    /// Seed hypotheses need a title and confidence level. Seed evidence must
    /// resolve inside the new goal; seed hypotheses get their ids here, so in
    /// practice only goal-context evidence can be seeded.
    pub fn add_goal(&mut self, new: NewGoal) -> Result<GoalId, GoalError> {
        let mut goal = Goal::new(new.title, new.school, new.school_year);
        goal.scope = new.scope;
        goal.class_name = new.class_name;
        goal.subject = new.subject;
        goal.description = new.description;
        goal.period = new.period;
        if let Some(analysis) = new.situation_analysis {
            goal.situation_analysis = analysis;
        }
        for hypothesis in new.hypotheses {
            goal.hypotheses.push(crate::children::build_hypothesis(hypothesis)?);
        }
        for evidence in new.evidence {
            let item = crate::children::build_evidence(&goal, evidence)?;
            goal.evidence.push(item);
        }

        let goal_id = goal.id;
        tracing::debug!(%goal_id, title = %goal.title, "goal created");
        self.dispatcher
            .dispatch(&GoalEvent::goal_created(goal_id, &goal.title, &goal.school));
        self.goals.push(goal);
        Ok(goal_id)
    }

    /// Create a fresh Draft goal from an existing one.
    ///
    /// Classification fields are copied; the school year is left empty for
    /// the caller to choose. [`DuplicateMode::NewCycle`] also carries over
    /// the situation analysis and hypotheses (under new ids).
    pub fn duplicate_goal(
        &mut self,
        source_id: GoalId,
        mode: DuplicateMode,
    ) -> Result<GoalId, GoalError> {
        let source = self.find(source_id)?;

        let mut goal = Goal::new(source.title.clone(), source.school.clone(), String::new());
        goal.scope = source.scope.clone();
        goal.class_name = source.class_name.clone();
        goal.subject = source.subject.clone();
        goal.description = source.description.clone();
        if mode == DuplicateMode::NewCycle {
            goal.situation_analysis = source.situation_analysis.clone();
            goal.hypotheses = source.hypotheses.iter().map(Hypothesis::carried_over).collect();
            goal.continued_from = Some(source_id);
        }

        let goal_id = goal.id;
        tracing::debug!(%goal_id, %source_id, ?mode, "goal duplicated");
        self.dispatcher.dispatch(&GoalEvent::GoalDuplicated {
            source_goal_id: source_id,
            goal_id,
            mode,
            timestamp: Utc::now(),
        });
        self.goals.push(goal);
        Ok(goal_id)
    }

    /// Shallow-merge descriptive and classification fields.
    pub fn update_goal(&mut self, goal_id: GoalId, update: GoalUpdate) -> Result<Goal, GoalError> {
        self.mutate(goal_id, Guard::EditGoal, "update_goal", |goal| {
            if let Some(title) = update.title {
                goal.title = title;
            }
            if let Some(school) = update.school {
                goal.school = school;
            }
            if let Some(school_year) = update.school_year {
                goal.school_year = school_year;
            }
            if let Some(scope) = update.scope {
                goal.scope = non_empty(scope);
            }
            if let Some(class_name) = update.class_name {
                goal.class_name = non_empty(class_name);
            }
            if let Some(subject) = update.subject {
                goal.subject = non_empty(subject);
            }
            if let Some(description) = update.description {
                goal.description = description;
            }
            if let Some(period) = update.period {
                goal.period = period;
            }
            Ok(())
        })
        .map(|(goal, ())| goal.clone())
    }

    /// Hard-delete a goal. Not available once archived.
    pub fn delete_goal(&mut self, goal_id: GoalId) -> Result<Goal, GoalError> {
        let index = self.index_of(goal_id)?;
        self.check(Guard::DeleteGoal, &self.goals[index])?;

        let removed = self.goals.remove(index);
        tracing::debug!(%goal_id, "goal deleted");
        self.dispatcher.dispatch(&GoalEvent::GoalDeleted {
            goal_id,
            timestamp: Utc::now(),
        });
        Ok(removed)
    }

    /// Merge the supplied parts of the situation analysis.
    pub fn update_situation_analysis(
        &mut self,
        goal_id: GoalId,
        update: SituationAnalysis,
    ) -> Result<Goal, GoalError> {
        self.mutate(
            goal_id,
            Guard::UpdateSituationAnalysis,
            "update_situation_analysis",
            |goal| {
                let analysis = &mut goal.situation_analysis;
                if update.data_summary.is_some() {
                    analysis.data_summary = update.data_summary;
                }
                if update.affected_groups.is_some() {
                    analysis.affected_groups = update.affected_groups;
                }
                if update.patterns_over_time.is_some() {
                    analysis.patterns_over_time = update.patterns_over_time;
                }
                if update.connected_factors.is_some() {
                    analysis.connected_factors = update.connected_factors;
                }
                Ok(())
            },
        )
        .map(|(goal, ())| goal.clone())
    }

    /// Set the goal's evaluation plan.
    pub fn update_evaluation_plan(
        &mut self,
        goal_id: GoalId,
        plan: EvaluationPlan,
    ) -> Result<Goal, GoalError> {
        self.mutate(goal_id, Guard::ModifyEvaluation, "update_evaluation_plan", |goal| {
            goal.evaluation_plan = Some(plan);
            Ok(())
        })
        .map(|(goal, ())| goal.clone())
    }

    // ── Status transitions ──────────────────────────────────────

    /// Active → Closed. Needs at least one evaluation.
    pub fn close_goal(&mut self, goal_id: GoalId) -> Result<Goal, GoalError> {
        self.transition(goal_id, Guard::CloseGoal, GoalStatus::Closed)
    }

    /// Closed → Active.
    pub fn reopen_goal(&mut self, goal_id: GoalId) -> Result<Goal, GoalError> {
        self.transition(goal_id, Guard::ReopenGoal, GoalStatus::Active)
    }

    /// Draft/Active/Closed → Archived.
    pub fn archive_goal(&mut self, goal_id: GoalId) -> Result<Goal, GoalError> {
        self.transition(goal_id, Guard::ArchiveGoal, GoalStatus::Archived)
    }

    /// Archived → Active, only when legacy reactivation is enabled.
    pub fn reactivate_goal(&mut self, goal_id: GoalId) -> Result<Goal, GoalError> {
        self.transition(goal_id, Guard::ReactivateGoal, GoalStatus::Active)
    }

    fn transition(
        &mut self,
        goal_id: GoalId,
        guard: Guard,
        next: GoalStatus,
    ) -> Result<Goal, GoalError> {
        self.mutate(goal_id, guard, guard.name(), |goal| {
            goal.transition(next)?;
            Ok(())
        })
        .map(|(goal, ())| goal.clone())
    }

    // ── Internals ───────────────────────────────────────────────

    pub(crate) fn find(&self, goal_id: GoalId) -> Result<&Goal, GoalError> {
        self.get(goal_id)
            .ok_or_else(|| GoalError::not_found(EntityKind::Goal, goal_id))
    }

    fn index_of(&self, goal_id: GoalId) -> Result<usize, GoalError> {
        self.goals
            .iter()
            .position(|g| g.id == goal_id)
            .ok_or_else(|| GoalError::not_found(EntityKind::Goal, goal_id))
    }

    fn check(&self, guard: Guard, goal: &Goal) -> Result<(), GoalError> {
        match self.policy.evaluate(guard, goal) {
            GuardDecision::Allow => Ok(()),
            GuardDecision::Deny { reason } => {
                tracing::warn!(goal_id = %goal.id, %guard, status = %goal.status, "{}", reason);
                Err(GoalError::GuardRejected {
                    goal_id: goal.id,
                    guard,
                    status: goal.status,
                    reason,
                })
            }
        }
    }

    /// Run a guarded change against a copy of the goal and store the result.
    ///
    /// Returns the new snapshot together with whatever `apply` produced.
    pub(crate) fn mutate<T>(
        &mut self,
        goal_id: GoalId,
        guard: Guard,
        operation: &'static str,
        apply: impl FnOnce(&mut Goal) -> Result<T, GoalError>,
    ) -> Result<(&Goal, T), GoalError> {
        let index = self.index_of(goal_id)?;
        let current = &self.goals[index];
        self.check(guard, current)?;

        let from = current.status;
        let mut next = current.clone();
        let output = apply(&mut next)?;
        let to = next.status;
        self.goals[index] = next;

        tracing::debug!(%goal_id, operation, "goal updated");
        if from != to {
            tracing::info!(%goal_id, %from, %to, "goal status changed");
            self.dispatcher
                .dispatch(&GoalEvent::goal_status_changed(goal_id, from, to));
        }
        Ok((&self.goals[index], output))
    }

    pub(crate) fn dispatch(&self, event: &GoalEvent) {
        self.dispatcher.dispatch(event);
    }
}

impl Default for GoalStore {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemorySink;
    use crate::payload::{NewEvaluation, NewEvidence, NewHypothesis, NewIntervention};
    use ic_model::{ConfidenceLevel, EvidenceContext, HypothesisId};
    use std::fs;
    use tempfile::tempdir;

    fn new_goal(title: &str) -> NewGoal {
        NewGoal {
            title: title.to_string(),
            school: "De Regenboog".to_string(),
            school_year: "2025-2026".to_string(),
            subject: Some("Reading".to_string()),
            description: "Group 5 reading scores dropped".to_string(),
            ..Default::default()
        }
    }

    fn active_goal(store: &mut GoalStore) -> (GoalId, HypothesisId) {
        let goal_id = store.add_goal(new_goal("Reading")).unwrap();
        let h = store
            .add_hypothesis(
                goal_id,
                NewHypothesis::new("Little reading time", ConfidenceLevel::Certain),
            )
            .unwrap();
        store
            .add_intervention(
                goal_id,
                NewIntervention::new("Reading quarter", "Better fluency", [h]),
            )
            .unwrap();
        (goal_id, h)
    }

    fn closed_goal(store: &mut GoalStore) -> GoalId {
        let (goal_id, _) = active_goal(store);
        store
            .add_evaluation(goal_id, NewEvaluation::new("a", "b", "c"))
            .unwrap();
        store.close_goal(goal_id).unwrap();
        goal_id
    }

    #[test]
    fn add_goal_round_trip() {
        let mut store = GoalStore::new();
        let goal_id = store.add_goal(new_goal("Improve reading")).unwrap();

        let goal = store.get(goal_id).unwrap();
        assert_eq!(goal.title, "Improve reading");
        assert_eq!(goal.school, "De Regenboog");
        assert_eq!(goal.school_year, "2025-2026");
        assert_eq!(goal.subject.as_deref(), Some("Reading"));
        assert_eq!(goal.description, "Group 5 reading scores dropped");
        assert_eq!(goal.status, GoalStatus::Draft);
        assert!(goal.hypotheses.is_empty());
        assert!(goal.interventions.is_empty());
        assert!(goal.evaluations.is_empty());
        assert!(goal.evidence.is_empty());
        assert!(goal.continued_from.is_none());
    }

    #[test]
    fn add_goal_with_seed_data() {
        let mut store = GoalStore::new();
        let mut new = new_goal("Seeded");
        new.situation_analysis = Some(SituationAnalysis {
            data_summary: Some("Scores fell 8 points".to_string()),
            ..Default::default()
        });
        new.hypotheses = vec![NewHypothesis::new("x", ConfidenceLevel::Uncertain)];
        new.evidence = vec![NewEvidence::chart("baseline-2025", EvidenceContext::Goal)];

        let goal_id = store.add_goal(new).unwrap();
        let goal = store.get(goal_id).unwrap();
        assert_eq!(goal.status, GoalStatus::Draft);
        assert_eq!(goal.hypotheses.len(), 1);
        assert_eq!(goal.evidence.len(), 1);
        assert_eq!(
            goal.situation_analysis.data_summary.as_deref(),
            Some("Scores fell 8 points")
        );
    }

    #[test]
    fn add_goal_rejects_unresolvable_seed_evidence() {
        let mut store = GoalStore::new();
        let mut new = new_goal("Seeded");
        new.evidence = vec![NewEvidence::chart(
            "c",
            EvidenceContext::Hypothesis(HypothesisId::new()),
        )];

        let result = store.add_goal(new);
        assert!(matches!(result, Err(GoalError::InvalidReference { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn add_goal_rejects_incomplete_seed_hypothesis() {
        let mut store = GoalStore::new();
        let mut new = new_goal("Seeded");
        let mut hypothesis = NewHypothesis::new("x", ConfidenceLevel::Certain);
        hypothesis.confidence_level = None;
        new.hypotheses = vec![hypothesis];

        let result = store.add_goal(new);
        assert!(matches!(
            result,
            Err(GoalError::MissingField {
                field: "confidence_level"
            })
        ));
    }

    #[test]
    fn duplicate_copies_classification_only() {
        let mut store = GoalStore::new();
        let (source_id, _) = active_goal(&mut store);

        let copy_id = store.duplicate_goal(source_id, DuplicateMode::Copy).unwrap();
        let source = store.get(source_id).unwrap();
        let copy = store.get(copy_id).unwrap();

        assert_ne!(copy_id, source_id);
        assert_eq!(copy.status, GoalStatus::Draft);
        assert_eq!(copy.school, source.school);
        assert_eq!(copy.subject, source.subject);
        assert_eq!(copy.school_year, "");
        assert!(copy.hypotheses.is_empty());
        assert!(copy.interventions.is_empty());
        assert!(copy.evaluations.is_empty());
        assert!(copy.evidence.is_empty());
        assert!(copy.continued_from.is_none());
    }

    #[test]
    fn duplicate_as_new_cycle_carries_hypotheses_under_new_ids() {
        let mut store = GoalStore::new();
        let (source_id, h1) = active_goal(&mut store);
        store
            .update_situation_analysis(
                source_id,
                SituationAnalysis {
                    affected_groups: Some("Group 5".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        let next_id = store
            .duplicate_goal(source_id, DuplicateMode::NewCycle)
            .unwrap();
        let next = store.get(next_id).unwrap();

        assert_eq!(next.status, GoalStatus::Draft);
        assert_eq!(next.continued_from, Some(source_id));
        assert_eq!(next.hypotheses.len(), 1);
        assert_ne!(next.hypotheses[0].id, h1);
        assert_eq!(next.hypotheses[0].title, "Little reading time");
        assert_eq!(
            next.situation_analysis.affected_groups.as_deref(),
            Some("Group 5")
        );
        assert!(next.interventions.is_empty());
    }

    #[test]
    fn duplicate_unknown_goal_is_not_found() {
        let mut store = GoalStore::new();
        let result = store.duplicate_goal(GoalId::new(), DuplicateMode::Copy);
        assert!(matches!(
            result,
            Err(GoalError::NotFound {
                kind: EntityKind::Goal,
                ..
            })
        ));
    }

    #[test]
    fn update_goal_merges_supplied_fields_only() {
        let mut store = GoalStore::new();
        let goal_id = store.add_goal(new_goal("Reading")).unwrap();

        let goal = store
            .update_goal(
                goal_id,
                GoalUpdate {
                    title: Some("Reading comprehension".to_string()),
                    subject: Some(String::new()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(goal.title, "Reading comprehension");
        assert_eq!(goal.school, "De Regenboog");
        assert!(goal.subject.is_none());
        assert_eq!(goal.status, GoalStatus::Draft);
    }

    #[test]
    fn update_goal_rejected_once_closed() {
        let mut store = GoalStore::new();
        let goal_id = closed_goal(&mut store);
        let result = store.update_goal(
            goal_id,
            GoalUpdate {
                title: Some("x".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(
            result,
            Err(GoalError::GuardRejected {
                guard: Guard::EditGoal,
                status: GoalStatus::Closed,
                ..
            })
        ));
        assert_eq!(store.get(goal_id).unwrap().title, "Reading");
    }

    #[test]
    fn delete_goal_removes_it_unless_archived() {
        let mut store = GoalStore::new();
        let keep = store.add_goal(new_goal("Keep")).unwrap();
        let gone = store.add_goal(new_goal("Gone")).unwrap();

        let removed = store.delete_goal(gone).unwrap();
        assert_eq!(removed.title, "Gone");
        assert!(store.get(gone).is_none());
        assert!(store.delete_goal(gone).unwrap_err().is_not_found());

        store.archive_goal(keep).unwrap();
        assert!(store.delete_goal(keep).unwrap_err().is_guard_rejected());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn situation_analysis_merges_and_freezes_when_archived() {
        let mut store = GoalStore::new();
        let goal_id = store.add_goal(new_goal("Reading")).unwrap();

        store
            .update_situation_analysis(
                goal_id,
                SituationAnalysis {
                    data_summary: Some("Scores fell".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        let goal = store
            .update_situation_analysis(
                goal_id,
                SituationAnalysis {
                    patterns_over_time: Some("Three years of decline".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(goal.situation_analysis.data_summary.as_deref(), Some("Scores fell"));
        assert_eq!(
            goal.situation_analysis.patterns_over_time.as_deref(),
            Some("Three years of decline")
        );

        store.archive_goal(goal_id).unwrap();
        let result = store.update_situation_analysis(goal_id, SituationAnalysis::default());
        assert!(result.unwrap_err().is_guard_rejected());
    }

    #[test]
    fn evaluation_plan_needs_active_or_closed() {
        let mut store = GoalStore::new();
        let draft = store.add_goal(new_goal("Draft")).unwrap();
        let plan = EvaluationPlan {
            indicator: Some("Reading score".to_string()),
            ..Default::default()
        };
        assert!(store
            .update_evaluation_plan(draft, plan.clone())
            .unwrap_err()
            .is_guard_rejected());

        let closed = closed_goal(&mut store);
        let goal = store.update_evaluation_plan(closed, plan.clone()).unwrap();
        assert_eq!(goal.evaluation_plan, Some(plan));
    }

    #[test]
    fn close_requires_an_evaluation() {
        let mut store = GoalStore::new();
        let (goal_id, _) = active_goal(&mut store);

        let result = store.close_goal(goal_id);
        assert!(matches!(
            result,
            Err(GoalError::GuardRejected {
                guard: Guard::CloseGoal,
                ..
            })
        ));
        assert_eq!(store.get(goal_id).unwrap().status, GoalStatus::Active);

        store
            .add_evaluation(goal_id, NewEvaluation::new("a", "b", "c"))
            .unwrap();
        let goal = store.close_goal(goal_id).unwrap();
        assert_eq!(goal.status, GoalStatus::Closed);
    }

    #[test]
    fn reopen_only_from_closed() {
        let mut store = GoalStore::new();
        let draft = store.add_goal(new_goal("Draft")).unwrap();
        let (active, _) = active_goal(&mut store);
        let archived = store.add_goal(new_goal("Archived")).unwrap();
        store.archive_goal(archived).unwrap();

        for id in [draft, active, archived] {
            assert!(store.reopen_goal(id).unwrap_err().is_guard_rejected());
        }

        let closed = closed_goal(&mut store);
        assert_eq!(store.reopen_goal(closed).unwrap().status, GoalStatus::Active);
    }

    #[test]
    fn archive_from_every_open_status_but_not_twice() {
        let mut store = GoalStore::new();
        let draft = store.add_goal(new_goal("Draft")).unwrap();
        let (active, _) = active_goal(&mut store);
        let closed = closed_goal(&mut store);

        for id in [draft, active, closed] {
            assert_eq!(store.archive_goal(id).unwrap().status, GoalStatus::Archived);
            assert!(store.archive_goal(id).unwrap_err().is_guard_rejected());
        }
    }

    #[test]
    fn reactivate_follows_legacy_setting() {
        let mut store = GoalStore::new();
        let goal_id = store.add_goal(new_goal("Reading")).unwrap();
        store.archive_goal(goal_id).unwrap();
        assert_eq!(store.reactivate_goal(goal_id).unwrap().status, GoalStatus::Active);

        let mut strict = GoalStore::with_policy(LifecyclePolicy::new(false));
        let goal_id = strict.add_goal(new_goal("Reading")).unwrap();
        strict.archive_goal(goal_id).unwrap();
        assert!(strict.reactivate_goal(goal_id).unwrap_err().is_guard_rejected());
        assert_eq!(strict.get(goal_id).unwrap().status, GoalStatus::Archived);
    }

    #[test]
    fn operations_on_unknown_goal_are_not_found() {
        let mut store = GoalStore::new();
        let missing = GoalId::new();
        assert!(store.close_goal(missing).unwrap_err().is_not_found());
        assert!(store
            .add_hypothesis(missing, NewHypothesis::new("x", ConfidenceLevel::Certain))
            .unwrap_err()
            .is_not_found());
        assert!(store
            .update_situation_analysis(missing, SituationAnalysis::default())
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn list_filtered_by_status_school_and_year() {
        let mut store = GoalStore::new();
        let draft = store.add_goal(new_goal("Draft")).unwrap();
        let (active, _) = active_goal(&mut store);
        let mut other = new_goal("Other school");
        other.school = "Het Kompas".to_string();
        other.school_year = "2024-2025".to_string();
        store.add_goal(other).unwrap();

        let drafts = store.list_filtered(&GoalFilter {
            status: Some(GoalStatus::Draft),
            ..Default::default()
        });
        assert_eq!(drafts.len(), 2);

        let regenboog = store.list_filtered(&GoalFilter {
            school: Some("De Regenboog".to_string()),
            school_year: Some("2025-2026".to_string()),
            ..Default::default()
        });
        let ids: Vec<GoalId> = regenboog.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![draft, active]);

        assert_eq!(store.list_filtered(&GoalFilter::default()).len(), 3);
        assert_eq!(store.list().len(), 3);
    }

    #[test]
    fn status_changes_are_dispatched() {
        let sink = MemorySink::new();
        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_sink(Box::new(sink.clone()));
        let mut store = GoalStore::new().with_dispatcher(dispatcher);

        let goal_id = closed_goal(&mut store);

        let changes: Vec<(GoalStatus, GoalStatus)> = sink
            .events()
            .into_iter()
            .filter_map(|e| match e {
                GoalEvent::GoalStatusChanged {
                    from_status,
                    to_status,
                    ..
                } => Some((from_status, to_status)),
                _ => None,
            })
            .collect();
        assert_eq!(
            changes,
            vec![
                (GoalStatus::Draft, GoalStatus::Active),
                (GoalStatus::Active, GoalStatus::Closed),
            ]
        );
        let types: Vec<String> = sink
            .events()
            .iter()
            .map(|e| e.event_type().to_string())
            .collect();
        assert_eq!(types.first().map(String::as_str), Some("goal_created"));
        assert!(types.contains(&"evaluation_added".to_string()));
        assert!(sink.events().iter().all(|e| e.goal_id() == goal_id));
    }

    #[test]
    fn rejected_operations_dispatch_nothing() {
        let sink = MemorySink::new();
        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_sink(Box::new(sink.clone()));
        let mut store = GoalStore::new().with_dispatcher(dispatcher);

        let goal_id = store.add_goal(new_goal("Reading")).unwrap();
        assert!(store.close_goal(goal_id).is_err());
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn from_config_writes_event_log() {
        let dir = tempdir().unwrap();
        let log = dir.path().join("events.jsonl");
        let config = EngineConfig {
            legacy_reactivation: false,
            events_log: Some(log.clone()),
        };
        let mut store = GoalStore::from_config(&config);
        assert!(!store.policy().legacy_reactivation());

        store.add_goal(new_goal("Reading")).unwrap();
        let content = fs::read_to_string(&log).unwrap();
        assert!(content.contains("goal_created"));
    }

    #[test]
    fn export_json_contains_every_goal() {
        let mut store = GoalStore::new();
        active_goal(&mut store);
        store.add_goal(new_goal("Second")).unwrap();

        let json = store.export_json().unwrap();
        let goals: Vec<Goal> = serde_json::from_str(&json).unwrap();
        assert_eq!(goals.len(), 2);
        assert_eq!(goals[0].status, GoalStatus::Active);
    }
}
