// children.rs - Guarded operations on a goal's child entities.
//
// Hypotheses, interventions (with follow-ups), evaluations and evidence are
// only ever changed through these methods. Adds assign a fresh id and a
// creation timestamp; updates keep both and merge only supplied fields.

use chrono::Utc;
use ic_model::{
    Evaluation, EvaluationId, Evidence, EvidenceId, FollowUp, FollowUpId, Goal, GoalId,
    GoalStatus, Hypothesis, HypothesisId, Intervention, InterventionId,
};
use ic_policy::Guard;

use crate::error::{EntityKind, GoalError};
use crate::events::GoalEvent;
use crate::payload::{
    EvaluationUpdate, FollowUpUpdate, HypothesisRemoval, HypothesisUpdate, InterventionUpdate,
    NewEvaluation, NewEvidence, NewFollowUp, NewHypothesis, NewIntervention,
};
use crate::store::GoalStore;

impl GoalStore {
    // ── Hypotheses ──────────────────────────────────────────────

    /// Add a hypothesis. Needs a title and a confidence level.
    ///
    /// Reflection answers are not checked here; the form collecting them
    /// uses `ic_model::validate_reflection_answers`.
    pub fn add_hypothesis(
        &mut self,
        goal_id: GoalId,
        new: NewHypothesis,
    ) -> Result<HypothesisId, GoalError> {
        self.mutate(goal_id, Guard::AddHypothesis, "add_hypothesis", |goal| {
            let hypothesis = build_hypothesis(new)?;
            let id = hypothesis.id;
            goal.hypotheses.push(hypothesis);
            Ok(id)
        })
        .map(|(_, id)| id)
    }

    pub fn update_hypothesis(
        &mut self,
        goal_id: GoalId,
        hypothesis_id: HypothesisId,
        update: HypothesisUpdate,
    ) -> Result<Goal, GoalError> {
        self.mutate(goal_id, Guard::ModifyHypothesis, "update_hypothesis", |goal| {
            let hypothesis = goal
                .hypotheses
                .iter_mut()
                .find(|h| h.id == hypothesis_id)
                .ok_or_else(|| GoalError::not_found(EntityKind::Hypothesis, hypothesis_id))?;

            if let Some(title) = update.title {
                hypothesis.title = required("title", title)?;
            }
            if let Some(success_factor) = update.success_factor {
                hypothesis.success_factor = success_factor;
            }
            if let Some(confidence_level) = update.confidence_level {
                hypothesis.confidence_level = confidence_level;
            }
            if let Some(notes) = update.notes {
                hypothesis.notes = Some(notes);
            }
            if let Some(questions) = update.questions {
                hypothesis.questions = questions;
            }
            Ok(())
        })
        .map(|(goal, ())| goal.clone())
    }

    /// Delete a hypothesis and strip its id from every intervention.
    ///
    /// Interventions are kept even when this leaves them with no links;
    /// those are reported in [`HypothesisRemoval::unlinked_interventions`].
    pub fn delete_hypothesis(
        &mut self,
        goal_id: GoalId,
        hypothesis_id: HypothesisId,
    ) -> Result<HypothesisRemoval, GoalError> {
        let (goal, unlinked) =
            self.mutate(goal_id, Guard::ModifyHypothesis, "delete_hypothesis", |goal| {
                let index = goal
                    .hypotheses
                    .iter()
                    .position(|h| h.id == hypothesis_id)
                    .ok_or_else(|| GoalError::not_found(EntityKind::Hypothesis, hypothesis_id))?;
                goal.hypotheses.remove(index);
                Ok(unlink_hypothesis(goal, hypothesis_id))
            })?;

        if !unlinked.is_empty() {
            tracing::warn!(
                %goal_id,
                %hypothesis_id,
                count = unlinked.len(),
                "interventions left without a linked hypothesis"
            );
        }
        Ok(HypothesisRemoval {
            goal: goal.clone(),
            unlinked_interventions: unlinked,
        })
    }

    // ── Interventions ───────────────────────────────────────────

    /// Add an intervention linked to existing hypotheses.
    ///
    /// The first intervention on a Draft goal promotes it to Active.
    pub fn add_intervention(
        &mut self,
        goal_id: GoalId,
        new: NewIntervention,
    ) -> Result<InterventionId, GoalError> {
        self.mutate(goal_id, Guard::AddIntervention, "add_intervention", |goal| {
            let description = required("description", new.description)?;
            let expected_effect = required("expected_effect", new.expected_effect)?;
            let hypothesis_ids = resolve_links(goal, new.hypothesis_ids)?;

            let intervention = Intervention {
                id: InterventionId::new(),
                description,
                expected_effect,
                hypothesis_ids,
                follow_ups: Vec::new(),
                date_added: Utc::now(),
            };
            let id = intervention.id;
            goal.interventions.push(intervention);

            if goal.status == GoalStatus::Draft {
                goal.transition(GoalStatus::Active)?;
            }
            Ok(id)
        })
        .map(|(_, id)| id)
    }

    /// Update an intervention. Only allowed while Active.
    pub fn update_intervention(
        &mut self,
        goal_id: GoalId,
        intervention_id: InterventionId,
        update: InterventionUpdate,
    ) -> Result<Goal, GoalError> {
        self.mutate(goal_id, Guard::UpdateIntervention, "update_intervention", |goal| {
            let links = match update.hypothesis_ids {
                Some(ids) => Some(resolve_links(goal, ids)?),
                None => None,
            };
            let intervention = intervention_mut(goal, intervention_id)?;

            if let Some(description) = update.description {
                intervention.description = required("description", description)?;
            }
            if let Some(expected_effect) = update.expected_effect {
                intervention.expected_effect = required("expected_effect", expected_effect)?;
            }
            if let Some(links) = links {
                intervention.hypothesis_ids = links;
            }
            Ok(())
        })
        .map(|(goal, ())| goal.clone())
    }

    /// Delete an intervention together with its follow-ups.
    pub fn delete_intervention(
        &mut self,
        goal_id: GoalId,
        intervention_id: InterventionId,
    ) -> Result<Goal, GoalError> {
        self.mutate(goal_id, Guard::DeleteIntervention, "delete_intervention", |goal| {
            let index = goal
                .interventions
                .iter()
                .position(|i| i.id == intervention_id)
                .ok_or_else(|| GoalError::not_found(EntityKind::Intervention, intervention_id))?;
            goal.interventions.remove(index);
            Ok(())
        })
        .map(|(goal, ())| goal.clone())
    }

    // ── Follow-ups ──────────────────────────────────────────────

    pub fn add_follow_up(
        &mut self,
        goal_id: GoalId,
        intervention_id: InterventionId,
        new: NewFollowUp,
    ) -> Result<FollowUpId, GoalError> {
        self.mutate(goal_id, Guard::AddFollowUp, "add_follow_up", |goal| {
            let observation = required("observation", new.observation)?;
            let intervention = intervention_mut(goal, intervention_id)?;

            let follow_up = FollowUp {
                id: FollowUpId::new(),
                kind: new.kind,
                observation,
                checkpoint_date: new.checkpoint_date,
                date_added: Utc::now(),
            };
            let id = follow_up.id;
            intervention.follow_ups.push(follow_up);
            Ok(id)
        })
        .map(|(_, id)| id)
    }

    pub fn update_follow_up(
        &mut self,
        goal_id: GoalId,
        intervention_id: InterventionId,
        follow_up_id: FollowUpId,
        update: FollowUpUpdate,
    ) -> Result<Goal, GoalError> {
        self.mutate(goal_id, Guard::ModifyFollowUp, "update_follow_up", |goal| {
            let follow_up = intervention_mut(goal, intervention_id)?
                .follow_ups
                .iter_mut()
                .find(|f| f.id == follow_up_id)
                .ok_or_else(|| GoalError::not_found(EntityKind::FollowUp, follow_up_id))?;

            if let Some(kind) = update.kind {
                follow_up.kind = kind;
            }
            if let Some(observation) = update.observation {
                follow_up.observation = required("observation", observation)?;
            }
            if let Some(checkpoint_date) = update.checkpoint_date {
                follow_up.checkpoint_date = Some(checkpoint_date);
            }
            Ok(())
        })
        .map(|(goal, ())| goal.clone())
    }

    pub fn delete_follow_up(
        &mut self,
        goal_id: GoalId,
        intervention_id: InterventionId,
        follow_up_id: FollowUpId,
    ) -> Result<Goal, GoalError> {
        self.mutate(goal_id, Guard::ModifyFollowUp, "delete_follow_up", |goal| {
            let follow_ups = &mut intervention_mut(goal, intervention_id)?.follow_ups;
            let index = follow_ups
                .iter()
                .position(|f| f.id == follow_up_id)
                .ok_or_else(|| GoalError::not_found(EntityKind::FollowUp, follow_up_id))?;
            follow_ups.remove(index);
            Ok(())
        })
        .map(|(goal, ())| goal.clone())
    }

    // ── Evaluations ─────────────────────────────────────────────

    /// Record an evaluation. All three reflections are required.
    pub fn add_evaluation(
        &mut self,
        goal_id: GoalId,
        new: NewEvaluation,
    ) -> Result<EvaluationId, GoalError> {
        let evaluation_id = self
            .mutate(goal_id, Guard::AddEvaluation, "add_evaluation", |goal| {
                let evaluation = Evaluation::new(
                    required("what_worked", new.what_worked)?,
                    required("what_didnt_work", new.what_didnt_work)?,
                    required("what_next", new.what_next)?,
                );
                let id = evaluation.id;
                goal.evaluations.push(evaluation);
                Ok(id)
            })
            .map(|(_, id)| id)?;

        self.dispatch(&GoalEvent::EvaluationAdded {
            goal_id,
            evaluation_id,
            timestamp: Utc::now(),
        });
        Ok(evaluation_id)
    }

    pub fn update_evaluation(
        &mut self,
        goal_id: GoalId,
        evaluation_id: EvaluationId,
        update: EvaluationUpdate,
    ) -> Result<Goal, GoalError> {
        self.mutate(goal_id, Guard::ModifyEvaluation, "update_evaluation", |goal| {
            let evaluation = goal
                .evaluations
                .iter_mut()
                .find(|e| e.id == evaluation_id)
                .ok_or_else(|| GoalError::not_found(EntityKind::Evaluation, evaluation_id))?;

            if let Some(what_worked) = update.what_worked {
                evaluation.what_worked = required("what_worked", what_worked)?;
            }
            if let Some(what_didnt_work) = update.what_didnt_work {
                evaluation.what_didnt_work = required("what_didnt_work", what_didnt_work)?;
            }
            if let Some(what_next) = update.what_next {
                evaluation.what_next = required("what_next", what_next)?;
            }
            Ok(())
        })
        .map(|(goal, ())| goal.clone())
    }

    pub fn delete_evaluation(
        &mut self,
        goal_id: GoalId,
        evaluation_id: EvaluationId,
    ) -> Result<Goal, GoalError> {
        self.mutate(goal_id, Guard::DeleteEvaluation, "delete_evaluation", |goal| {
            let index = goal
                .evaluations
                .iter()
                .position(|e| e.id == evaluation_id)
                .ok_or_else(|| GoalError::not_found(EntityKind::Evaluation, evaluation_id))?;
            goal.evaluations.remove(index);
            Ok(())
        })
        .map(|(goal, ())| goal.clone())
    }

    // ── Evidence ────────────────────────────────────────────────

    /// Attach evidence. Allowed by status and context type together, and
    /// the context must exist in the goal.
    pub fn add_evidence(
        &mut self,
        goal_id: GoalId,
        new: NewEvidence,
    ) -> Result<EvidenceId, GoalError> {
        let context_type = new.context.context_type();
        let evidence_id = self
            .mutate(goal_id, Guard::AddEvidence(context_type), "add_evidence", |goal| {
                let evidence = build_evidence(goal, new)?;
                let id = evidence.id;
                goal.evidence.push(evidence);
                Ok(id)
            })
            .map(|(_, id)| id)?;

        self.dispatch(&GoalEvent::EvidenceAdded {
            goal_id,
            evidence_id,
            context_type,
            timestamp: Utc::now(),
        });
        Ok(evidence_id)
    }

    /// Remove evidence. Allowed in every status but Archived, whatever the
    /// evidence's context.
    pub fn remove_evidence(
        &mut self,
        goal_id: GoalId,
        evidence_id: EvidenceId,
    ) -> Result<Goal, GoalError> {
        self.mutate(goal_id, Guard::RemoveEvidence, "remove_evidence", |goal| {
            let index = goal
                .evidence
                .iter()
                .position(|e| e.id == evidence_id)
                .ok_or_else(|| GoalError::not_found(EntityKind::Evidence, evidence_id))?;
            let removed = goal.evidence.remove(index);
            tracing::debug!(
                %goal_id,
                %evidence_id,
                context_type = %removed.context_type(),
                "evidence removed"
            );
            Ok(())
        })
        .map(|(goal, ())| goal.clone())
    }
}

pub(crate) fn build_hypothesis(new: NewHypothesis) -> Result<Hypothesis, GoalError> {
    let title = required("title", new.title)?;
    let confidence_level = new
        .confidence_level
        .ok_or(GoalError::MissingField {
            field: "confidence_level",
        })?;

    let mut hypothesis = Hypothesis::new(title, confidence_level);
    hypothesis.success_factor = new.success_factor;
    hypothesis.notes = new.notes;
    hypothesis.questions = new.questions;
    Ok(hypothesis)
}

pub(crate) fn build_evidence(goal: &Goal, new: NewEvidence) -> Result<Evidence, GoalError> {
    if !goal.resolves(&new.context) {
        return Err(GoalError::InvalidReference {
            goal_id: goal.id,
            context: new.context,
        });
    }
    Ok(Evidence {
        id: EvidenceId::new(),
        artifact: new.artifact,
        description: new.description,
        context: new.context,
        phase: new.phase,
        date_added: Utc::now(),
    })
}

/// Strip a hypothesis id from every intervention, returning the
/// interventions this left with no links at all.
fn unlink_hypothesis(goal: &mut Goal, hypothesis_id: HypothesisId) -> Vec<InterventionId> {
    goal.interventions
        .iter_mut()
        .filter_map(|intervention| {
            let removed = intervention.unlink(hypothesis_id);
            (removed && intervention.hypothesis_ids.is_empty()).then_some(intervention.id)
        })
        .collect()
}

/// Deduplicate a link list and check every id names a hypothesis of the goal.
fn resolve_links(goal: &Goal, ids: Vec<HypothesisId>) -> Result<Vec<HypothesisId>, GoalError> {
    let mut links: Vec<HypothesisId> = Vec::with_capacity(ids.len());
    for id in ids {
        if goal.hypothesis(id).is_none() {
            return Err(GoalError::not_found(EntityKind::Hypothesis, id));
        }
        if !links.contains(&id) {
            links.push(id);
        }
    }
    if links.is_empty() {
        return Err(GoalError::MissingField {
            field: "hypothesis_ids",
        });
    }
    Ok(links)
}

fn intervention_mut(
    goal: &mut Goal,
    intervention_id: InterventionId,
) -> Result<&mut Intervention, GoalError> {
    goal.interventions
        .iter_mut()
        .find(|i| i.id == intervention_id)
        .ok_or_else(|| GoalError::not_found(EntityKind::Intervention, intervention_id))
}

fn required(field: &'static str, value: String) -> Result<String, GoalError> {
    if value.trim().is_empty() {
        Err(GoalError::MissingField { field })
    } else {
        Ok(value)
    }
}
