// goal.rs - Goal: the aggregate root of one improvement initiative.
//
// A goal owns everything recorded during its investigative cycle:
// - The situation analysis (what is going on?)
// - Hypotheses (why is it going on?)
// - Interventions and their follow-ups (what are we doing about it?)
// - Evaluations and the evaluation plan (did it work?)
// - Evidence attached to any of the above
//
// Child collections are only changed through GoalStore operations, which
// consult the guard predicates first.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::evaluation::{Evaluation, EvaluationPlan};
use crate::evidence::{Evidence, EvidenceContext};
use crate::hypothesis::Hypothesis;
use crate::ids::{EvaluationId, EvidenceId, FollowUpId, GoalId, HypothesisId, InterventionId};
use crate::intervention::{FollowUp, Intervention};
use crate::status::GoalStatus;

/// Free-text description of the starting situation. All parts optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SituationAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_groups: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns_over_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected_factors: Option<String>,
}

/// Legacy start/end period. Kept for compatibility; carries no invariants.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Period {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Goal {
    pub id: GoalId,

    pub title: String,

    pub school: String,

    /// School year, e.g. "2025-2026". Empty on a freshly duplicated goal
    /// until the caller picks the new year.
    pub school_year: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(default)]
    pub description: String,

    pub status: GoalStatus,

    #[serde(default)]
    pub situation_analysis: SituationAnalysis,

    #[serde(default)]
    pub hypotheses: Vec<Hypothesis>,

    #[serde(default)]
    pub interventions: Vec<Intervention>,

    #[serde(default)]
    pub evaluations: Vec<Evaluation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_plan: Option<EvaluationPlan>,

    #[serde(default)]
    pub evidence: Vec<Evidence>,

    #[serde(default)]
    pub period: Period,

    /// The goal this one continues, when created as a new cycle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continued_from: Option<GoalId>,

    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Create a new goal in the Draft status with empty child collections.
    pub fn new(
        title: impl Into<String>,
        school: impl Into<String>,
        school_year: impl Into<String>,
    ) -> Self {
        Self {
            id: GoalId::new(),
            title: title.into(),
            school: school.into(),
            school_year: school_year.into(),
            scope: None,
            class_name: None,
            subject: None,
            description: String::new(),
            status: GoalStatus::Draft,
            situation_analysis: SituationAnalysis::default(),
            hypotheses: Vec::new(),
            interventions: Vec::new(),
            evaluations: Vec::new(),
            evaluation_plan: None,
            evidence: Vec::new(),
            period: Period::default(),
            continued_from: None,
            created_at: Utc::now(),
        }
    }

    /// Move to a new status. Returns an error if the edge does not exist.
    pub fn transition(&mut self, next: GoalStatus) -> Result<(), ModelError> {
        if !self.status.can_transition_to(next) {
            return Err(ModelError::InvalidTransition {
                goal_id: self.id,
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    pub fn hypothesis(&self, id: HypothesisId) -> Option<&Hypothesis> {
        self.hypotheses.iter().find(|h| h.id == id)
    }

    pub fn intervention(&self, id: InterventionId) -> Option<&Intervention> {
        self.interventions.iter().find(|i| i.id == id)
    }

    pub fn evaluation(&self, id: EvaluationId) -> Option<&Evaluation> {
        self.evaluations.iter().find(|e| e.id == id)
    }

    pub fn evidence_item(&self, id: EvidenceId) -> Option<&Evidence> {
        self.evidence.iter().find(|e| e.id == id)
    }

    /// Find a follow-up anywhere in the goal, with its intervention.
    pub fn follow_up(&self, id: FollowUpId) -> Option<(&Intervention, &FollowUp)> {
        self.interventions
            .iter()
            .find_map(|i| i.follow_up(id).map(|f| (i, f)))
    }

    /// Whether an evidence context points at an entity inside this goal.
    pub fn resolves(&self, context: &EvidenceContext) -> bool {
        match context {
            EvidenceContext::Goal => true,
            EvidenceContext::Hypothesis(id) => self.hypothesis(*id).is_some(),
            EvidenceContext::FollowUp(id) => self.follow_up(*id).is_some(),
            EvidenceContext::Evaluation(id) => self.evaluation(*id).is_some(),
        }
    }

    /// Evidence attached to one specific context.
    pub fn evidence_for(&self, context: EvidenceContext) -> impl Iterator<Item = &Evidence> {
        self.evidence.iter().filter(move |e| e.context == context)
    }

    /// Interventions that are no longer linked to any hypothesis.
    pub fn unlinked_interventions(&self) -> impl Iterator<Item = &Intervention> {
        self.interventions
            .iter()
            .filter(|i| i.hypothesis_ids.is_empty())
    }
}
