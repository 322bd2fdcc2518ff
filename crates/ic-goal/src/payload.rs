// payload.rs - Input and output shapes for store operations.
//
// "New*" payloads carry the values a form supplies when creating an entity;
// the store assigns ids and timestamps. "*Update" payloads are shallow
// merges: `None` leaves a field untouched, `Some` replaces it.

use chrono::NaiveDate;
use ic_model::{
    Artifact, ConfidenceLevel, EvidenceContext, FollowUpKind, Goal, GoalStatus, HypothesisId,
    InterventionId, Period, ReflectionAnswer, SituationAnalysis, SuccessFactor,
};
use serde::{Deserialize, Serialize};

/// Fields for a new goal.
///
/// `situation_analysis` and `hypotheses` are seeds carried over from an
/// earlier cycle; `evidence` is baseline evidence captured with the goal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewGoal {
    pub title: String,
    pub school: String,
    pub school_year: String,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub period: Period,
    #[serde(default)]
    pub situation_analysis: Option<SituationAnalysis>,
    #[serde(default)]
    pub hypotheses: Vec<NewHypothesis>,
    #[serde(default)]
    pub evidence: Vec<NewEvidence>,
}

/// Descriptive and classification fields of a goal.
///
/// There is no status field: status only changes through the
/// dedicated transition operations. For the optional fields, `Some("")`
/// clears the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalUpdate {
    pub title: Option<String>,
    pub school: Option<String>,
    pub school_year: Option<String>,
    pub scope: Option<String>,
    pub class_name: Option<String>,
    pub subject: Option<String>,
    pub description: Option<String>,
    pub period: Option<Period>,
}

/// How much of the source goal a duplicate inherits.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateMode {
    /// Classification fields only.
    #[default]
    Copy,
    /// Classification plus situation analysis and hypotheses, linked back to
    /// the source through `continued_from`.
    NewCycle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHypothesis {
    pub title: String,
    #[serde(default)]
    pub success_factor: SuccessFactor,
    /// Required; `None` models a form where nothing was selected.
    pub confidence_level: Option<ConfidenceLevel>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub questions: Vec<ReflectionAnswer>,
}

impl NewHypothesis {
    pub fn new(title: impl Into<String>, confidence_level: ConfidenceLevel) -> Self {
        Self {
            title: title.into(),
            success_factor: SuccessFactor::NotApplicable,
            confidence_level: Some(confidence_level),
            notes: None,
            questions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HypothesisUpdate {
    pub title: Option<String>,
    pub success_factor: Option<SuccessFactor>,
    pub confidence_level: Option<ConfidenceLevel>,
    pub notes: Option<String>,
    pub questions: Option<Vec<ReflectionAnswer>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIntervention {
    pub description: String,
    pub expected_effect: String,
    pub hypothesis_ids: Vec<HypothesisId>,
}

impl NewIntervention {
    pub fn new(
        description: impl Into<String>,
        expected_effect: impl Into<String>,
        hypothesis_ids: impl IntoIterator<Item = HypothesisId>,
    ) -> Self {
        Self {
            description: description.into(),
            expected_effect: expected_effect.into(),
            hypothesis_ids: hypothesis_ids.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterventionUpdate {
    pub description: Option<String>,
    pub expected_effect: Option<String>,
    pub hypothesis_ids: Option<Vec<HypothesisId>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFollowUp {
    #[serde(rename = "type")]
    pub kind: FollowUpKind,
    pub observation: String,
    #[serde(default)]
    pub checkpoint_date: Option<NaiveDate>,
}

impl NewFollowUp {
    pub fn new(kind: FollowUpKind, observation: impl Into<String>) -> Self {
        Self {
            kind,
            observation: observation.into(),
            checkpoint_date: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FollowUpUpdate {
    #[serde(rename = "type")]
    pub kind: Option<FollowUpKind>,
    pub observation: Option<String>,
    pub checkpoint_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvaluation {
    pub what_worked: String,
    pub what_didnt_work: String,
    pub what_next: String,
}

impl NewEvaluation {
    pub fn new(
        what_worked: impl Into<String>,
        what_didnt_work: impl Into<String>,
        what_next: impl Into<String>,
    ) -> Self {
        Self {
            what_worked: what_worked.into(),
            what_didnt_work: what_didnt_work.into(),
            what_next: what_next.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationUpdate {
    pub what_worked: Option<String>,
    pub what_didnt_work: Option<String>,
    pub what_next: Option<String>,
}

/// An attachment supplied by the file or chart picker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvidence {
    pub artifact: Artifact,
    #[serde(default)]
    pub description: Option<String>,
    pub context: EvidenceContext,
    #[serde(default)]
    pub phase: Option<String>,
}

impl NewEvidence {
    pub fn new(artifact: Artifact, context: EvidenceContext) -> Self {
        Self {
            artifact,
            description: None,
            context,
            phase: None,
        }
    }

    pub fn file(name: impl Into<String>, url: impl Into<String>, context: EvidenceContext) -> Self {
        Self::new(
            Artifact::File {
                name: name.into(),
                url: url.into(),
            },
            context,
        )
    }

    pub fn chart(chart_id: impl Into<String>, context: EvidenceContext) -> Self {
        Self::new(
            Artifact::Chart {
                chart_id: chart_id.into(),
            },
            context,
        )
    }
}

/// Result of deleting a hypothesis.
#[derive(Debug, Clone)]
pub struct HypothesisRemoval {
    /// The goal after the deletion.
    pub goal: Goal,
    /// Interventions whose only hypothesis link was the deleted one and
    /// which are now unlinked. Callers should warn the user about these.
    pub unlinked_interventions: Vec<InterventionId>,
}

/// Read-side filter for listing goals. Unset fields match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalFilter {
    pub status: Option<GoalStatus>,
    pub school: Option<String>,
    pub school_year: Option<String>,
}

impl GoalFilter {
    pub fn matches(&self, goal: &Goal) -> bool {
        self.status.map_or(true, |s| goal.status == s)
            && self.school.as_deref().map_or(true, |s| goal.school == s)
            && self
                .school_year
                .as_deref()
                .map_or(true, |y| goal.school_year == y)
    }
}
