// hypothesis.rs - A stated possible cause for the observed problem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::SuccessFactor;
use crate::ids::HypothesisId;

/// How sure the team is that a hypothesis explains the problem.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Certain,
    Uncertain,
    NeedMoreData,
}

/// One reflection question and the answer given to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReflectionAnswer {
    pub question: String,
    pub answer: String,
}

impl ReflectionAnswer {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hypothesis {
    pub id: HypothesisId,

    /// The hypothesis statement.
    pub title: String,

    #[serde(default)]
    pub success_factor: SuccessFactor,

    pub confidence_level: ConfidenceLevel,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Answers to the success factor's reflection questions. Empty when the
    /// factor is `NotApplicable`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<ReflectionAnswer>,

    pub date_added: DateTime<Utc>,
}

impl Hypothesis {
    /// Create a hypothesis with a fresh id, stamped now.
    pub fn new(title: impl Into<String>, confidence_level: ConfidenceLevel) -> Self {
        Self {
            id: HypothesisId::new(),
            title: title.into(),
            success_factor: SuccessFactor::NotApplicable,
            confidence_level,
            notes: None,
            questions: Vec::new(),
            date_added: Utc::now(),
        }
    }

    /// Copy this hypothesis under a fresh id and timestamp (new-cycle carry-over).
    pub fn carried_over(&self) -> Self {
        Self {
            id: HypothesisId::new(),
            date_added: Utc::now(),
            ..self.clone()
        }
    }
}
