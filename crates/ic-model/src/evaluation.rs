// evaluation.rs - Reflective records made before (and after) closing a goal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::EvaluationId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Evaluation {
    pub id: EvaluationId,
    pub what_worked: String,
    pub what_didnt_work: String,
    pub what_next: String,
    pub date_added: DateTime<Utc>,
}

impl Evaluation {
    pub fn new(
        what_worked: impl Into<String>,
        what_didnt_work: impl Into<String>,
        what_next: impl Into<String>,
    ) -> Self {
        Self {
            id: EvaluationId::new(),
            what_worked: what_worked.into(),
            what_didnt_work: what_didnt_work.into(),
            what_next: what_next.into(),
            date_added: Utc::now(),
        }
    }
}

/// The goal's single evaluation plan: how and when success will be judged,
/// plus the final reflection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvaluationPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub what_worked: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub what_didnt_work: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub what_next: Option<String>,
    #[serde(default)]
    pub is_closed: bool,
}
