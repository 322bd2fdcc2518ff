// evidence.rs - Attached artifacts (files or charts) and what they attach to.
//
// Evidence is stored flat on the goal, not nested under children. The
// `context` says which part of the goal an attachment belongs to: the goal
// itself, or one specific hypothesis, follow-up or evaluation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{EvaluationId, EvidenceId, FollowUpId, HypothesisId};

/// The attached artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Artifact {
    File { name: String, url: String },
    Chart { chart_id: String },
}

/// The kind of sub-area an attachment targets (the `contextType`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ContextType {
    Goal,
    Hypothesis,
    FollowUp,
    Evaluation,
}

impl ContextType {
    pub const ALL: [ContextType; 4] = [
        ContextType::Goal,
        ContextType::Hypothesis,
        ContextType::FollowUp,
        ContextType::Evaluation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContextType::Goal => "goal",
            ContextType::Hypothesis => "hypothesis",
            ContextType::FollowUp => "follow-up",
            ContextType::Evaluation => "evaluation",
        }
    }
}

impl fmt::Display for ContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The entity an attachment belongs to: context type plus context id.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "context_type", content = "context_id", rename_all = "kebab-case")]
pub enum EvidenceContext {
    Goal,
    Hypothesis(HypothesisId),
    FollowUp(FollowUpId),
    Evaluation(EvaluationId),
}

impl EvidenceContext {
    pub fn context_type(&self) -> ContextType {
        match self {
            EvidenceContext::Goal => ContextType::Goal,
            EvidenceContext::Hypothesis(_) => ContextType::Hypothesis,
            EvidenceContext::FollowUp(_) => ContextType::FollowUp,
            EvidenceContext::Evaluation(_) => ContextType::Evaluation,
        }
    }
}

impl fmt::Display for EvidenceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvidenceContext::Goal => write!(f, "goal"),
            EvidenceContext::Hypothesis(id) => write!(f, "hypothesis {id}"),
            EvidenceContext::FollowUp(id) => write!(f, "follow-up {id}"),
            EvidenceContext::Evaluation(id) => write!(f, "evaluation {id}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Evidence {
    pub id: EvidenceId,

    pub artifact: Artifact,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub context: EvidenceContext,

    /// Display tag such as "baseline". Used for filtering only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,

    pub date_added: DateTime<Utc>,
}

impl Evidence {
    pub fn context_type(&self) -> ContextType {
        self.context.context_type()
    }
}
