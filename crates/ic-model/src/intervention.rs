// intervention.rs - Planned actions and their follow-up observations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{FollowUpId, HypothesisId, InterventionId};

/// A planned action addressing one or more hypotheses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Intervention {
    pub id: InterventionId,
    pub description: String,
    pub expected_effect: String,

    /// Linked hypotheses, in link order, without duplicates. Non-empty at
    /// creation; may become empty when linked hypotheses are deleted.
    pub hypothesis_ids: Vec<HypothesisId>,

    #[serde(default)]
    pub follow_ups: Vec<FollowUp>,

    pub date_added: DateTime<Utc>,
}

impl Intervention {
    pub fn is_linked_to(&self, hypothesis_id: HypothesisId) -> bool {
        self.hypothesis_ids.contains(&hypothesis_id)
    }

    /// Remove a hypothesis link. Returns true if the link existed.
    pub fn unlink(&mut self, hypothesis_id: HypothesisId) -> bool {
        if !self.is_linked_to(hypothesis_id) {
            return false;
        }
        self.hypothesis_ids.retain(|id| *id != hypothesis_id);
        true
    }

    pub fn follow_up(&self, id: FollowUpId) -> Option<&FollowUp> {
        self.follow_ups.iter().find(|f| f.id == id)
    }
}

/// What a follow-up observes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpKind {
    /// Is the intervention carried out as planned?
    Implementation,
    /// Does the intervention have the expected effect?
    Effect,
}

/// A dated observation recorded against an intervention.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FollowUp {
    pub id: FollowUpId,

    #[serde(rename = "type")]
    pub kind: FollowUpKind,

    pub observation: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint_date: Option<NaiveDate>,

    pub date_added: DateTime<Utc>,
}
