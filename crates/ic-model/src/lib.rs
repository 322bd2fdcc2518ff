//! # ic-model
//!
//! Entity and value types for Improvement Cycle school-improvement goals.
//!
//! A [`Goal`] is the aggregate root. It moves through the lifecycle
//! Draft → Active → Closed → Archived (see [`GoalStatus`]) and owns its
//! hypotheses, interventions (with follow-ups), evaluations and evidence.
//!
//! This crate has no notion of authorization; the rules deciding which
//! changes are legal live in `ic-policy`, and the operations applying them
//! live in `ic-goal`.

pub mod catalog;
pub mod error;
pub mod evaluation;
pub mod evidence;
pub mod goal;
pub mod hypothesis;
pub mod ids;
pub mod intervention;
pub mod status;

pub use catalog::{blank_reflection_answers, validate_reflection_answers, SuccessFactor};
pub use error::ModelError;
pub use evaluation::{Evaluation, EvaluationPlan};
pub use evidence::{Artifact, ContextType, Evidence, EvidenceContext};
pub use goal::{Goal, Period, SituationAnalysis};
pub use hypothesis::{ConfidenceLevel, Hypothesis, ReflectionAnswer};
pub use ids::{EvaluationId, EvidenceId, FollowUpId, GoalId, HypothesisId, InterventionId};
pub use intervention::{FollowUp, FollowUpKind, Intervention};
pub use status::GoalStatus;
