//! # ic-policy
//!
//! Guard predicates for Improvement Cycle goals.
//!
//! Whether a change to a goal is legal depends on the goal's status alone,
//! except for evidence, which also depends on the context being attached to.
//! The rules are plain functions in [`predicates`]; [`LifecyclePolicy`]
//! names them per operation ([`Guard`]) and explains its decisions.
//!
//! ## Key rules
//!
//! - Draft and Active goals are editable; Closed and Archived goals are not.
//! - The first intervention on a Draft goal needs a hypothesis.
//! - Follow-ups need an Active goal; evaluations an Active or Closed one.
//! - A Closed goal accepts evaluation evidence only; an Archived goal none.

pub mod engine;
pub mod predicates;

pub use engine::{EvaluationStep, EvaluationTrace, Guard, GuardDecision, LifecyclePolicy};
pub use predicates::{
    can_add_evaluation, can_add_evidence, can_add_follow_up, can_add_hypothesis,
    can_add_intervention, can_close_goal, can_edit_goal, can_reopen_goal,
};
