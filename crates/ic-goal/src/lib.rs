//! # ic-goal
//!
//! Goal store and guarded lifecycle operations for Improvement Cycle.
//!
//! A [`GoalStore`] holds every goal in memory and is the only way to change
//! one. Each operation looks up the goal, asks the lifecycle policy whether
//! the change is allowed in the goal's current status, and then replaces the
//! goal with an updated snapshot. Rejections are explicit:
//! [`GoalError::GuardRejected`] for a denied guard and
//! [`GoalError::NotFound`] for a missing goal or child.
//!
//! ## Key components
//!
//! - [`GoalStore`] - goals plus every mutation operation
//! - [`EngineConfig`] - TOML configuration (legacy reactivation, event log)
//! - [`GoalEvent`] - events emitted at lifecycle points
//! - [`EventDispatcher`] / [`NotificationSink`] - event fan-out to sinks
//!
//! ## Quick Example
//!
//! ```rust
//! use ic_goal::{GoalStore, NewGoal, NewHypothesis, NewIntervention};
//! use ic_model::{ConfidenceLevel, GoalStatus};
//!
//! let mut store = GoalStore::new();
//! let goal_id = store
//!     .add_goal(NewGoal {
//!         title: "Improve reading comprehension".to_string(),
//!         school: "De Regenboog".to_string(),
//!         school_year: "2025-2026".to_string(),
//!         ..Default::default()
//!     })
//!     .unwrap();
//!
//! let h1 = store
//!     .add_hypothesis(goal_id, NewHypothesis::new("Too little reading time", ConfidenceLevel::Uncertain))
//!     .unwrap();
//! store
//!     .add_intervention(goal_id, NewIntervention::new("Daily reading quarter", "More fluent readers", [h1]))
//!     .unwrap();
//!
//! assert_eq!(store.get(goal_id).unwrap().status, GoalStatus::Active);
//! ```

pub mod children;
pub mod config;
pub mod error;
pub mod events;
pub mod payload;
pub mod store;

pub use config::EngineConfig;
pub use error::{EntityKind, GoalError};
pub use events::{EventDispatcher, GoalEvent, LogSink, MemorySink, NotificationSink};
pub use payload::{
    DuplicateMode, EvaluationUpdate, FollowUpUpdate, GoalFilter, GoalUpdate, HypothesisRemoval,
    HypothesisUpdate, InterventionUpdate, NewEvaluation, NewEvidence, NewFollowUp, NewGoal,
    NewHypothesis, NewIntervention,
};
pub use store::GoalStore;
