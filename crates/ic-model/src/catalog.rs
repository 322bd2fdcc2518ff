// catalog.rs - The fixed catalog of school success factors.
//
// A hypothesis may be tied to one success factor. Each real factor carries a
// set of reflection questions that the form layer asks the user to answer
// before the hypothesis is saved. `NotApplicable` is the explicit fallback
// for "no factor" and for any unrecognised input.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hypothesis::ReflectionAnswer;

/// A success factor from the fixed catalog.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SuccessFactor {
    #[default]
    NotApplicable,
    ClearGoals,
    DataUse,
    TeacherCollaboration,
    InstructionalQuality,
    SchoolLeadership,
    StudentWellbeing,
    ParentInvolvement,
}

impl SuccessFactor {
    /// Every catalog entry, `NotApplicable` first.
    pub const ALL: [SuccessFactor; 8] = [
        SuccessFactor::NotApplicable,
        SuccessFactor::ClearGoals,
        SuccessFactor::DataUse,
        SuccessFactor::TeacherCollaboration,
        SuccessFactor::InstructionalQuality,
        SuccessFactor::SchoolLeadership,
        SuccessFactor::StudentWellbeing,
        SuccessFactor::ParentInvolvement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SuccessFactor::NotApplicable => "not_applicable",
            SuccessFactor::ClearGoals => "clear_goals",
            SuccessFactor::DataUse => "data_use",
            SuccessFactor::TeacherCollaboration => "teacher_collaboration",
            SuccessFactor::InstructionalQuality => "instructional_quality",
            SuccessFactor::SchoolLeadership => "school_leadership",
            SuccessFactor::StudentWellbeing => "student_wellbeing",
            SuccessFactor::ParentInvolvement => "parent_involvement",
        }
    }

    /// Parse loosely-typed input (e.g. a form select value).
    ///
    /// Blank or unknown values fall back to [`SuccessFactor::NotApplicable`].
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|factor| factor.as_str().eq_ignore_ascii_case(value))
            .unwrap_or(SuccessFactor::NotApplicable)
    }

    /// The reflection questions defined for this factor.
    ///
    /// Empty for `NotApplicable`.
    pub fn reflection_questions(&self) -> &'static [&'static str] {
        match self {
            SuccessFactor::NotApplicable => &[],
            SuccessFactor::ClearGoals => &[
                "Are the goals known to everyone involved?",
                "Are the goals concrete enough to observe progress?",
            ],
            SuccessFactor::DataUse => &[
                "Which data sources were consulted?",
                "How are the data discussed within the team?",
            ],
            SuccessFactor::TeacherCollaboration => &[
                "How often do teachers discuss this problem together?",
                "Which agreements exist about a shared approach?",
            ],
            SuccessFactor::InstructionalQuality => &[
                "Which instructional practices are currently used?",
                "How is instruction differentiated for this group?",
            ],
            SuccessFactor::SchoolLeadership => &[
                "How does school leadership support this goal?",
                "Which time and resources are made available?",
            ],
            SuccessFactor::StudentWellbeing => &[
                "How do students experience the learning environment?",
                "Which signals of low wellbeing have been observed?",
            ],
            SuccessFactor::ParentInvolvement => &[
                "How are parents informed about this problem?",
                "What role can parents play in the approach?",
            ],
        }
    }

    pub fn has_reflection_questions(&self) -> bool {
        !self.reflection_questions().is_empty()
    }
}

impl fmt::Display for SuccessFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-side check that every reflection question of `factor` carries a
/// non-empty answer.
///
/// Returns the unanswered questions on failure. The store never calls this;
/// it belongs to whichever form collects the answers.
pub fn validate_reflection_answers(
    factor: SuccessFactor,
    answers: &[ReflectionAnswer],
) -> Result<(), Vec<&'static str>> {
    let missing: Vec<&'static str> = factor
        .reflection_questions()
        .iter()
        .copied()
        .filter(|question| {
            !answers
                .iter()
                .any(|a| a.question == *question && !a.answer.trim().is_empty())
        })
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

/// Blank answer slots for every question of `factor`, ready to be filled in.
pub fn blank_reflection_answers(factor: SuccessFactor) -> Vec<ReflectionAnswer> {
    factor
        .reflection_questions()
        .iter()
        .map(|question| ReflectionAnswer::new(*question, ""))
        .collect()
}
