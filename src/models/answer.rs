use serde::{Deserialize, Serialize};

use super::Question;

/// Label of the pseudo-option shown first when the "I don't know" choice is enabled.
pub const UNKNOWN_LABEL: &str = "I don't know";

/// The selection held for one question during an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Answer {
    #[default]
    Unanswered,
    /// The user picked the "I don't know" pseudo-option.
    Unknown,
    Chosen(String),
}

impl Answer {
    /// The label this answer corresponds to, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            Answer::Unanswered => None,
            Answer::Unknown => Some(UNKNOWN_LABEL),
            Answer::Chosen(label) => Some(label),
        }
    }

    pub fn is_answered(&self) -> bool {
        !matches!(self, Answer::Unanswered)
    }

    /// Exact match against the correct option; unanswered and unknown never score.
    pub fn is_correct(&self, question: &Question) -> bool {
        matches!(self, Answer::Chosen(label) if label == question.correct())
    }
}
