use crate::data::LoadError;

use super::Question;

/// An ordered, non-empty group of questions scored as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    title: String,
    questions: Vec<Question>,
}

impl Level {
    pub fn new(title: impl Into<String>, questions: Vec<Question>) -> Result<Self, LoadError> {
        let title = title.into();

        if questions.is_empty() {
            return Err(LoadError::EmptyLevel { level: title });
        }

        for (index, question) in questions.iter().enumerate() {
            if questions[..index]
                .iter()
                .any(|other| other.prompt() == question.prompt())
            {
                return Err(LoadError::DuplicateQuestion {
                    level: title,
                    question: question.prompt().to_string(),
                });
            }
        }

        Ok(Self { title, questions })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, prompt: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.prompt() == prompt)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
