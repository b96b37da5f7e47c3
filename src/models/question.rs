use crate::data::LoadError;

use super::UNKNOWN_LABEL;

pub const MIN_OPTIONS: usize = 3;
pub const MAX_OPTIONS: usize = 4;

/// A single multiple-choice question. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    options: Vec<String>,
    correct: String,
}

impl Question {
    /// Builds a question, checking the option set and that `correct` belongs to it.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct: impl Into<String>,
    ) -> Result<Self, LoadError> {
        let prompt = prompt.into();
        let correct = correct.into();

        if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&options.len()) {
            return Err(LoadError::OptionCount {
                question: prompt,
                count: options.len(),
            });
        }

        for (index, option) in options.iter().enumerate() {
            if option == UNKNOWN_LABEL {
                return Err(LoadError::ReservedLabel { question: prompt });
            }
            if options[..index].contains(option) {
                return Err(LoadError::DuplicateOption {
                    question: prompt,
                    option: option.clone(),
                });
            }
        }

        if !options.contains(&correct) {
            return Err(LoadError::CorrectAnswerNotAnOption {
                question: prompt,
                answer: correct,
            });
        }

        Ok(Self {
            prompt,
            options,
            correct,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Options in their source order.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct(&self) -> &str {
        &self.correct
    }
}
