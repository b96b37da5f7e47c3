use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::catalog::QuizCatalog;
use crate::models::{Level, MAX_OPTIONS, MIN_OPTIONS, Question};

use super::OrderedMap;

/// Reasons a quiz catalog cannot be built. All of them are fatal at startup.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed quiz data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("quiz data must contain at least one level")]
    EmptyCatalog,
    #[error("level `{level}` has no questions")]
    EmptyLevel { level: String },
    #[error("level `{level}` appears more than once")]
    DuplicateLevel { level: String },
    #[error("level `{level}` repeats question `{question}`")]
    DuplicateQuestion { level: String, question: String },
    #[error(
        "question `{question}` has {count} options, expected {min} to {max}",
        min = MIN_OPTIONS,
        max = MAX_OPTIONS
    )]
    OptionCount { question: String, count: usize },
    #[error("question `{question}` lists option `{option}` twice")]
    DuplicateOption { question: String, option: String },
    #[error("question `{question}` uses the reserved \"I don't know\" label as an option")]
    ReservedLabel { question: String },
    #[error("level `{level}` has no correct answer for `{question}`")]
    MissingCorrectAnswer { level: String, question: String },
    #[error("correct answer `{answer}` is not an option of `{question}`")]
    CorrectAnswerNotAnOption { question: String, answer: String },
    #[error("level `{level}` has a correct answer for unknown question `{question}`")]
    UnknownQuestion { level: String, question: String },
    #[error("level `{level}` names missing successor `{successor}`")]
    UnknownSuccessor { level: String, successor: String },
    #[error("level `{level}` is reached twice while following successors")]
    SuccessorCycle { level: String },
    #[error("level `{level}` cannot be reached from the first level")]
    UnreachableLevel { level: String },
}

#[derive(Deserialize)]
struct RawLevel {
    questions: OrderedMap<Vec<String>>,
    correct_answers: OrderedMap<String>,
    #[serde(default)]
    next: Option<String>,
}

impl RawLevel {
    fn into_level(self, title: String) -> Result<(Level, Option<String>), LoadError> {
        let RawLevel {
            questions,
            correct_answers,
            next,
        } = self;

        if let Some(stray) = correct_answers.keys().find(|p| !questions.contains_key(p)) {
            return Err(LoadError::UnknownQuestion {
                level: title,
                question: stray.to_string(),
            });
        }

        let mut built = Vec::new();
        for (prompt, options) in questions {
            let Some(correct) = correct_answers.get(&prompt) else {
                return Err(LoadError::MissingCorrectAnswer {
                    level: title,
                    question: prompt,
                });
            };
            let correct = correct.clone();
            built.push(Question::new(prompt, options, correct)?);
        }

        Ok((Level::new(title, built)?, next))
    }
}

/// Load and validate a quiz catalog from a JSON file.
pub fn load_catalog_from_json<P: AsRef<Path>>(path: P) -> Result<QuizCatalog, LoadError> {
    let path = path.as_ref();

    let json = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = parse_catalog(&json)?;

    info!(
        path = %path.display(),
        levels = catalog.level_count(),
        questions = catalog.total_possible(),
        "loaded quiz catalog"
    );
    Ok(catalog)
}

/// Parse a catalog from JSON text.
///
/// The top-level object is keyed by level title; each level holds a
/// `questions` object (prompt to options), a `correct_answers` object
/// (prompt to option) and an optional `next` successor title.
pub fn parse_catalog(json: &str) -> Result<QuizCatalog, LoadError> {
    let raw: OrderedMap<RawLevel> = serde_json::from_str(json)?;

    let entries = raw
        .into_iter()
        .map(|(title, level)| level.into_level(title))
        .collect::<Result<Vec<_>, _>>()?;

    QuizCatalog::chained(entries)
}
