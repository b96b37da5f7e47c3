//! Level-by-level quiz progression.
//!
//! The engine never owns session data. Every operation takes the
//! caller's [`SessionState`], validates the request and either applies
//! it in full or returns an error with the state untouched. A front-end
//! that rebuilds itself on every interaction keeps one state value per
//! user and passes it back on each call.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::QuizCatalog;
use crate::models::{Answer, Level, Phase, UNKNOWN_LABEL};
use crate::shuffle::{OptionShuffler, RandomShuffler};

/// Correct answers needed to pass a level of `question_count` questions.
///
/// Floor division, so a three-question level passes with one correct answer.
pub fn pass_threshold(question_count: usize) -> usize {
    question_count / 2
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Offer an "I don't know" choice ahead of the real options.
    pub include_unknown_option: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            include_unknown_option: true,
        }
    }
}

/// Engine operations, named in transition errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    RecordAnswer,
    Submit,
    Advance,
    Retry,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::RecordAnswer => "record an answer",
            Operation::Submit => "submit",
            Operation::Advance => "advance",
            Operation::Retry => "retry",
        };
        f.write_str(name)
    }
}

/// Rejected engine operations. The session is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("`{label}` is not an option of `{question}`")]
    InvalidSelection { question: String, label: String },
    #[error("`{question}` is not part of the current level")]
    UnknownQuestion { question: String },
    #[error("cannot {operation} while the level is {phase}")]
    IllegalTransition {
        operation: Operation,
        phase: Phase,
        passed: bool,
    },
    #[error("session points at level {level}, which this catalog does not have")]
    UnknownLevel { level: usize },
    #[error("session questions do not match level `{level}`")]
    StaleAttempt { level: String },
}

/// Per-question state for the running attempt: frozen labels plus the selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionState {
    prompt: String,
    labels: Vec<String>,
    answer: Answer,
}

impl QuestionState {
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Display labels in the order fixed when the attempt began.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn answer(&self) -> &Answer {
        &self.answer
    }

    /// Position of the current selection within [`Self::labels`].
    pub fn selected_index(&self) -> Option<usize> {
        let label = self.answer.label()?;
        self.labels.iter().position(|l| l == label)
    }
}

/// Outcome of scoring one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelResult {
    pub score: usize,
    pub out_of: usize,
    pub passed: bool,
}

/// Result of [`QuizEngine::submit`]. `recorded` is false when the attempt
/// had already been scored and nothing was added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    pub result: LevelResult,
    pub recorded: bool,
}

/// One scored attempt, kept for the results screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub level: String,
    pub result: LevelResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    NextLevel(String),
    Complete,
}

/// Everything that must survive between interactions for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    level: usize,
    phase: Phase,
    questions: Vec<QuestionState>,
    result: Option<LevelResult>,
    cumulative_score: usize,
    attempts: usize,
    history: Vec<LevelRecord>,
}

impl SessionState {
    /// Index of the current level in the catalog.
    pub fn level_index(&self) -> usize {
        self.level
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Questions of the current level, in level order.
    pub fn questions(&self) -> &[QuestionState] {
        &self.questions
    }

    pub fn question(&self, prompt: &str) -> Option<&QuestionState> {
        self.questions.iter().find(|q| q.prompt == prompt)
    }

    pub fn answered_count(&self) -> usize {
        self.questions.iter().filter(|q| q.answer.is_answered()).count()
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.phase, Phase::Submitted | Phase::Complete)
    }

    pub fn level_passed(&self) -> bool {
        self.result.is_some_and(|r| r.passed)
    }

    /// Score of the current attempt once submitted.
    pub fn level_score(&self) -> Option<usize> {
        self.result.map(|r| r.score)
    }

    pub fn level_result(&self) -> Option<LevelResult> {
        self.result
    }

    pub fn cumulative_score(&self) -> usize {
        self.cumulative_score
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Attempts made at the current level, counting the one in progress.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Every scored attempt since the last restart, oldest first.
    pub fn history(&self) -> &[LevelRecord] {
        &self.history
    }

    pub fn final_score_available(&self) -> bool {
        self.is_complete()
    }

    pub fn total_score(&self) -> usize {
        self.cumulative_score
    }
}

/// Applies quiz transitions to caller-owned [`SessionState`] values.
///
/// One engine can serve any number of sessions; it holds only the
/// catalog, the shuffler and configuration.
#[derive(Debug)]
pub struct QuizEngine<S = RandomShuffler> {
    catalog: QuizCatalog,
    shuffler: S,
    config: EngineConfig,
}

impl QuizEngine<RandomShuffler> {
    pub fn new(catalog: QuizCatalog, config: EngineConfig) -> Self {
        Self::with_shuffler(catalog, config, RandomShuffler)
    }
}

impl<S: OptionShuffler> QuizEngine<S> {
    pub fn with_shuffler(catalog: QuizCatalog, config: EngineConfig, shuffler: S) -> Self {
        Self {
            catalog,
            shuffler,
            config,
        }
    }

    pub fn catalog(&self) -> &QuizCatalog {
        &self.catalog
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn total_possible(&self) -> usize {
        self.catalog.total_possible()
    }

    /// A fresh session on the first level.
    pub fn new_session(&self) -> SessionState {
        let mut state = SessionState {
            level: 0,
            phase: Phase::Answering,
            questions: Vec::new(),
            result: None,
            cumulative_score: 0,
            attempts: 0,
            history: Vec::new(),
        };
        self.begin_attempt(&mut state, 0);
        state
    }

    pub fn current_level(&self, state: &SessionState) -> Result<&Level, SessionError> {
        self.catalog
            .level_at(state.level)
            .ok_or(SessionError::UnknownLevel { level: state.level })
    }

    /// Store `label` as the selection for `question`. Last write wins.
    pub fn record_answer(
        &self,
        state: &mut SessionState,
        question: &str,
        label: &str,
    ) -> Result<(), SessionError> {
        if state.phase != Phase::Answering {
            return Err(self.deny(state, Operation::RecordAnswer));
        }
        self.check_attempt(state)?;

        let Some(slot) = state.questions.iter_mut().find(|q| q.prompt == question) else {
            warn!(question, "answer for a question outside the current level");
            return Err(SessionError::UnknownQuestion {
                question: question.to_string(),
            });
        };

        if !slot.labels.iter().any(|l| l == label) {
            warn!(question, label, "rejected selection not among displayed options");
            return Err(SessionError::InvalidSelection {
                question: question.to_string(),
                label: label.to_string(),
            });
        }

        slot.answer = if label == UNKNOWN_LABEL {
            Answer::Unknown
        } else {
            Answer::Chosen(label.to_string())
        };
        debug!(question, label, "recorded answer");
        Ok(())
    }

    /// Score the current attempt and add it to the running total once.
    pub fn submit(&self, state: &mut SessionState) -> Result<Submission, SessionError> {
        match (state.phase, state.result) {
            (Phase::Answering, _) => {}
            (Phase::Submitted, Some(result)) => {
                self.check_attempt(state)?;
                debug!("attempt already scored, nothing added");
                return Ok(Submission {
                    result,
                    recorded: false,
                });
            }
            _ => return Err(self.deny(state, Operation::Submit)),
        }

        let level = self.check_attempt(state)?;
        let score = level
            .questions()
            .iter()
            .filter(|q| {
                state
                    .question(q.prompt())
                    .is_some_and(|s| s.answer.is_correct(q))
            })
            .count();
        let out_of = level.len();
        let result = LevelResult {
            score,
            out_of,
            passed: score >= pass_threshold(out_of),
        };

        state.cumulative_score += score;
        state.result = Some(result);
        state.phase = Phase::Submitted;
        state.history.push(LevelRecord {
            level: level.title().to_string(),
            result,
        });

        info!(
            level = level.title(),
            score,
            out_of,
            passed = result.passed,
            total = state.cumulative_score,
            "level submitted"
        );
        Ok(Submission {
            result,
            recorded: true,
        })
    }

    /// Move past a passed level: onto its successor, or to completion after the last one.
    pub fn advance_if_eligible(&self, state: &mut SessionState) -> Result<Advance, SessionError> {
        if state.phase != Phase::Submitted || !state.level_passed() {
            return Err(self.deny(state, Operation::Advance));
        }

        let level = self.check_attempt(state)?;
        match self.catalog.successor_of(level.title()) {
            Some(next) => {
                let title = next.title().to_string();
                let index = state.level + 1;
                state.attempts = 0;
                self.begin_attempt(state, index);
                info!(level = %title, "advanced to next level");
                Ok(Advance::NextLevel(title))
            }
            None => {
                state.phase = Phase::Complete;
                info!(
                    total = state.cumulative_score,
                    possible = self.catalog.total_possible(),
                    "quiz complete"
                );
                Ok(Advance::Complete)
            }
        }
    }

    /// Start the failed level again with cleared answers and a new shuffle.
    pub fn retry(&self, state: &mut SessionState) -> Result<(), SessionError> {
        if state.phase != Phase::Submitted || state.level_passed() {
            return Err(self.deny(state, Operation::Retry));
        }
        self.check_attempt(state)?;

        let index = state.level;
        self.begin_attempt(state, index);
        info!(attempt = state.attempts, "retrying level");
        Ok(())
    }

    /// Back to the first level with a zero score, from any state.
    pub fn restart(&self, state: &mut SessionState) {
        state.cumulative_score = 0;
        state.attempts = 0;
        state.history.clear();
        self.begin_attempt(state, 0);
        info!("quiz restarted");
    }

    fn begin_attempt(&self, state: &mut SessionState, index: usize) {
        let include_unknown = self.config.include_unknown_option;
        let questions = self
            .catalog
            .level_at(index)
            .map(|level| {
                level
                    .questions()
                    .iter()
                    .map(|q| QuestionState {
                        prompt: q.prompt().to_string(),
                        labels: self.shuffler.shuffle(q, include_unknown),
                        answer: Answer::Unanswered,
                    })
                    .collect()
            })
            .unwrap_or_default();

        state.level = index;
        state.phase = Phase::Answering;
        state.questions = questions;
        state.result = None;
        state.attempts += 1;
    }

    /// The current level, provided `state` holds exactly its questions with
    /// labels that are a display order of each question's options.
    fn check_attempt(&self, state: &SessionState) -> Result<&Level, SessionError> {
        let level = self.current_level(state)?;
        let include_unknown = self.config.include_unknown_option;

        let matches = state.questions.len() == level.len()
            && level.questions().iter().zip(&state.questions).all(|(q, held)| {
                let mut expected = q.options().to_vec();
                if include_unknown {
                    expected.push(UNKNOWN_LABEL.to_string());
                }
                let mut labels = held.labels.clone();
                expected.sort();
                labels.sort();

                let unknown_first = !include_unknown
                    || held.labels.first().map(String::as_str) == Some(UNKNOWN_LABEL);

                held.prompt == q.prompt()
                    && labels == expected
                    && unknown_first
                    && held
                        .answer
                        .label()
                        .is_none_or(|label| held.labels.iter().any(|l| l == label))
            });

        if !matches {
            warn!(level = level.title(), "session questions do not match the catalog");
            return Err(SessionError::StaleAttempt {
                level: level.title().to_string(),
            });
        }
        Ok(level)
    }

    fn deny(&self, state: &SessionState, operation: Operation) -> SessionError {
        warn!(%operation, phase = %state.phase, "operation not allowed");
        SessionError::IllegalTransition {
            operation,
            phase: state.phase,
            passed: state.level_passed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::models::Question;
    use crate::shuffle::SourceOrder;

    /// Reverses options and counts calls, to catch reshuffles.
    #[derive(Default)]
    struct CountingShuffler {
        calls: Cell<usize>,
    }

    impl OptionShuffler for CountingShuffler {
        fn permute(&self, options: &[String]) -> Vec<String> {
            self.calls.set(self.calls.get() + 1);
            options.iter().rev().cloned().collect()
        }
    }

    fn level(title: &str, questions: usize) -> Level {
        let questions = (0..questions)
            .map(|i| {
                Question::new(
                    format!("{title} q{i}"),
                    vec!["right".into(), "wrong".into(), "other".into()],
                    "right",
                )
                .unwrap()
            })
            .collect();
        Level::new(title, questions).unwrap()
    }

    fn engine(levels: Vec<Level>) -> QuizEngine<SourceOrder> {
        QuizEngine::with_shuffler(
            QuizCatalog::new(levels).unwrap(),
            EngineConfig::default(),
            SourceOrder,
        )
    }

    fn answer_all(engine: &QuizEngine<SourceOrder>, state: &mut SessionState, correct: usize) {
        let prompts: Vec<String> =
            state.questions().iter().map(|q| q.prompt().to_string()).collect();
        for (i, prompt) in prompts.iter().enumerate() {
            let label = if i < correct { "right" } else { "wrong" };
            engine.record_answer(state, prompt, label).unwrap();
        }
    }

    #[test]
    fn new_session_starts_on_first_level() {
        let engine = engine(vec![level("L1", 3), level("L2", 3)]);
        let state = engine.new_session();

        assert_eq!(state.phase(), Phase::Answering);
        assert_eq!(engine.current_level(&state).unwrap().title(), "L1");
        assert_eq!(state.questions().len(), 3);
        assert_eq!(state.cumulative_score(), 0);
        assert_eq!(state.attempts(), 1);
        assert!(state.questions().iter().all(|q| q.answer() == &Answer::Unanswered));
        assert_eq!(state.questions()[0].labels()[0], UNKNOWN_LABEL);
    }

    #[test]
    fn last_answer_wins() {
        let engine = engine(vec![level("L1", 3)]);
        let mut state = engine.new_session();

        engine.record_answer(&mut state, "L1 q0", "wrong").unwrap();
        engine.record_answer(&mut state, "L1 q0", "right").unwrap();

        let q = state.question("L1 q0").unwrap();
        assert_eq!(q.answer(), &Answer::Chosen("right".into()));
        assert_eq!(q.selected_index(), Some(1));
        assert_eq!(state.cumulative_score(), 0);
    }

    #[test]
    fn invalid_selection_leaves_state_unchanged() {
        let engine = engine(vec![level("L1", 3)]);
        let mut state = engine.new_session();
        engine.record_answer(&mut state, "L1 q0", "wrong").unwrap();
        let before = state.clone();

        let err = engine.record_answer(&mut state, "L1 q0", "not offered").unwrap_err();
        assert!(matches!(err, SessionError::InvalidSelection { .. }));
        let err = engine.record_answer(&mut state, "elsewhere", "right").unwrap_err();
        assert!(matches!(err, SessionError::UnknownQuestion { .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn unknown_label_needs_the_option_enabled() {
        let catalog = QuizCatalog::new(vec![level("L1", 3)]).unwrap();
        let config = EngineConfig {
            include_unknown_option: false,
        };
        let engine = QuizEngine::with_shuffler(catalog, config, SourceOrder);
        let mut state = engine.new_session();

        assert_eq!(state.questions()[0].labels().len(), 3);
        let err = engine.record_answer(&mut state, "L1 q0", UNKNOWN_LABEL).unwrap_err();
        assert!(matches!(err, SessionError::InvalidSelection { .. }));
    }

    #[test]
    fn unknown_and_unanswered_score_as_incorrect() {
        let engine = engine(vec![level("L1", 3)]);
        let mut state = engine.new_session();
        engine.record_answer(&mut state, "L1 q0", UNKNOWN_LABEL).unwrap();
        engine.record_answer(&mut state, "L1 q1", "right").unwrap();

        assert_eq!(state.question("L1 q0").unwrap().answer(), &Answer::Unknown);
        let submission = engine.submit(&mut state).unwrap();
        assert_eq!(submission.result.score, 1);
        assert!(submission.result.passed);
    }

    #[test]
    fn pass_threshold_is_floor_of_half() {
        assert_eq!(pass_threshold(1), 0);
        assert_eq!(pass_threshold(3), 1);
        assert_eq!(pass_threshold(4), 2);
        assert_eq!(pass_threshold(5), 2);

        let cases = [(3, 0, false), (3, 1, true), (4, 1, false), (4, 2, true)];
        for (questions, correct, passed) in cases {
            let engine = engine(vec![level("L1", questions)]);
            let mut state = engine.new_session();
            answer_all(&engine, &mut state, correct);
            let submission = engine.submit(&mut state).unwrap();
            assert_eq!(submission.result.passed, passed, "{correct}/{questions}");
        }
    }

    #[test]
    fn second_submit_adds_nothing() {
        let engine = engine(vec![level("L1", 3), level("L2", 3)]);
        let mut state = engine.new_session();
        answer_all(&engine, &mut state, 2);

        let first = engine.submit(&mut state).unwrap();
        assert!(first.recorded);
        assert_eq!(state.cumulative_score(), 2);

        let second = engine.submit(&mut state).unwrap();
        assert!(!second.recorded);
        assert_eq!(second.result, first.result);
        assert_eq!(state.cumulative_score(), 2);
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn answers_are_frozen_after_submit() {
        let engine = engine(vec![level("L1", 3)]);
        let mut state = engine.new_session();
        engine.submit(&mut state).unwrap();

        let err = engine.record_answer(&mut state, "L1 q0", "right").unwrap_err();
        assert!(matches!(
            err,
            SessionError::IllegalTransition {
                operation: Operation::RecordAnswer,
                phase: Phase::Submitted,
                ..
            }
        ));
    }

    #[test]
    fn advance_requires_a_pass() {
        let engine = engine(vec![level("L1", 3), level("L2", 3)]);
        let mut state = engine.new_session();

        let err = engine.advance_if_eligible(&mut state).unwrap_err();
        assert!(matches!(err, SessionError::IllegalTransition { phase: Phase::Answering, .. }));

        engine.submit(&mut state).unwrap();
        assert!(!state.level_passed());
        let err = engine.advance_if_eligible(&mut state).unwrap_err();
        assert!(matches!(
            err,
            SessionError::IllegalTransition {
                operation: Operation::Advance,
                phase: Phase::Submitted,
                passed: false,
            }
        ));
        assert_eq!(state.phase(), Phase::Submitted);
        assert_eq!(state.level_index(), 0);
    }

    #[test]
    fn advance_clears_attempt_but_keeps_score() {
        let engine = engine(vec![level("L1", 3), level("L2", 4)]);
        let mut state = engine.new_session();
        answer_all(&engine, &mut state, 3);
        engine.submit(&mut state).unwrap();

        let advance = engine.advance_if_eligible(&mut state).unwrap();
        assert_eq!(advance, Advance::NextLevel("L2".into()));
        assert_eq!(state.phase(), Phase::Answering);
        assert_eq!(state.cumulative_score(), 3);
        assert_eq!(state.level_score(), None);
        assert!(!state.level_passed());
        assert_eq!(state.attempts(), 1);
        let prompts: Vec<&str> = state.questions().iter().map(QuestionState::prompt).collect();
        assert_eq!(prompts, ["L2 q0", "L2 q1", "L2 q2", "L2 q3"]);
        assert_eq!(state.answered_count(), 0);
    }

    #[test]
    fn passing_the_last_level_completes() {
        let engine = engine(vec![level("only", 2)]);
        let mut state = engine.new_session();
        answer_all(&engine, &mut state, 2);
        engine.submit(&mut state).unwrap();
        assert!(!state.final_score_available());

        assert_eq!(engine.advance_if_eligible(&mut state).unwrap(), Advance::Complete);
        assert!(state.is_complete());
        assert!(state.final_score_available());
        assert_eq!(state.total_score(), 2);
        assert_eq!(engine.total_possible(), 2);

        assert!(engine.advance_if_eligible(&mut state).is_err());
        assert!(engine.submit(&mut state).is_err());
        assert!(engine.retry(&mut state).is_err());
        assert_eq!(state.total_score(), 2);
    }

    #[test]
    fn retry_only_after_a_failed_submit() {
        let engine = engine(vec![level("L1", 4)]);
        let mut state = engine.new_session();
        assert!(engine.retry(&mut state).is_err());

        answer_all(&engine, &mut state, 1);
        engine.submit(&mut state).unwrap();
        engine.retry(&mut state).unwrap();

        assert_eq!(state.phase(), Phase::Answering);
        assert_eq!(state.attempts(), 2);
        assert_eq!(state.answered_count(), 0);
        assert_eq!(state.cumulative_score(), 1);

        answer_all(&engine, &mut state, 4);
        engine.submit(&mut state).unwrap();
        let err = engine.retry(&mut state).unwrap_err();
        assert!(matches!(err, SessionError::IllegalTransition { passed: true, .. }));
        assert_eq!(state.cumulative_score(), 5);
    }

    #[test]
    fn shuffle_runs_once_per_question_per_attempt() {
        let catalog = QuizCatalog::new(vec![level("L1", 3), level("L2", 3)]).unwrap();
        let shuffler = CountingShuffler::default();
        let engine = QuizEngine::with_shuffler(catalog, EngineConfig::default(), shuffler);
        let mut state = engine.new_session();
        assert_eq!(engine.shuffler.calls.get(), 3);

        let labels = state.questions()[0].labels().to_vec();
        assert_eq!(labels, [UNKNOWN_LABEL, "other", "wrong", "right"]);
        engine.record_answer(&mut state, "L1 q0", "wrong").unwrap();
        for _ in 0..5 {
            assert_eq!(state.questions()[0].labels(), labels.as_slice());
            let _ = engine.current_level(&state).unwrap();
        }
        engine.submit(&mut state).unwrap();
        engine.submit(&mut state).unwrap();
        assert_eq!(engine.shuffler.calls.get(), 3);

        engine.retry(&mut state).unwrap();
        assert_eq!(engine.shuffler.calls.get(), 6);
    }

    #[test]
    fn shuffle_runs_on_advance_and_restart_only() {
        let catalog = QuizCatalog::new(vec![level("L1", 2), level("L2", 3)]).unwrap();
        let shuffler = CountingShuffler::default();
        let engine = QuizEngine::with_shuffler(catalog, EngineConfig::default(), shuffler);
        let mut state = engine.new_session();
        assert_eq!(engine.shuffler.calls.get(), 2);

        for prompt in ["L1 q0", "L1 q1"] {
            engine.record_answer(&mut state, prompt, "right").unwrap();
        }
        engine.submit(&mut state).unwrap();
        assert_eq!(engine.shuffler.calls.get(), 2);

        engine.advance_if_eligible(&mut state).unwrap();
        assert_eq!(engine.shuffler.calls.get(), 5);
        let labels: Vec<Vec<String>> =
            state.questions().iter().map(|q| q.labels().to_vec()).collect();

        engine.record_answer(&mut state, "L2 q1", "other").unwrap();
        engine.record_answer(&mut state, "L2 q1", UNKNOWN_LABEL).unwrap();
        engine.submit(&mut state).unwrap();
        engine.submit(&mut state).unwrap();
        assert_eq!(engine.shuffler.calls.get(), 5);
        let after: Vec<Vec<String>> =
            state.questions().iter().map(|q| q.labels().to_vec()).collect();
        assert_eq!(after, labels);

        engine.restart(&mut state);
        assert_eq!(engine.shuffler.calls.get(), 7);
    }

    #[test]
    fn restart_resets_from_any_state() {
        let engine = engine(vec![level("L1", 3), level("L2", 3)]);
        let mut state = engine.new_session();
        answer_all(&engine, &mut state, 3);
        engine.submit(&mut state).unwrap();
        engine.advance_if_eligible(&mut state).unwrap();
        answer_all(&engine, &mut state, 3);
        engine.submit(&mut state).unwrap();
        engine.advance_if_eligible(&mut state).unwrap();
        assert!(state.is_complete());

        engine.restart(&mut state);
        assert_eq!(state, engine.new_session());

        engine.record_answer(&mut state, "L1 q1", "right").unwrap();
        engine.restart(&mut state);
        assert_eq!(state.level_index(), 0);
        assert_eq!(state.cumulative_score(), 0);
        assert_eq!(state.phase(), Phase::Answering);
        assert_eq!(state.answered_count(), 0);
    }

    #[test]
    fn stale_level_index_is_reported() {
        let engine = engine(vec![level("L1", 3)]);
        let mut state = engine.new_session();
        state.level = 7;

        assert_eq!(
            engine.submit(&mut state).unwrap_err(),
            SessionError::UnknownLevel { level: 7 }
        );
        assert_eq!(state.cumulative_score(), 0);
    }

    fn tampered(state: &SessionState, edit: impl FnOnce(&mut serde_json::Value)) -> SessionState {
        let mut value = serde_json::to_value(state).unwrap();
        edit(&mut value);
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn questions_from_another_level_are_rejected() {
        let engine = engine(vec![level("L1", 3), level("L2", 3)]);
        let state = engine.new_session();
        let mut state = tampered(&state, |value| value["level"] = 1.into());
        let before = state.clone();
        let stale = SessionError::StaleAttempt { level: "L2".into() };

        assert_eq!(engine.record_answer(&mut state, "L1 q0", "right").unwrap_err(), stale);
        assert_eq!(engine.submit(&mut state).unwrap_err(), stale);
        assert_eq!(state, before);

        let mut submitted = tampered(&state, |value| {
            value["phase"] = serde_json::to_value(Phase::Submitted).unwrap();
            value["result"] = serde_json::json!({ "score": 0, "out_of": 3, "passed": false });
        });
        let before = submitted.clone();
        assert_eq!(engine.retry(&mut submitted).unwrap_err(), stale);
        assert_eq!(submitted, before);

        let mut passed = tampered(&submitted, |value| {
            value["result"] = serde_json::json!({ "score": 3, "out_of": 3, "passed": true });
        });
        let before = passed.clone();
        assert_eq!(engine.advance_if_eligible(&mut passed).unwrap_err(), stale);
        assert_eq!(passed, before);
        assert_eq!(passed.cumulative_score(), 0);
    }

    #[test]
    fn tampered_labels_are_rejected() {
        let engine = engine(vec![level("L1", 3)]);
        let state = engine.new_session();
        let stale = SessionError::StaleAttempt { level: "L1".into() };

        let mut swapped = tampered(&state, |value| {
            value["questions"][0]["labels"][1] = "forged".into();
        });
        let before = swapped.clone();
        assert_eq!(engine.record_answer(&mut swapped, "L1 q0", "forged").unwrap_err(), stale);
        assert_eq!(engine.submit(&mut swapped).unwrap_err(), stale);
        assert_eq!(swapped, before);

        let mut missing = tampered(&state, |value| {
            value["questions"][2]["labels"].as_array_mut().unwrap().pop();
        });
        assert_eq!(engine.submit(&mut missing).unwrap_err(), stale);

        let mut dropped = tampered(&state, |value| {
            value["questions"].as_array_mut().unwrap().pop();
        });
        assert_eq!(engine.submit(&mut dropped).unwrap_err(), stale);
        assert_eq!(dropped.cumulative_score(), 0);
    }

    #[test]
    fn state_round_trips_through_json() {
        let engine = engine(vec![level("L1", 3)]);
        let mut state = engine.new_session();
        engine.record_answer(&mut state, "L1 q2", UNKNOWN_LABEL).unwrap();

        let json = serde_json::to_string(&state).unwrap();
        let restored: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn transition_errors_read_well() {
        let err = SessionError::IllegalTransition {
            operation: Operation::Advance,
            phase: Phase::Submitted,
            passed: false,
        };
        assert_eq!(err.to_string(), "cannot advance while the level is submitted");
    }
}
