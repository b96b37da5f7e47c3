use crate::engine::{Advance, QuestionState, QuizEngine, SessionError, SessionState};
use crate::models::{Level, Phase};
use crate::shuffle::{OptionShuffler, RandomShuffler};

/// Which screen the terminal front-end is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    Quiz,
    Result,
}

/// Terminal front-end state: the engine, one session, and cursor positions.
///
/// Scoring and shuffling stay in the engine; this only translates key
/// presses into engine calls.
pub struct App<S = RandomShuffler> {
    pub screen: Screen,
    engine: QuizEngine<S>,
    session: SessionState,
    question_cursor: usize,
    option_cursor: usize,
    result_scroll: usize,
    status: Option<String>,
}

impl<S: OptionShuffler> App<S> {
    pub fn new(engine: QuizEngine<S>) -> Self {
        let session = engine.new_session();
        Self {
            screen: Screen::Welcome,
            engine,
            session,
            question_cursor: 0,
            option_cursor: 0,
            result_scroll: 0,
            status: None,
        }
    }

    pub fn engine(&self) -> &QuizEngine<S> {
        &self.engine
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn current_level(&self) -> Option<&Level> {
        self.engine.current_level(&self.session).ok()
    }

    pub fn current_question(&self) -> Option<&QuestionState> {
        self.session.questions().get(self.question_cursor)
    }

    pub fn question_cursor(&self) -> usize {
        self.question_cursor
    }

    pub fn option_cursor(&self) -> usize {
        self.option_cursor
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn start_quiz(&mut self) {
        self.screen = Screen::Quiz;
        self.reset_cursors();
    }

    pub fn select_next_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.option_cursor = (self.option_cursor + 1) % count;
        }
    }

    pub fn select_previous_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.option_cursor = (self.option_cursor + count - 1) % count;
        }
    }

    pub fn next_question(&mut self) {
        let count = self.session.questions().len();
        if count > 0 {
            self.focus_question((self.question_cursor + 1) % count);
        }
    }

    pub fn previous_question(&mut self) {
        let count = self.session.questions().len();
        if count > 0 {
            self.focus_question((self.question_cursor + count - 1) % count);
        }
    }

    /// Record the option under the cursor for the focused question.
    pub fn choose_option(&mut self) {
        let Some(question) = self.current_question() else {
            return;
        };
        let Some(label) = question.labels().get(self.option_cursor) else {
            return;
        };
        let (prompt, label) = (question.prompt().to_string(), label.clone());

        match self.engine.record_answer(&mut self.session, &prompt, &label) {
            Ok(()) => self.status = None,
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    pub fn submit(&mut self) {
        match self.engine.submit(&mut self.session) {
            Ok(submission) => {
                let result = submission.result;
                self.status = Some(format!(
                    "Your score for this level: {} / {}",
                    result.score, result.out_of
                ));
                self.screen = Screen::Result;
                self.result_scroll = 0;
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    pub fn advance(&mut self) {
        match self.engine.advance_if_eligible(&mut self.session) {
            Ok(Advance::NextLevel(title)) => {
                self.status = Some(format!("Now playing {title}"));
                self.screen = Screen::Quiz;
                self.reset_cursors();
            }
            Ok(Advance::Complete) => {
                self.status = Some("You've completed all levels! Well done!".to_string());
            }
            // Already finished; keep the completion message.
            Err(SessionError::IllegalTransition {
                phase: Phase::Complete,
                ..
            }) => {}
            Err(_) => {
                self.status = Some("Pass this level before moving on.".to_string());
            }
        }
    }

    pub fn retry(&mut self) {
        match self.engine.retry(&mut self.session) {
            Ok(()) => {
                self.status = None;
                self.screen = Screen::Quiz;
                self.reset_cursors();
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    pub fn restart(&mut self) {
        self.engine.restart(&mut self.session);
        self.screen = Screen::Welcome;
        self.status = None;
        self.result_scroll = 0;
        self.reset_cursors();
    }

    pub fn scroll_results_down(&mut self) {
        let max_scroll = self.session.history().len().saturating_sub(1);
        if self.result_scroll < max_scroll {
            self.result_scroll += 1;
        }
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    fn option_count(&self) -> usize {
        self.current_question().map_or(0, |q| q.labels().len())
    }

    fn focus_question(&mut self, index: usize) {
        self.question_cursor = index;
        self.option_cursor = self
            .current_question()
            .and_then(QuestionState::selected_index)
            .unwrap_or(0);
    }

    fn reset_cursors(&mut self) {
        self.focus_question(0);
    }
}
