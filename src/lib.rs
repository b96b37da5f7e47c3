//! # level-quiz
//!
//! A multi-level knowledge quiz. Each level is answered and scored as a
//! unit; passing it (at least half the questions right, rounded down)
//! unlocks the next one, and scores accumulate across levels.
//!
//! The progression rules live in [`QuizEngine`], which applies every
//! transition to a caller-owned [`SessionState`]. The terminal front-end
//! in this crate is one such caller.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use level_quiz::{EngineConfig, Quiz, QuizError};
//!
//! fn main() -> Result<(), QuizError> {
//!     // Load the levels from a JSON file
//!     let quiz = Quiz::from_json("data/quiz_data.json", EngineConfig::default())?;
//!
//!     // Run the quiz in the terminal
//!     quiz.run()?;
//!
//!     Ok(())
//! }
//! ```
//!
//! Driving the engine directly:
//!
//! ```rust,no_run
//! use level_quiz::{EngineConfig, QuizCatalog, QuizEngine};
//!
//! let catalog = QuizCatalog::from_json("data/quiz_data.json").expect("valid quiz data");
//! let engine = QuizEngine::new(catalog, EngineConfig::default());
//! let mut session = engine.new_session();
//!
//! let question = session.questions()[0].clone();
//! engine
//!     .record_answer(&mut session, question.prompt(), &question.labels()[1])
//!     .expect("label comes from the session");
//! let submission = engine.submit(&mut session).expect("answering phase");
//! println!("{} / {}", submission.result.score, submission.result.out_of);
//! ```

mod app;
mod catalog;
mod data;
mod engine;
pub mod logging;
mod models;
mod sessions;
mod shuffle;
pub mod terminal;
mod ui;
pub mod vehicle;

use std::io;
use std::path::Path;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use thiserror::Error;

pub use app::{App, Screen};
pub use catalog::QuizCatalog;
pub use data::{LoadError, load_catalog_from_json, parse_catalog};
pub use engine::{
    Advance, EngineConfig, LevelRecord, LevelResult, Operation, QuestionState, QuizEngine,
    SessionError, SessionState, Submission, pass_threshold,
};
pub use models::{Answer, Level, Phase, Question, UNKNOWN_LABEL};
pub use sessions::SessionStore;
pub use shuffle::{OptionShuffler, RandomShuffler, SourceOrder};

/// Error type for quiz operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    /// The quiz data could not be loaded.
    #[error("failed to load quiz data: {0}")]
    Load(#[from] LoadError),
    /// Terminal IO failed while the quiz was running.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// No vehicle is registered under the given number.
    #[error("car {0} not found, please check the registration number")]
    VehicleNotFound(String),
}

/// A quiz instance that can be run in the terminal.
pub struct Quiz {
    app: App,
}

impl Quiz {
    /// Create a new quiz over an already loaded catalog.
    pub fn new(catalog: QuizCatalog, config: EngineConfig) -> Self {
        Self {
            app: App::new(QuizEngine::new(catalog, config)),
        }
    }

    /// Load a quiz from a JSON file.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use level_quiz::{EngineConfig, Quiz};
    ///
    /// let quiz = Quiz::from_json("data/quiz_data.json", EngineConfig::default())
    ///     .expect("Failed to load quiz");
    /// ```
    pub fn from_json<P: AsRef<Path>>(path: P, config: EngineConfig) -> Result<Self, QuizError> {
        let catalog = load_catalog_from_json(path)?;
        Ok(Self::new(catalog, config))
    }

    /// Run the quiz in the terminal.
    ///
    /// Takes over the terminal and returns when the user quits.
    pub fn run(mut self) -> Result<(), QuizError> {
        let mut session = terminal::TerminalSession::enter()?;
        run_event_loop(session.terminal(), &mut self.app)
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

fn run_event_loop(terminal: &mut terminal::AppTerminal, app: &mut App) -> Result<(), QuizError> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            let code = match key.code {
                KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::SHIFT) => {
                    KeyCode::Char('R')
                }
                other => other,
            };

            if handle_input(app, code) {
                break;
            }
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
fn handle_input<S: OptionShuffler>(app: &mut App<S>, key: KeyCode) -> bool {
    if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q')) {
        return true;
    }
    if key == KeyCode::Char('R') {
        app.restart();
        return false;
    }

    match app.screen {
        Screen::Welcome => handle_welcome_input(app, key),
        Screen::Quiz => handle_quiz_input(app, key),
        Screen::Result => handle_result_input(app, key),
    }
    false
}

fn handle_welcome_input<S: OptionShuffler>(app: &mut App<S>, key: KeyCode) {
    if key == KeyCode::Enter {
        app.start_quiz();
    }
}

fn handle_quiz_input<S: OptionShuffler>(app: &mut App<S>, key: KeyCode) {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.next_question(),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.previous_question(),
        KeyCode::Enter | KeyCode::Char(' ') => app.choose_option(),
        KeyCode::Char('s') => app.submit(),
        _ => {}
    }
}

fn handle_result_input<S: OptionShuffler>(app: &mut App<S>, key: KeyCode) {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char('n') | KeyCode::Enter => app.advance(),
        KeyCode::Char('r') => app.retry(),
        _ => {}
    }
}
