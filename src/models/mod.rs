mod answer;
mod level;
mod question;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use answer::{Answer, UNKNOWN_LABEL};
pub use level::Level;
pub use question::{MAX_OPTIONS, MIN_OPTIONS, Question};

/// Where a session stands within the current level attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Answers may be recorded; nothing has been scored yet.
    #[default]
    Answering,
    /// The attempt has been scored and awaits advance or retry.
    Submitted,
    /// The final level has been passed.
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Answering => "answering",
            Phase::Submitted => "submitted",
            Phase::Complete => "complete",
        };
        f.write_str(name)
    }
}
