//! Display ordering for a question's options.

use rand::seq::SliceRandom;

use crate::models::{Question, UNKNOWN_LABEL};

/// Produces the display order of a question's options for one attempt.
///
/// Implementations are stateless from the engine's point of view: the
/// engine calls [`OptionShuffler::shuffle`] once per question when an
/// attempt begins and keeps the result for the rest of that attempt.
pub trait OptionShuffler {
    /// Reorder `options`. The result must be a permutation of the input.
    fn permute(&self, options: &[String]) -> Vec<String>;

    /// Labels to display, with "I don't know" pinned first when requested.
    fn shuffle(&self, question: &Question, include_unknown: bool) -> Vec<String> {
        let permuted = self.permute(question.options());
        if !include_unknown {
            return permuted;
        }

        let mut labels = Vec::with_capacity(permuted.len() + 1);
        labels.push(UNKNOWN_LABEL.to_string());
        labels.extend(permuted);
        labels
    }
}

/// Uniformly random order from the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomShuffler;

impl OptionShuffler for RandomShuffler {
    fn permute(&self, options: &[String]) -> Vec<String> {
        let mut labels = options.to_vec();
        labels.shuffle(&mut rand::rng());
        labels
    }
}

/// Keeps source order. Useful for scripted sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceOrder;

impl OptionShuffler for SourceOrder {
    fn permute(&self, options: &[String]) -> Vec<String> {
        options.to_vec()
    }
}
