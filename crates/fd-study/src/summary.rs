//! End-of-session figures.

use chrono::TimeDelta;
use serde::Serialize;

use crate::session::Tally;

/// What the completion screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Cards answered correctly
    pub correct: u32,
    /// Cards answered incorrectly
    pub incorrect: u32,
    /// Cards answered
    pub total: u32,
    /// `correct / total` rounded to the nearest percent, 0 for an empty tally
    pub accuracy_percent: u32,
    /// Time since the session started
    #[serde(skip)]
    pub elapsed: TimeDelta,
}

impl Summary {
    /// Build the summary for a finished tally.
    pub fn new(tally: Tally, elapsed: TimeDelta) -> Self {
        Self {
            correct: tally.correct,
            incorrect: tally.incorrect,
            total: tally.total,
            accuracy_percent: tally.accuracy_percent(),
            elapsed,
        }
    }

    /// Elapsed time as `m:ss`.
    pub fn elapsed_display(&self) -> String {
        format_elapsed(self.elapsed)
    }

    /// Encouragement line picked by accuracy band.
    pub const fn message(&self) -> &'static str {
        match self.accuracy_percent {
            100 => "Perfect!",
            90..=99 => "Excellent work!",
            80..=89 => "Great job!",
            70..=79 => "Good effort!",
            60..=69 => "Keep practicing!",
            _ => "Every step counts!",
        }
    }
}

/// Format a duration as minutes and zero-padded seconds, e.g. `3:07`.
pub fn format_elapsed(elapsed: TimeDelta) -> String {
    let seconds = elapsed.num_seconds().max(0);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
