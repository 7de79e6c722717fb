//! The study-session state machine.

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{StudyError, shuffle::fisher_yates, summary::Summary};

/// Where the session is in its card loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Question side up
    #[default]
    ShowingFront,
    /// Answer revealed, waiting for correct/incorrect
    ShowingBack,
    /// Every card answered
    Completed,
}

/// The slice of a card the study loop needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyCard {
    /// Card id on the server
    pub id: i64,
    /// Question side
    pub front: String,
    /// Answer side
    pub back: String,
}

/// Running correct/incorrect counters for one pass through the deck.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    /// Answers marked correct
    pub correct: u32,
    /// Answers marked incorrect
    pub incorrect: u32,
    /// All answers, `correct + incorrect`
    pub total: u32,
}

impl Tally {
    /// Count one more answer.
    #[must_use]
    pub const fn record(self, correct: bool) -> Self {
        if correct {
            Self {
                correct: self.correct + 1,
                total: self.total + 1,
                ..self
            }
        } else {
            Self {
                incorrect: self.incorrect + 1,
                total: self.total + 1,
                ..self
            }
        }
    }

    /// Accuracy rounded to the nearest whole percent.
    pub fn accuracy_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (f64::from(self.correct) / f64::from(self.total) * 100.0).round() as u32
    }
}

/// An answer waiting to be reported to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// Deck being studied
    pub deck_id: i64,
    /// Card that was answered
    pub card_id: i64,
    /// Whether the user knew it
    pub correct: bool,
    /// Milliseconds between showing the card and answering it
    pub response_time: Option<i32>,
}

/// Study-session state.
///
/// Every transition consumes the value and returns the next one. Transitions
/// that do not apply in the current phase return the session unchanged.
#[derive(Debug, Clone, Default)]
pub struct Session {
    deck_id: i64,
    deck_order: Vec<StudyCard>,
    cards: Vec<StudyCard>,
    index: usize,
    phase: Phase,
    tally: Tally,
    /// The answer currently being reported, if any
    pending: Option<bool>,
    shuffled: bool,
    started_at: Option<DateTime<Utc>>,
    card_shown_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Load a deck in its stored order. Nothing is shuffled until [`Session::start`].
    pub fn new(deck_id: i64, cards: Vec<StudyCard>) -> Result<Self, StudyError> {
        if cards.is_empty() {
            return Err(StudyError::EmptyDeck);
        }

        Ok(Self {
            deck_id,
            cards: cards.clone(),
            deck_order: cards,
            ..Self::default()
        })
    }

    /// Shuffle the deck and start the clock. Only the first call has an effect.
    #[must_use]
    pub fn start<R>(mut self, rng: &mut R, now: DateTime<Utc>) -> Self
    where
        R: Rng + ?Sized,
    {
        if self.shuffled {
            return self;
        }

        fisher_yates(&mut self.cards, rng);
        self.shuffled = true;
        self.started_at = Some(now);
        self.card_shown_at = Some(now);
        self
    }

    /// Show the back of the current card.
    #[must_use]
    pub fn reveal(mut self) -> Self {
        if self.phase == Phase::ShowingFront {
            self.phase = Phase::ShowingBack;
        }
        self
    }

    /// Move to the previous card without answering. Stops at the first card.
    #[must_use]
    pub fn previous(mut self, now: DateTime<Utc>) -> Self {
        if self.phase == Phase::ShowingFront && self.index > 0 {
            self.index -= 1;
            self.card_shown_at = Some(now);
        }
        self
    }

    /// Skip to the next card without answering. Stops at the last card.
    #[must_use]
    pub fn next(mut self, now: DateTime<Utc>) -> Self {
        if self.phase == Phase::ShowingFront && self.index + 1 < self.cards.len() {
            self.index += 1;
            self.card_shown_at = Some(now);
        }
        self
    }

    /// Mark the current card answered and hand back the record to report.
    ///
    /// Returns `None` unless the back is showing and no other answer is in
    /// flight; a repeated answer while one is pending is dropped, not queued.
    #[must_use]
    pub fn begin_answer(mut self, correct: bool, now: DateTime<Utc>) -> (Self, Option<AnswerRecord>) {
        if self.phase != Phase::ShowingBack || self.pending.is_some() {
            return (self, None);
        }
        let Some(card) = self.cards.get(self.index) else {
            return (self, None);
        };

        let response_time = self
            .card_shown_at
            .map(|shown| (now - shown).num_milliseconds())
            .filter(|ms| *ms > 0)
            .map(|ms| i32::try_from(ms).unwrap_or(i32::MAX));

        let record = AnswerRecord {
            deck_id: self.deck_id,
            card_id: card.id,
            correct,
            response_time,
        };

        self.pending = Some(correct);
        (self, Some(record))
    }

    /// Count the pending answer and move on, whatever happened to the report.
    #[must_use]
    pub fn complete_answer(mut self, now: DateTime<Utc>) -> Self {
        let Some(correct) = self.pending.take() else {
            return self;
        };

        self.tally = self.tally.record(correct);

        if self.index + 1 >= self.cards.len() {
            self.phase = Phase::Completed;
        } else {
            self.index += 1;
            self.phase = Phase::ShowingFront;
            self.card_shown_at = Some(now);
        }
        self
    }

    /// Re-shuffle the deck and reset counters and clocks.
    #[must_use]
    pub fn restart<R>(mut self, rng: &mut R, now: DateTime<Utc>) -> Self
    where
        R: Rng + ?Sized,
    {
        if self.pending.is_some() {
            return self;
        }

        self.cards.clone_from(&self.deck_order);
        fisher_yates(&mut self.cards, rng);
        self.shuffled = true;
        self.index = 0;
        self.phase = Phase::ShowingFront;
        self.tally = Tally::default();
        self.started_at = Some(now);
        self.card_shown_at = Some(now);
        self
    }

    /// Which screen the session is on.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Deck the cards came from.
    pub const fn deck_id(&self) -> i64 {
        self.deck_id
    }

    /// Answers counted so far in this pass.
    pub const fn tally(&self) -> Tally {
        self.tally
    }

    /// True between [`Session::begin_answer`] and [`Session::complete_answer`].
    pub const fn is_answer_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether [`Session::start`] or [`Session::restart`] has run.
    pub const fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    /// Cards in the order they are being studied.
    pub fn cards(&self) -> &[StudyCard] {
        &self.cards
    }

    /// The card on screen; `None` only for an empty card list.
    pub fn current_card(&self) -> Option<&StudyCard> {
        self.cards.get(self.index)
    }

    /// 1-based position of the current card and the deck size.
    pub const fn position(&self) -> (usize, usize) {
        (self.index + 1, self.cards.len())
    }

    /// Cards not yet passed, including the current one.
    pub const fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.index)
    }

    /// Share of the deck already passed, in percent.
    pub fn progress_percent(&self) -> f64 {
        if self.cards.is_empty() {
            return 0.0;
        }
        self.index as f64 / self.cards.len() as f64 * 100.0
    }

    /// Completion-screen figures, with elapsed time measured up to `now`.
    pub fn summary(&self, now: DateTime<Utc>) -> Summary {
        let elapsed = self
            .started_at
            .map_or_else(TimeDelta::zero, |started| now - started);
        Summary::new(self.tally, elapsed)
    }
}
