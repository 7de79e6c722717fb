//! Key dispatch and answer reporting around a [`Session`](crate::Session).

use std::future::Future;

use chrono::{DateTime, Utc};
use rand::Rng;
use thiserror::Error;

use crate::{
    keymap::{Action, Context, KeyPress, resolve},
    session::{AnswerRecord, Session},
};

/// Why an answer could not be persisted.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The request never got a response.
    #[error("could not reach the server: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("server rejected the answer ({status}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Error message from the response body
        message: String,
    },
}

/// Persists answers somewhere, usually the flashdeck API.
pub trait Reporter {
    /// Persist one answer. Errors are logged by the caller and otherwise ignored.
    fn report(&self, record: &AnswerRecord) -> impl Future<Output = Result<(), ReportError>> + Send;
}

/// Whether the caller should keep reading keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Keep reading input.
    Continue,
    /// Leave the study screen.
    Exit,
}

/// Drives a [`Session`] from key presses and reports answers as they happen.
pub struct StudyController<R, G> {
    session: Session,
    reporter: R,
    rng: G,
    help_open: bool,
}

impl<R, G> std::fmt::Debug for StudyController<R, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudyController")
            .field("session", &self.session)
            .field("help_open", &self.help_open)
            .finish_non_exhaustive()
    }
}

impl<R, G> StudyController<R, G>
where
    R: Reporter,
    G: Rng,
{
    /// Wrap a loaded session. Call [`StudyController::start`] before reading keys.
    pub fn new(session: Session, reporter: R, rng: G) -> Self {
        Self {
            session,
            reporter,
            rng,
            help_open: false,
        }
    }

    /// Shuffle the deck and start the session clock.
    pub fn start(&mut self, now: DateTime<Utc>) {
        let session = std::mem::take(&mut self.session);
        self.session = session.start(&mut self.rng, now);
    }

    /// Current session state, for rendering.
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Whether the shortcut overlay is showing.
    pub const fn help_open(&self) -> bool {
        self.help_open
    }

    /// What [`resolve`] needs to interpret the next key.
    pub const fn context(&self) -> Context {
        Context {
            phase: self.session.phase(),
            help_open: self.help_open,
            answer_pending: self.session.is_answer_pending(),
        }
    }

    /// Resolve a key press against the current screen and apply it.
    pub async fn handle_key(&mut self, press: KeyPress, now: DateTime<Utc>) -> Control {
        match resolve(press, self.context()) {
            Some(action) => self.dispatch(action, now).await,
            None => Control::Continue,
        }
    }

    /// Apply an action. Answers are reported before the session advances.
    pub async fn dispatch(&mut self, action: Action, now: DateTime<Utc>) -> Control {
        match action {
            Action::Exit => return Control::Exit,
            Action::Answer { correct } => {
                self.answer(correct, now).await;
                return Control::Continue;
            }
            Action::ToggleHelp => {
                self.help_open = !self.help_open;
                return Control::Continue;
            }
            _ => {}
        }

        let session = std::mem::take(&mut self.session);
        self.session = match action {
            Action::Reveal => session.reveal(),
            Action::Previous => session.previous(now),
            Action::Next => session.next(now),
            Action::Restart => {
                tracing::debug!(deck_id = session.deck_id(), "Restarting study session");
                session.restart(&mut self.rng, now)
            }
            Action::Exit | Action::Answer { .. } | Action::ToggleHelp => session,
        };

        Control::Continue
    }

    async fn answer(&mut self, correct: bool, now: DateTime<Utc>) {
        let session = std::mem::take(&mut self.session);
        let (session, record) = session.begin_answer(correct, now);
        self.session = session;

        let Some(record) = record else {
            return;
        };

        if let Err(e) = self.reporter.report(&record).await {
            tracing::warn!(
                deck_id = record.deck_id,
                card_id = record.card_id,
                "Failed to record study session: {e}"
            );
        }

        let session = std::mem::take(&mut self.session);
        self.session = session.complete_answer(now);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        keymap::{Key, parse_key},
        session::{Phase, StudyCard},
    };

    #[derive(Clone, Default)]
    struct MockReporter {
        seen: Arc<Mutex<Vec<AnswerRecord>>>,
        fail: bool,
    }

    impl Reporter for MockReporter {
        async fn report(&self, record: &AnswerRecord) -> Result<(), ReportError> {
            self.seen.lock().unwrap().push(record.clone());
            if self.fail {
                Err(ReportError::Rejected {
                    status: 500,
                    message: "Failed to record study session".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn controller(n: i64, reporter: MockReporter) -> StudyController<MockReporter, StdRng> {
        let cards = (1..=n)
            .map(|id| StudyCard {
                id,
                front: format!("Q{id}"),
                back: format!("A{id}"),
            })
            .collect();
        let session = Session::new(42, cards).unwrap();
        let mut controller = StudyController::new(session, reporter, StdRng::seed_from_u64(3));
        controller.start(Utc::now());
        controller
    }

    async fn keys(controller: &mut StudyController<MockReporter, StdRng>, keys: &[&str]) -> Control {
        let mut last = Control::Continue;
        for key in keys {
            last = controller.handle_key(parse_key(key).unwrap(), Utc::now()).await;
        }
        last
    }

    #[tokio::test]
    async fn test_full_pass_reports_every_answer() {
        let reporter = MockReporter::default();
        let mut c = controller(3, reporter.clone());

        keys(&mut c, &["space", "2", "space", "1", "enter", "right"]).await;

        assert_eq!(c.session().phase(), Phase::Completed);
        let tally = c.session().tally();
        assert_eq!((tally.correct, tally.incorrect, tally.total), (2, 1, 3));

        let seen = reporter.seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|r| r.deck_id == 42));
        assert_eq!(
            seen.iter().map(|r| r.correct).collect::<Vec<_>>(),
            vec![true, false, true]
        );
    }

    #[tokio::test]
    async fn test_response_times_follow_the_supplied_clock() {
        let reporter = MockReporter::default();
        let cards = (1..=3)
            .map(|id| StudyCard {
                id,
                front: format!("Q{id}"),
                back: format!("A{id}"),
            })
            .collect();
        let session = Session::new(7, cards).unwrap();
        let mut c = StudyController::new(session, reporter.clone(), StdRng::seed_from_u64(9));

        let t0 = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let at = |secs: i64| t0 + chrono::TimeDelta::seconds(secs);

        c.start(t0);
        for (key, secs) in [("space", 0), ("2", 1), ("space", 2), ("2", 3)] {
            c.handle_key(parse_key(key).unwrap(), at(secs)).await;
        }

        let seen = reporter.seen.lock().unwrap();
        assert_eq!(
            seen.iter().map(|r| r.response_time).collect::<Vec<_>>(),
            vec![Some(1000), Some(2000)]
        );
    }

    #[tokio::test]
    async fn test_failed_report_still_advances() {
        let reporter = MockReporter {
            fail: true,
            ..MockReporter::default()
        };
        let mut c = controller(2, reporter.clone());

        keys(&mut c, &["space", "c"]).await;

        assert_eq!(c.session().position(), (2, 2));
        assert_eq!(c.session().tally().correct, 1);
        assert!(!c.session().is_answer_pending());
        assert_eq!(reporter.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_help_blocks_answers() {
        let reporter = MockReporter::default();
        let mut c = controller(2, reporter.clone());

        keys(&mut c, &["space", "?", "2", "1"]).await;
        assert!(c.help_open());
        assert_eq!(c.session().tally().total, 0);

        keys(&mut c, &["esc", "2"]).await;
        assert!(!c.help_open());
        assert_eq!(c.session().tally().total, 1);
    }

    #[tokio::test]
    async fn test_exit_and_restart_from_completion() {
        let reporter = MockReporter::default();
        let mut c = controller(1, reporter);

        keys(&mut c, &["space", "x"]).await;
        assert_eq!(c.session().phase(), Phase::Completed);
        assert_eq!(c.session().summary(Utc::now()).accuracy_percent, 0);

        keys(&mut c, &["r"]).await;
        assert_eq!(c.session().phase(), Phase::ShowingFront);
        assert_eq!(c.session().tally().total, 0);

        let control = c.handle_key(KeyPress::plain(Key::Char('q')), Utc::now()).await;
        assert_eq!(control, Control::Exit);
    }
}
