//! Study-session interaction loop for flashdeck
//!
//! This crate holds the client-side study flow: the deck is shuffled once the
//! session starts, each card is revealed and answered, answers are reported to
//! the server, and a summary is shown when the last card is done.
//!
//! The state lives in a plain [`Session`] value that moves through pure
//! transition functions. [`StudyController`] wires that value to keyboard input
//! ([`keymap`]) and to a [`Reporter`] that persists answers.

pub mod controller;
pub mod error;
pub mod keymap;
pub mod session;
pub mod shuffle;
pub mod summary;

pub use controller::{Control, ReportError, Reporter, StudyController};
pub use error::StudyError;
pub use keymap::{Action, Context, Key, KeyPress, parse_key, resolve};
pub use session::{AnswerRecord, Phase, Session, StudyCard, Tally};
pub use summary::Summary;
