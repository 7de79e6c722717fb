//! Errors raised while setting up a study session.

use thiserror::Error;

/// Why a study session could not be set up.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StudyError {
    /// The deck has no cards to study.
    #[error("This deck doesn't have any cards yet")]
    EmptyDeck,
}
