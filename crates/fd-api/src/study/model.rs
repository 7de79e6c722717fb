use fd_db::models::NewStudySession;
use serde::Deserialize;
use validator::Validate;

use crate::validation::deserialize_id;

/// One answered card, as sent by the study client
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordStudySessionRequest {
    #[serde(deserialize_with = "deserialize_id")]
    #[validate(range(min = 1, message = "Deck ID must be a positive integer"))]
    pub deck_id: i64,
    #[serde(deserialize_with = "deserialize_id")]
    #[validate(range(min = 1, message = "Card ID must be a positive integer"))]
    pub card_id: i64,
    pub correct: bool,
    /// Milliseconds; must be positive when present
    #[serde(default)]
    #[validate(range(min = 1, message = "Response time must be a positive integer"))]
    pub response_time: Option<i32>,
}

impl From<RecordStudySessionRequest> for NewStudySession {
    fn from(req: RecordStudySessionRequest) -> Self {
        Self {
            deck_id: req.deck_id,
            card_id: req.card_id,
            correct: req.correct,
            response_time: req.response_time,
        }
    }
}

const fn default_recent_limit() -> i64 {
    10
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecentQuery {
    #[serde(default = "default_recent_limit")]
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsQuery {
    pub deck_id: Option<String>,
}
