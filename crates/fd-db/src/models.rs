use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Deck model - a named collection of cards owned by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Deck {
    /// Unique deck identifier
    pub id: i64,
    /// Deck title (1-100 chars, enforced by the API)
    pub title: String,
    /// Optional description (up to 500 chars)
    pub description: Option<String>,
    /// Identity-provider subject of the owner
    pub user_id: String,
    /// Whether other users may view the deck
    pub is_public: bool,
    /// When the deck was created
    pub created_at: DateTime<Utc>,
    /// When the deck was last updated
    pub updated_at: DateTime<Utc>,
}

/// Card model - a front/back pair belonging to one deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Card {
    pub id: i64,
    pub front: String,
    pub back: String,
    pub deck_id: i64,
    /// Display order within the deck
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One recorded answer. Rows are never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudySession {
    pub id: i64,
    pub user_id: String,
    pub deck_id: i64,
    pub card_id: i64,
    pub correct: bool,
    /// Time taken to answer, in milliseconds
    pub response_time: Option<i32>,
    pub studied_at: DateTime<Utc>,
}

/// Recent answer joined with the deck title and card front for display
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RecentSession {
    pub id: i64,
    pub deck_id: i64,
    pub card_id: i64,
    pub correct: bool,
    pub response_time: Option<i32>,
    pub studied_at: DateTime<Utc>,
    pub deck_title: String,
    pub card_front: String,
}

/// Aggregate answer statistics for a user, optionally scoped to one deck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudyStats {
    pub total: i64,
    pub correct: i64,
    pub incorrect: i64,
    pub average_response_time_ms: Option<f64>,
}

/// Deck together with its cards, newest edits first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckWithCards {
    #[serde(flatten)]
    pub deck: Deck,
    pub cards: Vec<Card>,
}

/// Dashboard counters for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_decks: i64,
    pub total_cards: i64,
    pub studied_cards: i64,
    pub decks: Vec<Deck>,
}

/// Insert payload for a deck
#[derive(Debug, Clone, Default)]
pub struct NewDeck {
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
}

/// Partial deck update; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct DeckChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

/// Insert payload for a card
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCard {
    pub front: String,
    pub back: String,
    /// Defaults to 0 for single inserts; batch inserts use the input position
    pub order: Option<i32>,
}

/// Partial card update; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct CardChanges {
    pub front: Option<String>,
    pub back: Option<String>,
    pub order: Option<i32>,
}

/// Insert payload for a study session row
#[derive(Debug, Clone)]
pub struct NewStudySession {
    pub deck_id: i64,
    pub card_id: i64,
    pub correct: bool,
    pub response_time: Option<i32>,
}
