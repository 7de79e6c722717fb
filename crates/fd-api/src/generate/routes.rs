use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};
use fd_db::{
    models::{Deck, NewCard},
    repositories::{card as card_repo, deck as deck_repo},
};
use serde::Serialize;

use super::client::GeneratedCard;
use crate::{
    ApiState,
    auth::AuthUser,
    error::ApiError,
    metrics,
    validation::parse_id,
    views::View,
};

const MAX_CARD_SIDE_CHARS: usize = 1000;

#[derive(Debug, Serialize)]
pub struct GenerateCardsResponse {
    pub count: usize,
}

/// Create the AI generation routes
pub fn routes() -> Router<ApiState> {
    Router::new().route("/decks/{deck_id}/generate-cards", post(generate_cards))
}

/// Fill a deck with AI-generated cards about its title and description
async fn generate_cards(
    user: AuthUser,
    State(state): State<ApiState>,
    Path(deck_id): Path<String>,
) -> Result<Json<GenerateCardsResponse>, ApiError> {
    if !user.is_pro() {
        return Err(ApiError::Forbidden(
            "AI-generated cards require a Pro subscription".to_string(),
        ));
    }

    let deck_id = parse_id(&deck_id, "deck")?;

    let deck = deck_repo::find_owned(&state.pool, &user.user_id, deck_id)
        .await?
        .ok_or(ApiError::NotFound("Deck"))?;

    let topic = topic(&deck);
    let generated = match state.generator.generate(&topic, state.ai_card_count).await {
        Ok(cards) => cards,
        Err(e) => {
            metrics::record_generation(false, 0);
            return Err(e.into());
        }
    };

    let cards: Vec<NewCard> = generated
        .into_iter()
        .filter(within_bounds)
        .map(|card| NewCard {
            front: card.front,
            back: card.back,
            order: None,
        })
        .collect();

    if cards.is_empty() {
        metrics::record_generation(false, 0);
        return Err(ApiError::Generation {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "No cards were generated".to_string(),
        });
    }

    let inserted = card_repo::create_batch(&state.pool, &user.user_id, deck_id, &cards)
        .await?
        .ok_or(ApiError::NotFound("Deck"))?;

    state
        .views
        .invalidate(&user.user_id, &[View::Deck(deck_id), View::Dashboard]);

    metrics::record_generation(true, inserted.len());
    tracing::info!(user_id = %user.user_id, deck_id, count = inserted.len(), "Generated cards");

    Ok(Json(GenerateCardsResponse {
        count: inserted.len(),
    }))
}

/// Deck title, followed by the description when there is one.
fn topic(deck: &Deck) -> String {
    match deck.description.as_deref().map(str::trim) {
        Some(description) if !description.is_empty() => format!("{}. {description}", deck.title),
        _ => deck.title.clone(),
    }
}

fn within_bounds(card: &GeneratedCard) -> bool {
    let ok = |side: &str| !side.trim().is_empty() && side.chars().count() <= MAX_CARD_SIDE_CHARS;
    ok(&card.front) && ok(&card.back)
}
