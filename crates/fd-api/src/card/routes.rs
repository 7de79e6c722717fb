use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use fd_db::{
    models::{Card, NewCard},
    repositories::{card as card_repo, deck as deck_repo},
};

use super::model::{BatchCreateCardsRequest, BatchCreated, CreateCardRequest, UpdateCardRequest};
use crate::{
    ApiState,
    auth::AuthUser,
    error::ApiError,
    validation::{ValidatedJson, parse_id},
    views::View,
};

/// Create the card routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/decks/{deck_id}/cards", get(list_cards).post(create_card))
        .route("/decks/{deck_id}/cards/batch", post(create_cards_batch))
        .route(
            "/cards/{card_id}",
            get(get_card).patch(update_card).delete(delete_card),
        )
}

async fn list_cards(
    user: AuthUser,
    State(state): State<ApiState>,
    Path(deck_id): Path<String>,
) -> Result<Json<Vec<Card>>, ApiError> {
    let deck_id = parse_id(&deck_id, "deck")?;

    let mut conn = state.pool.acquire().await?;
    if !deck_repo::is_owned_by(&mut *conn, &user.user_id, deck_id).await? {
        return Err(ApiError::NotFound("Deck"));
    }

    let cards = card_repo::list_for_deck(&mut *conn, &user.user_id, deck_id).await?;
    Ok(Json(cards))
}

async fn create_card(
    user: AuthUser,
    State(state): State<ApiState>,
    Path(deck_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<CreateCardRequest>,
) -> Result<(StatusCode, Json<Card>), ApiError> {
    let deck_id = parse_id(&deck_id, "deck")?;

    let mut conn = state.pool.acquire().await?;
    let card = card_repo::create(&mut conn, &user.user_id, deck_id, &payload.into())
        .await?
        .ok_or(ApiError::NotFound("Deck"))?;

    state
        .views
        .invalidate(&user.user_id, &[View::Deck(deck_id), View::Dashboard]);

    Ok((StatusCode::CREATED, Json(card)))
}

/// Insert several cards at once; nothing is inserted unless the deck is owned
async fn create_cards_batch(
    user: AuthUser,
    State(state): State<ApiState>,
    Path(deck_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<BatchCreateCardsRequest>,
) -> Result<(StatusCode, Json<BatchCreated<Card>>), ApiError> {
    let deck_id = parse_id(&deck_id, "deck")?;

    let cards: Vec<NewCard> = payload.cards.into_iter().map(NewCard::from).collect();
    let inserted = card_repo::create_batch(&state.pool, &user.user_id, deck_id, &cards)
        .await?
        .ok_or(ApiError::NotFound("Deck"))?;

    state
        .views
        .invalidate(&user.user_id, &[View::Deck(deck_id), View::Dashboard]);

    tracing::info!(user_id = %user.user_id, deck_id, count = inserted.len(), "Cards created");
    Ok((
        StatusCode::CREATED,
        Json(BatchCreated {
            count: inserted.len(),
            cards: inserted,
        }),
    ))
}

async fn get_card(
    user: AuthUser,
    State(state): State<ApiState>,
    Path(card_id): Path<String>,
) -> Result<Json<Card>, ApiError> {
    let card_id = parse_id(&card_id, "card")?;

    let card = card_repo::find_owned(&state.pool, &user.user_id, card_id)
        .await?
        .ok_or(ApiError::NotFound("Card"))?;

    Ok(Json(card))
}

async fn update_card(
    user: AuthUser,
    State(state): State<ApiState>,
    Path(card_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateCardRequest>,
) -> Result<Json<Card>, ApiError> {
    let card_id = parse_id(&card_id, "card")?;

    let mut conn = state.pool.acquire().await?;
    let card = card_repo::update_owned(&mut conn, &user.user_id, card_id, &payload.into())
        .await?
        .ok_or(ApiError::NotFound("Card"))?;

    state
        .views
        .invalidate(&user.user_id, &[View::Deck(card.deck_id), View::Dashboard]);

    Ok(Json(card))
}

async fn delete_card(
    user: AuthUser,
    State(state): State<ApiState>,
    Path(card_id): Path<String>,
) -> Result<Json<Card>, ApiError> {
    let card_id = parse_id(&card_id, "card")?;

    let mut conn = state.pool.acquire().await?;
    let card = card_repo::delete_owned(&mut conn, &user.user_id, card_id)
        .await?
        .ok_or(ApiError::NotFound("Card"))?;

    state
        .views
        .invalidate(&user.user_id, &[View::Deck(card.deck_id), View::Dashboard]);

    Ok(Json(card))
}
