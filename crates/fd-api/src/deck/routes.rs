use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use fd_db::{models::Deck, repositories::deck as deck_repo};
use serde_json::Value;

use super::model::{CreateDeckRequest, UpdateDeckRequest};
use crate::{
    ApiState,
    auth::AuthUser,
    error::ApiError,
    metrics,
    validation::{ValidatedJson, parse_id},
    views::View,
};

/// Create the deck routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/decks", get(list_decks).post(create_deck))
        .route(
            "/decks/{deck_id}",
            get(get_deck).patch(update_deck).delete(delete_deck),
        )
}

/// List the caller's decks, most recently updated first
async fn list_decks(
    user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<Vec<Deck>>, ApiError> {
    let decks = deck_repo::list_for_user(&state.pool, &user.user_id).await?;
    Ok(Json(decks))
}

/// Create a deck, enforcing the free-plan deck quota
async fn create_deck(
    user: AuthUser,
    State(state): State<ApiState>,
    ValidatedJson(payload): ValidatedJson<CreateDeckRequest>,
) -> Result<(StatusCode, Json<Deck>), ApiError> {
    if !user.is_pro() {
        let owned = deck_repo::count_for_user(&state.pool, &user.user_id).await?;
        if owned >= state.free_deck_limit {
            tracing::info!(
                user_id = %user.user_id,
                owned,
                limit = state.free_deck_limit,
                "Deck limit reached"
            );
            metrics::record_quota_rejection();
            return Err(ApiError::QuotaExceeded {
                limit: state.free_deck_limit,
            });
        }
    }

    let deck = deck_repo::create(&state.pool, &user.user_id, &payload.into()).await?;
    state.views.invalidate(&user.user_id, &[View::Dashboard]);

    tracing::info!(user_id = %user.user_id, deck_id = deck.id, "Deck created");
    Ok((StatusCode::CREATED, Json(deck)))
}

/// Deck detail with its cards, served from the view cache when fresh
async fn get_deck(
    user: AuthUser,
    State(state): State<ApiState>,
    Path(deck_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let deck_id = parse_id(&deck_id, "deck")?;

    if let Some(cached) = state.views.get(&user.user_id, View::Deck(deck_id)) {
        return Ok(Json(cached));
    }

    let ticket = state.views.ticket(&user.user_id);
    let mut conn = state.pool.acquire().await?;
    let deck = deck_repo::find_with_cards(&mut conn, &user.user_id, deck_id)
        .await?
        .ok_or(ApiError::NotFound("Deck"))?;

    let view = serde_json::to_value(&deck).map_err(|e| ApiError::Internal(e.to_string()))?;
    state
        .views
        .insert(&user.user_id, View::Deck(deck_id), ticket, view.clone());

    Ok(Json(view))
}

async fn update_deck(
    user: AuthUser,
    State(state): State<ApiState>,
    Path(deck_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateDeckRequest>,
) -> Result<Json<Deck>, ApiError> {
    let deck_id = parse_id(&deck_id, "deck")?;

    let deck = deck_repo::update_owned(&state.pool, &user.user_id, deck_id, &payload.into())
        .await?
        .ok_or(ApiError::NotFound("Deck"))?;

    state
        .views
        .invalidate(&user.user_id, &[View::Deck(deck.id), View::Dashboard]);

    Ok(Json(deck))
}

/// Delete a deck; its cards and study sessions cascade
async fn delete_deck(
    user: AuthUser,
    State(state): State<ApiState>,
    Path(deck_id): Path<String>,
) -> Result<Json<Deck>, ApiError> {
    let deck_id = parse_id(&deck_id, "deck")?;

    let deck = deck_repo::delete_owned(&state.pool, &user.user_id, deck_id)
        .await?
        .ok_or(ApiError::NotFound("Deck"))?;

    state
        .views
        .invalidate(&user.user_id, &[View::Deck(deck.id), View::Dashboard]);

    tracing::info!(user_id = %user.user_id, deck_id = deck.id, "Deck deleted");
    Ok(Json(deck))
}
