use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use fd_db::{
    models::{RecentSession, StudySession, StudyStats},
    repositories::{deck as deck_repo, session as session_repo},
};

use super::model::{RecentQuery, RecordStudySessionRequest, StatsQuery};
use crate::{
    ApiState,
    auth::AuthUser,
    error::ApiError,
    metrics,
    validation::{ValidatedJson, parse_id, validate},
    views::View,
};

/// Create the study-session routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/study-sessions", post(record_session))
        .route("/study-sessions/recent", get(recent_sessions))
        .route("/decks/{deck_id}/study-sessions", get(deck_sessions))
        .route("/study-stats", get(study_stats))
}

/// Record one answer. Rows are append-only.
async fn record_session(
    user: AuthUser,
    State(state): State<ApiState>,
    ValidatedJson(payload): ValidatedJson<RecordStudySessionRequest>,
) -> Result<(StatusCode, Json<StudySession>), ApiError> {
    let mut conn = state.pool.acquire().await?;
    let session = session_repo::record(&mut conn, &user.user_id, &payload.into())
        .await?
        .ok_or(ApiError::NotFound("Deck"))?;

    metrics::record_study_answer(session.correct);
    state.views.invalidate(&user.user_id, &[View::Dashboard]);

    Ok((StatusCode::CREATED, Json(session)))
}

async fn recent_sessions(
    user: AuthUser,
    State(state): State<ApiState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<RecentSession>>, ApiError> {
    validate(&query)?;

    let sessions = session_repo::recent_for_user(&state.pool, &user.user_id, query.limit).await?;
    Ok(Json(sessions))
}

async fn deck_sessions(
    user: AuthUser,
    State(state): State<ApiState>,
    Path(deck_id): Path<String>,
) -> Result<Json<Vec<StudySession>>, ApiError> {
    let deck_id = parse_id(&deck_id, "deck")?;

    let mut conn = state.pool.acquire().await?;
    let sessions = session_repo::list_for_deck(&mut conn, &user.user_id, deck_id)
        .await?
        .ok_or(ApiError::NotFound("Deck"))?;

    Ok(Json(sessions))
}

/// Accuracy and response-time aggregates, optionally for one deck the
/// caller owns
async fn study_stats(
    user: AuthUser,
    State(state): State<ApiState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StudyStats>, ApiError> {
    let deck_id = query
        .deck_id
        .as_deref()
        .map(|raw| parse_id(raw, "deck"))
        .transpose()?;

    if let Some(deck_id) = deck_id {
        if !deck_repo::is_owned_by(&state.pool, &user.user_id, deck_id).await? {
            return Err(ApiError::NotFound("Deck"));
        }
    }

    let stats = session_repo::stats_for_user(&state.pool, &user.user_id, deck_id).await?;
    Ok(Json(stats))
}
