use axum::{Json, Router, extract::State, routing::get};
use fd_db::repositories::stats as stats_repo;
use serde_json::Value;

use crate::{ApiState, auth::AuthUser, error::ApiError, views::View};

/// Create the dashboard routes
pub fn routes() -> Router<ApiState> {
    Router::new().route("/dashboard", get(dashboard))
}

/// Deck, card and studied counts plus the deck list
async fn dashboard(user: AuthUser, State(state): State<ApiState>) -> Result<Json<Value>, ApiError> {
    if let Some(cached) = state.views.get(&user.user_id, View::Dashboard) {
        return Ok(Json(cached));
    }

    let ticket = state.views.ticket(&user.user_id);
    let mut conn = state.pool.acquire().await?;
    let stats = stats_repo::dashboard(&mut conn, &user.user_id).await?;

    let view = serde_json::to_value(&stats).map_err(|e| ApiError::Internal(e.to_string()))?;
    state
        .views
        .insert(&user.user_id, View::Dashboard, ticket, view.clone());

    Ok(Json(view))
}
