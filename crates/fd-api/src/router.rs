use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;

use crate::{card, dashboard, deck, generate, state::ApiState, study};

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready))
        .merge(deck::routes())
        .merge(card::routes())
        .merge(study::routes())
        .merge(generate::routes())
        .merge(dashboard::routes())
        .fallback(handler_404)
}

/// Liveness
async fn health() -> StatusCode {
    StatusCode::OK
}

/// Readiness: the database must answer
async fn ready(State(state): State<ApiState>) -> Response {
    match fd_db::ping(&state.pool).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "database": "unreachable" })),
            )
                .into_response()
        }
    }
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not_found",
            "message": "The requested resource was not found",
        })),
    )
}
