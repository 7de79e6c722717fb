use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Field name to the messages that field failed with.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    /// Missing rows and rows owned by someone else look the same to callers.
    #[error("{0} not found or unauthorized")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid input")]
    InvalidFields(FieldErrors),

    #[error("{0}")]
    Forbidden(String),

    #[error("Deck limit reached for free plan ({limit} decks). Upgrade to Pro for unlimited decks.")]
    QuotaExceeded { limit: i64 },

    #[error("{message}")]
    Generation { status: StatusCode, message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::InvalidFields(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) | Self::QuotaExceeded { .. } => StatusCode::FORBIDDEN,
            Self::Generation { status, .. } => *status,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for the `error` field.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "unauthorized",
            Self::NotFound(_) => "not_found",
            Self::Validation(_) | Self::InvalidFields(_) => "validation_error",
            Self::Forbidden(_) => "forbidden",
            Self::QuotaExceeded { .. } => "deck_limit_reached",
            Self::Generation { .. } => "generation_failed",
            Self::Database(_) => "database_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<FieldErrors>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.code();

        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "Database error");
                "Internal server error".to_string()
            }
            Self::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let fields = match self {
            Self::InvalidFields(fields) => Some(fields),
            _ => None,
        };

        (
            status,
            Json(ErrorResponse {
                error,
                message,
                fields,
            }),
        )
            .into_response()
    }
}
