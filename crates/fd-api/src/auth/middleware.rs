use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::CookieJar;

use super::jwt::verify_token;
use crate::{error::ApiError, state::AuthConfig};

/// Cookie the identity provider stores its session token in.
pub const SESSION_COOKIE: &str = "__session";

/// Authenticated user extractor
///
/// Reads the provider's session token from `Authorization: Bearer` or, failing
/// that, the `__session` cookie.
///
/// # Example
/// ```
/// use axum::extract::State;
/// use fd_api::{error::ApiError, auth::AuthUser, ApiState};
///
/// async fn protected_route(
///     user: AuthUser,
///     State(state): State<ApiState>,
/// ) -> Result<(), ApiError> {
///     // user.user_id is the provider's subject id
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
    pub plan: Option<String>,
    pub features: Vec<String>,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AuthConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_config = AuthConfig::from_ref(state);

        let bearer = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_owned());

        let token = match bearer {
            Some(token) if !token.is_empty() => token,
            _ => CookieJar::from_headers(&parts.headers)
                .get(SESSION_COOKIE)
                .map(|cookie| cookie.value().to_owned())
                .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?,
        };

        let claims = verify_token(&token, &auth_config.jwt_secret)?;
        if claims.sub.is_empty() {
            return Err(ApiError::Unauthorized("Invalid user ID in token".to_string()));
        }

        Ok(Self {
            user_id: claims.sub,
            plan: claims.plan,
            features: claims.features,
        })
    }
}
