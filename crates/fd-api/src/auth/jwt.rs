use chrono::{TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Claims of the identity provider's session token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Opaque user id issued by the identity provider
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
    /// Billing plan slug, e.g. `pro_plan`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Claims {
    /// Claims for `user_id` valid for `ttl` from now.
    pub fn new(user_id: impl Into<String>, ttl: TimeDelta) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.into(),
            iat: now.timestamp() as usize,
            exp: (now + ttl).timestamp() as usize,
            plan: None,
            features: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = Some(plan.into());
        self
    }
}

/// Sign claims with HS256. Tokens are normally minted by the identity
/// provider; this exists for local tooling and tests.
pub fn sign_token(claims: &Claims, secret: &str) -> Result<String, ApiError> {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("failed to sign token: {e}")))
}

/// Verify and decode a session token
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    let token_data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    Ok(token_data.claims)
}
