use std::{fmt, sync::Arc};

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::{
    ApiConfig,
    config::Environment,
    generate::{CardGenerator, OpenAiGenerator},
    views::ViewCache,
};

/// What the [`AuthUser`](crate::auth::AuthUser) extractor needs.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct ApiState {
    pub pool: PgPool,
    pub auth: AuthConfig,
    pub environment: Environment,
    /// Decks a user without the pro plan may own
    pub free_deck_limit: i64,
    /// Cards requested per AI generation
    pub ai_card_count: usize,
    pub generator: Arc<dyn CardGenerator>,
    pub views: ViewCache,
}

impl ApiState {
    pub fn new(config: &ApiConfig, pool: PgPool) -> Self {
        let generator = OpenAiGenerator::new(config.openai_api_key.clone(), &config.openai_model);

        if config.openai_api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY is not set; AI card generation will fail");
        }

        Self {
            pool,
            auth: AuthConfig {
                jwt_secret: config.jwt_secret.clone(),
            },
            environment: config.env,
            free_deck_limit: config.free_deck_limit,
            ai_card_count: config.ai_card_count,
            generator: Arc::new(generator),
            views: ViewCache::new(),
        }
    }

    #[must_use]
    pub fn with_generator(mut self, generator: Arc<dyn CardGenerator>) -> Self {
        self.generator = generator;
        self
    }
}

impl fmt::Debug for ApiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiState")
            .field("environment", &self.environment)
            .field("free_deck_limit", &self.free_deck_limit)
            .field("ai_card_count", &self.ai_card_count)
            .finish_non_exhaustive()
    }
}

impl FromRef<ApiState> for AuthConfig {
    fn from_ref(state: &ApiState) -> Self {
        state.auth.clone()
    }
}
