use serde::Deserialize;

/// Deployment environment, read from `ENV`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    #[serde(alias = "dev")]
    Development,
    #[serde(alias = "prod")]
    Production,
}

impl Environment {
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    pub database_url: String,
    /// Signing secret of the identity provider's session tokens
    pub jwt_secret: String,
    /// Missing key only fails AI generation requests, not startup
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_free_deck_limit")]
    pub free_deck_limit: i64,
    #[serde(default = "default_ai_card_count")]
    pub ai_card_count: usize,
    #[serde(default)]
    pub env: Environment,
    /// Comma-separated list of origins allowed by CORS
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
}

fn default_openai_model() -> String {
    "gpt-4o".to_string()
}

const fn default_free_deck_limit() -> i64 {
    3
}

const fn default_ai_card_count() -> usize {
    20
}

fn default_allowed_origins() -> String {
    "http://localhost:3000".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_db_max_connections() -> u32 {
    10
}

impl ApiConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, envy::Error> {
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from explicit key/value pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config: Self = envy::from_iter(vars)?;
        config.openai_api_key = config
            .openai_api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        Ok(config)
    }

    pub fn allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }
}
