use anyhow::Context as _;
use fd_study::{AnswerRecord, ReportError, Reporter, StudyCard};
use reqwest::Client;
use serde::Deserialize;

/// Connection settings, read from `API_URL` and `AUTH_TOKEN`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    pub auth_token: String,
}

fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env::<Self>()
    }
}

#[derive(Debug, Deserialize)]
pub struct DeckView {
    pub id: i64,
    pub title: String,
    pub cards: Vec<StudyCard>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.auth_token.clone(),
        }
    }

    pub async fn fetch_deck(&self, deck_id: i64) -> anyhow::Result<DeckView> {
        let response = self
            .http
            .get(format!("{}/decks/{deck_id}", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await
            .context("failed to reach the API")?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            anyhow::bail!("could not load deck {deck_id} ({status}): {message}");
        }

        response.json().await.context("unexpected deck payload")
    }
}

async fn error_message(response: reqwest::Response) -> String {
    match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => "no details".to_string(),
    }
}

impl Reporter for ApiClient {
    async fn report(&self, record: &AnswerRecord) -> Result<(), ReportError> {
        let response = self
            .http
            .post(format!("{}/study-sessions", self.base_url))
            .bearer_auth(&self.token)
            .json(record)
            .send()
            .await
            .map_err(|e| ReportError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        Err(ReportError::Rejected {
            status: status.as_u16(),
            message: error_message(response).await,
        })
    }
}
