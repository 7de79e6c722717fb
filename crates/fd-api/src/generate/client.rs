//! Chat-completions client that turns a deck topic into flashcards.

use std::{future::Future, pin::Pin};

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::error::ApiError;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCard {
    pub front: String,
    pub back: String,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    /// Error message returned by the provider
    #[error("{0}")]
    Provider(String),

    #[error("failed to reach OpenAI: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response from OpenAI: {0}")]
    Malformed(String),
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        tracing::warn!(error = %err, "Card generation failed");

        let text = err.to_string();
        let (status, message) = match err {
            GenerationError::MissingApiKey => (StatusCode::INTERNAL_SERVER_ERROR, text),
            _ => classify_provider_message(&text),
        };

        Self::Generation { status, message }
    }
}

/// Map a provider error message to the status and text shown to the user.
pub fn classify_provider_message(message: &str) -> (StatusCode, String) {
    if message.contains("quota") || message.contains("billing") {
        (
            StatusCode::PAYMENT_REQUIRED,
            "OpenAI quota exceeded. Check your billing at platform.openai.com.".to_string(),
        )
    } else if message.contains("API key") {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Invalid OpenAI API key. Check your configuration.".to_string(),
        )
    } else if message.is_empty() {
        (StatusCode::BAD_GATEWAY, "Failed to generate cards".to_string())
    } else {
        (StatusCode::BAD_GATEWAY, message.to_string())
    }
}

/// Source of generated flashcards.
pub trait CardGenerator: Send + Sync {
    fn generate<'a>(
        &'a self,
        topic: &'a str,
        count: usize,
    ) -> BoxFuture<'a, Result<Vec<GeneratedCard>, GenerationError>>;
}

/// Generator backed by the OpenAI chat-completions API with a JSON-schema
/// response format. Requests are not retried.
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl OpenAiGenerator {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model: model.into(),
        }
    }

    async fn request_cards(&self, topic: &str, count: usize) -> Result<Vec<GeneratedCard>, GenerationError> {
        let api_key = self.api_key.as_deref().ok_or(GenerationError::MissingApiKey)?;

        tracing::info!(model = %self.model, count, "Requesting generated cards");

        let response = self
            .http
            .post(OPENAI_CHAT_URL)
            .bearer_auth(api_key)
            .json(&request_body(&self.model, topic, count))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GenerationError::Provider(provider_message(&body).unwrap_or_else(|| {
                format!("OpenAI request failed with status {status}")
            })));
        }

        parse_completion(&body)
    }
}

impl CardGenerator for OpenAiGenerator {
    fn generate<'a>(
        &'a self,
        topic: &'a str,
        count: usize,
    ) -> BoxFuture<'a, Result<Vec<GeneratedCard>, GenerationError>> {
        Box::pin(self.request_cards(topic, count))
    }
}

pub fn prompt(topic: &str, count: usize) -> String {
    format!(
        "Generate exactly {count} flashcards about \"{topic}\". Each card should have a front \
         (question or term) and back (answer or definition). Create diverse, educational content."
    )
}

fn request_body(model: &str, topic: &str, count: usize) -> Value {
    json!({
        "model": model,
        "messages": [
            { "role": "user", "content": prompt(topic, count) }
        ],
        "response_format": {
            "type": "json_schema",
            "json_schema": {
                "name": "flashcards",
                "strict": true,
                "schema": {
                    "type": "object",
                    "properties": {
                        "cards": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "front": {
                                        "type": "string",
                                        "description": "Question or term on the front of the card"
                                    },
                                    "back": {
                                        "type": "string",
                                        "description": "Answer or definition on the back of the card"
                                    }
                                },
                                "required": ["front", "back"],
                                "additionalProperties": false
                            }
                        }
                    },
                    "required": ["cards"],
                    "additionalProperties": false
                }
            }
        }
    })
}

#[derive(Deserialize)]
struct Completion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

#[derive(Deserialize)]
struct CardList {
    cards: Vec<GeneratedCard>,
}

/// Extract the generated cards from a chat-completions response body.
pub fn parse_completion(body: &str) -> Result<Vec<GeneratedCard>, GenerationError> {
    let completion: Completion =
        serde_json::from_str(body).map_err(|e| GenerationError::Malformed(e.to_string()))?;

    let message = completion
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| GenerationError::Malformed("no choices returned".to_string()))?;

    if let Some(refusal) = message.refusal {
        return Err(GenerationError::Provider(refusal));
    }

    let content = message
        .content
        .ok_or_else(|| GenerationError::Malformed("empty message content".to_string()))?;

    let list: CardList =
        serde_json::from_str(&content).map_err(|e| GenerationError::Malformed(e.to_string()))?;

    Ok(list.cards)
}

/// Pull `error.message` out of a provider error body.
fn provider_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .and_then(Value::as_str)
        .map(String::from)
}
