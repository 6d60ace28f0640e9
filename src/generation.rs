//! Generation backend client for packing list text
//!
//! Implements the [`GenerationBackend`] trait against an OpenAI-compatible
//! chat completions API. Exactly one request is sent per generation, with a
//! fixed model and sampling temperature. Failures are classified into
//! [`BackendError`] variants and always surfaced to the caller.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::PacklisteError;
use crate::config::GenerationConfig;

/// Failure classification for the generation backend
#[derive(Error, Debug)]
pub enum BackendError {
    /// Credentials were rejected by the backend
    #[error("Authentication with the generation backend failed: {message}")]
    Auth { message: String },

    /// Backend asked us to slow down
    #[error("Generation backend rate limit exceeded: {message}")]
    RateLimited { message: String },

    /// Any other non-success HTTP response
    #[error("Generation backend returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure, including the configured request timeout
    #[error("Network error while contacting the generation backend: {0}")]
    Network(#[from] reqwest::Error),

    /// Successful HTTP response with a body we cannot interpret
    #[error("Invalid response from the generation backend: {0}")]
    InvalidResponse(String),

    /// Well-formed response without a usable completion
    #[error("Generation backend returned no completion text")]
    EmptyCompletion,
}

impl From<BackendError> for PacklisteError {
    fn from(err: BackendError) -> Self {
        PacklisteError::backend(err.to_string())
    }
}

/// Capability interface for producing packing list text from a prompt
///
/// The pipeline only depends on this trait, so tests substitute stand-ins
/// and no alternate backend requires pipeline changes.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Produce the packing list text for a composed prompt
    ///
    /// One request, one response. No retries and no streaming; the returned
    /// text is the backend's first completion, unmodified.
    async fn generate(&self, prompt: &str) -> Result<String, BackendError>;
}

/// Generation backend talking to the OpenAI chat completions API
pub struct OpenAiBackend {
    model: String,
    temperature: f32,
    base_url: String,
    api_key: String,
    http: Client,
}

impl OpenAiBackend {
    /// Create a new backend client from configuration and a resolved API key
    ///
    /// Credential resolution happens at startup, before this is called; the
    /// key handed in here is known to be non-empty.
    pub fn from_config(config: &GenerationConfig, api_key: String) -> crate::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(format!("packliste/{}", crate::VERSION))
            .build()
            .map_err(BackendError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            temperature: config.temperature,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            http,
        })
    }

    /// Build the chat completions request body
    fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": self.temperature,
        })
    }
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_request_body(prompt);

        debug!(model = %self.model, "Sending generation request");
        let start = Instant::now();

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = read_error_message(response).await;
            warn!(status = status.as_u16(), "Generation request failed: {}", message);
            return Err(classify_status(status.as_u16(), message));
        }

        let completion: openai::ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        let text = extract_content(completion)?;

        info!(
            "Generation backend answered with {} characters in {:.3}s",
            text.chars().count(),
            start.elapsed().as_secs_f64()
        );

        Ok(text)
    }
}

/// Map a non-success HTTP status onto a [`BackendError`]
fn classify_status(status: u16, message: String) -> BackendError {
    match status {
        401 | 403 => BackendError::Auth { message },
        429 => BackendError::RateLimited { message },
        status => BackendError::Api { status, message },
    }
}

/// Pull the first completion's text out of a parsed response
fn extract_content(completion: openai::ChatCompletionResponse) -> Result<String, BackendError> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.is_empty())
        .ok_or(BackendError::EmptyCompletion)
}

/// Extract the backend's diagnostic message from an error response body
async fn read_error_message(response: reqwest::Response) -> String {
    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<openai::ErrorResponse>(&text) {
        Ok(parsed) => parsed.error.message,
        Err(_) => text,
    }
}

/// OpenAI chat completions API response structures
mod openai {
    use serde::Deserialize;

    /// Successful chat completions response
    #[derive(Debug, Deserialize)]
    pub struct ChatCompletionResponse {
        pub choices: Vec<Choice>,
    }

    /// One completion choice
    #[derive(Debug, Deserialize)]
    pub struct Choice {
        pub message: ChoiceMessage,
    }

    /// Assistant message within a choice
    #[derive(Debug, Deserialize)]
    pub struct ChoiceMessage {
        pub content: Option<String>,
    }

    /// Error response body
    #[derive(Debug, Deserialize)]
    pub struct ErrorResponse {
        pub error: ErrorBody,
    }

    /// Error details within an error response
    #[derive(Debug, Deserialize)]
    pub struct ErrorBody {
        pub message: String,
    }
}
