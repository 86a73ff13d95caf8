//! Ollama HTTP client for text generation.
//!
//! Uses the non-streaming `/api/generate` endpoint. The request timeout is set
//! on the underlying client, so a stalled model surfaces as `AIError::Timeout`.

use crate::ai::generator::{estimate_tokens, Generation, Generator};
use crate::errors::{AIError, AppError, AppResult};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Sampling options forwarded to the model.
#[derive(Debug, Serialize)]
struct GenerateOptions {
    num_predict: u32,
    temperature: f32,
}

/// Request body for `/api/generate`.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

/// Response from `/api/generate`.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    prompt_eval_count: Option<u64>,
    #[serde(default)]
    eval_count: Option<u64>,
}

/// Client for interacting with Ollama API.
pub struct OllamaClient {
    base_url: String,
    model: String,
    timeout_secs: u64,
    client: Client,
}

impl OllamaClient {
    /// Creates a new Ollama client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the Ollama API (e.g., "http://127.0.0.1:11434")
    /// * `model` - Model used for every request (e.g., "llama3.2:3b")
    /// * `timeout_secs` - Upper bound on one request, including generation
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            timeout_secs,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn transport_error(&self, error: reqwest::Error) -> AIError {
        if error.is_timeout() {
            AIError::Timeout(self.timeout_secs)
        } else {
            AIError::OllamaOffline(error)
        }
    }
}

impl Generator for OllamaClient {
    /// Sends a completion request.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Ollama API is not reachable or does not answer in time
    /// - Model is not found
    /// - API returns an error response or an unparseable body
    fn generate(&self, prompt: &str, max_tokens: u32, temperature: f32) -> AppResult<Generation> {
        debug!(
            "Sending generate request with model: {} ({} prompt chars)",
            self.model,
            prompt.chars().count()
        );

        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                num_predict: max_tokens,
                temperature,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();

            if status.as_u16() == 404 {
                return Err(AIError::ModelNotFound(self.model.clone()).into());
            }

            return Err(
                AIError::InvalidResponse(format!("HTTP {}: {}", status, error_text)).into(),
            );
        }

        let body: GenerateResponse = response.json().map_err(|e| {
            if e.is_timeout() {
                AIError::Timeout(self.timeout_secs)
            } else {
                AIError::InvalidResponse(format!("Failed to parse generate response: {}", e))
            }
        })?;

        let tokens_used = match (body.prompt_eval_count, body.eval_count) {
            (None, None) => estimate_tokens(prompt, &body.response),
            (prompt_tokens, eval_tokens) => {
                prompt_tokens.unwrap_or(0) + eval_tokens.unwrap_or(0)
            }
        };

        debug!("Received generate response ({} tokens)", tokens_used);
        Ok(Generation {
            text: body.response,
            tokens_used,
        })
    }
}
