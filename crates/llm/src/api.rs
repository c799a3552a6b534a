//! HTTP client for an OpenAI-compatible streaming completion endpoint.
//!
//! Wraps `POST {api_url}/chat/completions` using [`reqwest`]. Failures are
//! surfaced once to the caller; nothing here retries.

use crate::config::LlmConfig;
use crate::decoder::{decode_stream, DeltaStream};
use crate::error::LlmError;
use crate::messages::ChatCompletionRequest;

/// HTTP client for a single completion endpoint.
#[derive(Clone)]
pub struct CompletionApi {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl CompletionApi {
    /// Create a client.
    ///
    /// * `api_url` - Base URL, e.g. `https://api.openai.com/v1`.
    /// * `api_key` - Bearer token, if the endpoint requires one.
    pub fn new(api_url: String, api_key: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url, api_key)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(config.api_url.clone(), config.api_key.clone())
    }

    /// Whether a bearer token is configured.
    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    /// Start a streaming completion and return its delta stream.
    ///
    /// Resolves once response headers arrive. A non-2xx status becomes
    /// [`LlmError::Api`]; the body is then consumed lazily by the caller.
    pub async fn stream_chat(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<DeltaStream, LlmError> {
        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.api_url))
            .json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let response = Self::ensure_success(response).await?;

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Completion stream opened",
        );
        Ok(decode_stream(response.bytes_stream()))
    }

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or [`LlmError::Api`] with status and body text.
    pub async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}
