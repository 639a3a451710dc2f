//! Ollama API streaming client
//!
//! Issues the generation request and exposes the response body as an
//! incrementally readable byte stream, chunk by chunk, rather than
//! buffering it: long generations can take many seconds to finish and the
//! caller renders tokens as they arrive.

use bytes::Bytes;
use futures_util::StreamExt;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::errors::{ChatError, Result};
use crate::types::GenerationRequest;

/// Default Ollama API endpoint
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default model
pub const DEFAULT_MODEL: &str = "hf.co/Guru322/Gurus-text-model:latest";

/// Time allowed for the connection to be established. Deliberately not a
/// whole-request timeout: the streamed body is open-ended.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Ollama streaming client
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// Create a client against the default local endpoint and model
    pub fn new() -> Result<Self> {
        Self::with_config(DEFAULT_OLLAMA_URL, DEFAULT_MODEL)
    }

    /// Create a client with a custom endpoint and model
    pub fn with_config(base_url: &str, model: &str) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(ChatError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// POST the request to `/api/generate` and return the body as a stream
    /// of raw byte chunks.
    ///
    /// Fails with [`ChatError::Unreachable`] when the server cannot be
    /// reached and [`ChatError::HttpStatus`] on a non-success status; both
    /// carry a message fit for direct display to the user.
    pub async fn generate_stream(
        &self,
        request: &GenerationRequest,
    ) -> Result<impl futures_util::Stream<Item = Result<Bytes>>> {
        let url = format!("{}/api/generate", self.base_url);
        debug!(model = %request.model, "dispatching generation request");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ChatError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::HttpStatus {
                status: status.as_u16(),
                reason: status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            });
        }

        let stream = response
            .bytes_stream()
            .map(|result| result.map_err(|e| ChatError::Streaming(e.to_string())));

        Ok(stream)
    }

    /// Check if the Ollama server is reachable
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/api/version", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Model identifier sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Base URL of the target server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
