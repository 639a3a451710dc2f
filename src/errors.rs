//! Error types for the streaming chat pipeline.
//!
//! Transport problems are the only errors that fail a `send_message` call;
//! per-line decode failures are recovered inside the parser and never
//! surface here.

use thiserror::Error;

/// Main error type for the chat pipeline
#[derive(Error, Debug)]
pub enum ChatError {
    /// Server responded with a non-success HTTP status
    #[error("Ollama returned HTTP {status}: {reason}")]
    HttpStatus { status: u16, reason: String },

    /// Connection refused, DNS failure, or timeout before a response arrived
    #[error("Ollama server unreachable: {0}")]
    Unreachable(String),

    /// Transport failure while reading the response body
    #[error("Streaming error: {0}")]
    Streaming(String),

    /// HTTP client construction or request building failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, ChatError>;

impl ChatError {
    /// Single replacement string a chat UI shows in place of an assistant
    /// reply when a request fails. Status code and reason phrase are included
    /// when known.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::HttpStatus { status, reason } => {
                format!("Error: {} - {}", status, reason)
            }
            _ => "Error: Failed to connect to the Ollama server. Please try again later."
                .to_string(),
        }
    }
}
