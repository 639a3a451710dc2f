//! ollamachat - streamed chat with a local Ollama model
//!
//! The logic-bearing core is the streaming response pipeline:
//!
//! - **[`ratelimit`]**: minimum spacing between outbound request starts
//! - **[`streaming`]**: HTTP dispatch, NDJSON fragment parsing, answer
//!   accumulation
//! - **[`chat`]**: the `send_message` orchestrator driving the incremental
//!   update callback
//!
//! The terminal UI in `main.rs` is just one consumer of the callback
//! contract; the library carries no rendering concerns.

pub mod chat;
pub mod config;
pub mod errors;
pub mod ratelimit;
pub mod streaming;
pub mod types;

// Re-export commonly used types
pub use chat::ChatService;
pub use errors::{ChatError, Result};
pub use ratelimit::RateLimiter;
pub use types::{GenerationRequest, StreamFragment, StreamUpdate};
