//! Wire types and the update callback payload.
//!
//! Field names follow Ollama's native `/api/generate` streaming protocol:
//! requests carry `model` + `prompt`, each response line carries `response`
//! + `done`.

use serde::{Deserialize, Serialize};

/// Instruction framing placed around every user prompt before transmission.
/// The model was tuned against this exact literal wrapper, so it must be
/// reproduced byte-for-byte.
pub const INSTRUCTION_PREFIX: &str = "### Instruction:\n";
pub const RESPONSE_SUFFIX: &str = "\n### Response:";

/// JSON body of a generation request
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
}

impl GenerationRequest {
    /// Build a request from a raw user message, applying the instruction
    /// template.
    pub fn new(model: &str, user_prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            prompt: format!("{}{}{}", INSTRUCTION_PREFIX, user_prompt, RESPONSE_SUFFIX),
        }
    }
}

/// One decoded line of the streamed response body.
///
/// Ollama emits extra fields (`model`, `created_at`, final-line statistics);
/// anything beyond `response` and `done` is ignored rather than rejected,
/// and both expected fields are defaulted so a sparse line still decodes.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamFragment {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub done: bool,
}

/// Payload of one incremental update callback invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamUpdate {
    /// Full answer text accumulated so far
    pub text: String,
    /// Text carried by the latest fragment, verbatim
    pub delta: String,
    /// True exactly once, on the final update of a reply
    pub done: bool,
}
