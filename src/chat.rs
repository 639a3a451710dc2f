//! Orchestrator tying the pipeline together: rate limit, dispatch, parse,
//! accumulate, notify.

use std::sync::Arc;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tracing::debug;

use crate::errors::Result;
use crate::ratelimit::RateLimiter;
use crate::streaming::{Accumulator, FragmentParser, OllamaClient};
use crate::types::{GenerationRequest, StreamFragment, StreamUpdate};

/// High-level chat entry point.
///
/// Cheap to clone; every clone shares the one [`RateLimiter`], so requests
/// from concurrent callers are still spaced by the minimum interval. Each
/// `send_message` call owns its own accumulation state.
#[derive(Debug, Clone)]
pub struct ChatService {
    client: OllamaClient,
    limiter: Arc<RateLimiter>,
}

impl ChatService {
    /// Service against the default local endpoint
    pub fn new() -> Result<Self> {
        Ok(Self::with_client(OllamaClient::new()?))
    }

    pub fn with_client(client: OllamaClient) -> Self {
        Self {
            client,
            limiter: Arc::new(RateLimiter::new()),
        }
    }

    /// Send a prompt and resolve with the complete answer, discarding
    /// incremental updates.
    pub async fn send_message(&self, prompt: &str) -> Result<String> {
        self.send_message_with(prompt, |_| {}).await
    }

    /// Send a prompt, invoking `on_update` once per received fragment,
    /// strictly in arrival order, before the next fragment is processed.
    ///
    /// The final invocation (if any) carries `done = true` exactly once;
    /// an empty stream produces zero invocations. Callers are expected to
    /// reject empty prompts before calling; blank input is passed through
    /// unmodified.
    pub async fn send_message_with<F>(&self, prompt: &str, on_update: F) -> Result<String>
    where
        F: FnMut(&StreamUpdate),
    {
        self.limiter.acquire().await;

        let request = GenerationRequest::new(self.client.model(), prompt);
        let stream = self.client.generate_stream(&request).await?;

        consume_stream(stream, on_update).await
    }

    pub fn client(&self) -> &OllamaClient {
        &self.client
    }
}

/// Drive a byte stream through the parser and accumulator, notifying
/// `on_update` per fragment. Separated from [`ChatService`] so the loop can
/// run against any chunk source.
///
/// Terminates at the first `done = true` fragment, or at end of stream.
/// End of stream without an explicit done is an implicit completion: the
/// answer built so far is returned, with one trailing `done = true`
/// notification so consumers keying off the flag still settle.
pub async fn consume_stream<S, F>(stream: S, mut on_update: F) -> Result<String>
where
    S: Stream<Item = Result<Bytes>>,
    F: FnMut(&StreamUpdate),
{
    futures_util::pin_mut!(stream);

    let mut parser = FragmentParser::new();
    let mut accumulator = Accumulator::new();
    let mut notified = false;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        for fragment in parser.push(&chunk) {
            if deliver(&mut accumulator, &fragment, &mut on_update, &mut notified) {
                debug!(chars = accumulator.text().len(), "generation complete");
                return Ok(accumulator.into_text());
            }
        }
    }

    // Stream ended without done=true; decode any unterminated last line,
    // then settle with whatever was accumulated.
    if let Some(fragment) = parser.finish() {
        if deliver(&mut accumulator, &fragment, &mut on_update, &mut notified) {
            return Ok(accumulator.into_text());
        }
    }

    if notified {
        on_update(&StreamUpdate {
            text: accumulator.text().to_string(),
            delta: String::new(),
            done: true,
        });
    }
    debug!(
        chars = accumulator.text().len(),
        "stream ended without done signal, treating as complete"
    );
    Ok(accumulator.into_text())
}

/// Apply one fragment and notify. Returns true when the fragment was
/// terminal.
fn deliver<F>(
    accumulator: &mut Accumulator,
    fragment: &StreamFragment,
    on_update: &mut F,
    notified: &mut bool,
) -> bool
where
    F: FnMut(&StreamUpdate),
{
    let update = accumulator.apply(fragment);
    let done = update.done;
    on_update(&update);
    *notified = true;
    done
}
