//! Incremental NDJSON fragment parser.
//!
//! The transport hands over byte chunks whose boundaries need not align
//! with line boundaries (or even UTF-8 character boundaries), so the parser
//! buffers the trailing incomplete line of every chunk and prepends it to
//! the next. Each complete line is one JSON fragment of model output.

use tracing::warn;

use crate::types::StreamFragment;

/// Splits raw streamed bytes into decoded [`StreamFragment`]s.
#[derive(Debug, Default)]
pub struct FragmentParser {
    /// Trailing partial line awaiting the rest of its bytes
    pending: Vec<u8>,
}

impl FragmentParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw chunk, returning every fragment whose line completed.
    ///
    /// A line that fails to decode is dropped and processing continues;
    /// one malformed line never aborts the stream.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamFragment> {
        self.pending.extend_from_slice(chunk);

        let mut fragments = Vec::new();

        // Everything before the last '\n' is complete; the remainder waits
        // for the next chunk.
        let Some(last_newline) = self.pending.iter().rposition(|&b| b == b'\n') else {
            return fragments;
        };
        let rest = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, rest);

        for line in complete.split(|&b| b == b'\n') {
            if let Some(fragment) = decode_line(line) {
                fragments.push(fragment);
            }
        }

        fragments
    }

    /// Flush the buffered partial line at end of stream.
    ///
    /// A server that omits the final newline still gets its last fragment
    /// decoded; garbage is dropped the same as any malformed line.
    pub fn finish(&mut self) -> Option<StreamFragment> {
        let line = std::mem::take(&mut self.pending);
        decode_line(&line)
    }

    /// Bytes of the retained incomplete line
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

fn decode_line(line: &[u8]) -> Option<StreamFragment> {
    let trimmed = trim_ascii(line);
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_slice::<StreamFragment>(trimmed) {
        Ok(fragment) => Some(fragment),
        Err(e) => {
            warn!(
                error = %e,
                line = %String::from_utf8_lossy(trimmed),
                "skipping undecodable stream line"
            );
            None
        }
    }
}

// Strips '\r' from CRLF transports along with surrounding whitespace.
fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}
