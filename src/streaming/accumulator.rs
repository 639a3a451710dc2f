//! Running answer accumulation for one in-flight request.

use crate::types::{StreamFragment, StreamUpdate};

/// Concatenates fragment text in arrival order. One accumulator per
/// `send_message` call; never shared between concurrent calls.
#[derive(Debug, Default)]
pub struct Accumulator {
    text: String,
    done: bool,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one fragment and produce the corresponding update.
    ///
    /// Pure append: the fragment text is preserved verbatim, whitespace
    /// included, since model output is sensitive to it.
    pub fn apply(&mut self, fragment: &StreamFragment) -> StreamUpdate {
        self.text.push_str(&fragment.response);
        if fragment.done {
            self.done = true;
        }

        StreamUpdate {
            text: self.text.clone(),
            delta: fragment.response.clone(),
            done: fragment.done,
        }
    }

    /// Full text accumulated so far
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether a terminal fragment has been applied
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Consume the accumulator, yielding the final answer text
    pub fn into_text(self) -> String {
        self.text
    }
}
