//! Streaming pipeline: HTTP dispatch, NDJSON fragment parsing, and answer
//! accumulation.

pub mod accumulator;
pub mod client;
pub mod parser;

pub use accumulator::Accumulator;
pub use client::{OllamaClient, DEFAULT_MODEL, DEFAULT_OLLAMA_URL};
pub use parser::FragmentParser;
