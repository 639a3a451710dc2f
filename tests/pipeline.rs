//! Integration tests for the streaming pipeline.
//!
//! Exercises the full parse/accumulate/notify path against in-memory chunk
//! sources, so no Ollama server is required.

use bytes::Bytes;
use futures_util::stream;
use quickcheck_macros::quickcheck;

use ollamachat::chat::consume_stream;
use ollamachat::streaming::{Accumulator, FragmentParser};
use ollamachat::types::GenerationRequest;
use ollamachat::{ChatError, StreamUpdate};

const THREE_LINE_STREAM: &str = concat!(
    "{\"response\":\"The\",\"done\":false}\n",
    "{\"response\":\" quick\",\"done\":false}\n",
    "{\"response\":\" fox\",\"done\":true}\n",
);

fn byte_chunks(parts: Vec<Vec<u8>>) -> impl futures_util::Stream<Item = ollamachat::Result<Bytes>> {
    stream::iter(parts.into_iter().map(|p| Ok(Bytes::from(p))))
}

/// Split `data` at the given cut points (normalized into range, sorted,
/// deduplicated) into consecutive chunks.
fn split_at(data: &[u8], cuts: &[usize]) -> Vec<Vec<u8>> {
    let mut points: Vec<usize> = cuts.iter().map(|c| c % (data.len() + 1)).collect();
    points.sort_unstable();
    points.dedup();

    let mut chunks = Vec::new();
    let mut start = 0;
    for point in points {
        if point > start {
            chunks.push(data[start..point].to_vec());
        }
        start = point;
    }
    if start < data.len() {
        chunks.push(data[start..].to_vec());
    }
    chunks
}

/// Chunk-boundary independence: however the transport cuts the byte stream,
/// the parser + accumulator converge to the same final text.
#[quickcheck]
fn prop_chunk_boundary_independence(cuts: Vec<usize>) -> bool {
    let data = THREE_LINE_STREAM.as_bytes();

    let mut parser = FragmentParser::new();
    let mut accumulator = Accumulator::new();
    for chunk in split_at(data, &cuts) {
        for fragment in parser.push(&chunk) {
            accumulator.apply(&fragment);
        }
    }
    if let Some(fragment) = parser.finish() {
        accumulator.apply(&fragment);
    }

    accumulator.text() == "The quick fox" && accumulator.is_done()
}

#[quickcheck]
fn prop_chunking_preserves_update_sequence(cuts: Vec<usize>) -> bool {
    let data = THREE_LINE_STREAM.as_bytes();
    let chunks = split_at(data, &cuts);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    let mut updates: Vec<StreamUpdate> = Vec::new();
    let text = runtime
        .block_on(consume_stream(byte_chunks(chunks), |u| {
            updates.push(u.clone())
        }))
        .unwrap();

    text == "The quick fox"
        && updates.len() == 3
        && updates.iter().filter(|u| u.done).count() == 1
        && updates.last().map(|u| u.done) == Some(true)
}

#[tokio::test]
async fn test_spec_example_two_line_stream() {
    let source = byte_chunks(vec![
        b"{\"response\":\"Hi\",\"done\":false}\n".to_vec(),
        b"{\"response\":\" there\",\"done\":true}\n".to_vec(),
    ]);

    let mut updates = Vec::new();
    let text = consume_stream(source, |u| updates.push(u.clone()))
        .await
        .unwrap();

    assert_eq!(text, "Hi there");
    assert_eq!(
        updates,
        vec![
            StreamUpdate {
                text: "Hi".into(),
                delta: "Hi".into(),
                done: false
            },
            StreamUpdate {
                text: "Hi there".into(),
                delta: " there".into(),
                done: true
            },
        ]
    );
}

#[tokio::test]
async fn test_chunk_boundary_mid_line_and_mid_char() {
    // One fragment whose line (with a multibyte char) is cut into three
    // chunks, the second cut landing inside the UTF-8 sequence for 'é'.
    let line = "{\"response\":\"caf\u{e9} au lait\",\"done\":true}\n".as_bytes();
    let e_acute = line.windows(2).position(|w| w == [0xC3, 0xA9]).unwrap();

    let source = byte_chunks(vec![
        line[..e_acute + 1].to_vec(),
        line[e_acute + 1..e_acute + 5].to_vec(),
        line[e_acute + 5..].to_vec(),
    ]);

    let text = consume_stream(source, |_| {}).await.unwrap();
    assert_eq!(text, "caf\u{e9} au lait");
}

#[tokio::test]
async fn test_malformed_line_does_not_change_result() {
    let clean = byte_chunks(vec![
        b"{\"response\":\"a\",\"done\":false}\n{\"response\":\"b\",\"done\":true}\n".to_vec(),
    ]);
    let with_garbage = byte_chunks(vec![
        b"{\"response\":\"a\",\"done\":false}\n{{{bad json\n{\"response\":\"b\",\"done\":true}\n"
            .to_vec(),
    ]);

    let clean_text = consume_stream(clean, |_| {}).await.unwrap();
    let garbage_text = consume_stream(with_garbage, |_| {}).await.unwrap();

    assert_eq!(clean_text, garbage_text);
    assert_eq!(clean_text, "ab");
}

#[tokio::test]
async fn test_premature_end_resolves_with_partial_answer() {
    let source = byte_chunks(vec![
        b"{\"response\":\"half an\",\"done\":false}\n".to_vec(),
        b"{\"response\":\" answer\",\"done\":false}\n".to_vec(),
    ]);

    let mut updates = Vec::new();
    let text = consume_stream(source, |u| updates.push(u.clone()))
        .await
        .unwrap();

    assert_eq!(text, "half an answer");
    assert_eq!(updates.iter().filter(|u| u.done).count(), 1);
    assert!(updates.last().unwrap().done);
}

#[tokio::test]
async fn test_transport_error_surfaces_status_and_reason() {
    let err = ChatError::HttpStatus {
        status: 500,
        reason: "Internal Server Error".to_string(),
    };

    let displayed = err.to_string();
    assert!(displayed.contains("500"));
    assert!(displayed.contains("Internal Server Error"));
    assert_eq!(err.user_message(), "Error: 500 - Internal Server Error");
}

#[test]
fn test_request_carries_exact_instruction_template() {
    let request = GenerationRequest::new("any-model", "hello");
    let body = serde_json::to_value(&request).unwrap();

    assert_eq!(body["prompt"], "### Instruction:\nhello\n### Response:");
    assert_eq!(body["model"], "any-model");
}
