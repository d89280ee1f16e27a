//! E2E Test Suite 02: Block Streaming API
//!
//! Tests dependent-block compression and decompression (StreamEncoder /
//! StreamDecoder).  Validates that:
//! - Blocks decoded in order reproduce the concatenated plaintext
//! - Later blocks actually reference earlier ones
//! - Dictionaries prime both sides identically
//! - History wraps correctly once more than 64 KiB has streamed through
//! - Independent streams run concurrently without interfering

use lz4_block::{
    compress_bound, compress_default, decompress_safe, decompress_safe_using_dict, StreamDecoder,
    StreamEncoder, WINDOW_SIZE,
};
use rayon::prelude::*;

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn encode_blocks(encoder: &mut StreamEncoder, chunks: &[&[u8]]) -> Vec<Vec<u8>> {
    chunks
        .iter()
        .map(|chunk| {
            let mut compressed = vec![0u8; compress_bound(chunk.len())];
            let n = encoder
                .compress_continue(chunk, &mut compressed)
                .expect("streaming compression failed");
            compressed.truncate(n);
            compressed
        })
        .collect()
}

fn decode_blocks(decoder: &mut StreamDecoder, blocks: &[Vec<u8>], sizes: &[usize]) -> Vec<u8> {
    let mut plain = Vec::new();
    for (block, &size) in blocks.iter().zip(sizes) {
        let mut out = vec![0u8; size];
        let n = decoder
            .decompress(block, &mut out)
            .expect("streaming decompression failed");
        assert_eq!(n, size);
        plain.extend_from_slice(&out);
    }
    plain
}

fn log_lines(count: usize) -> Vec<u8> {
    let mut text = Vec::new();
    for i in 0..count {
        text.extend_from_slice(
            format!(
                "2026-10-18T12:{:02}:{:02}Z INFO worker-{} request completed status=200 bytes={}\n",
                (i / 60) % 60,
                i % 60,
                i % 7,
                (i * 7_919) % 100_000
            )
            .as_bytes(),
        );
    }
    text
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: two dependent blocks (streaming equivalence)
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_two_dependent_blocks() {
    let first = b"The quick brown fox jumps over the lazy dog. ".repeat(10);
    let second = b"The quick brown fox jumps over the lazy cat. ".repeat(10);

    let mut encoder = StreamEncoder::new();
    let blocks = encode_blocks(&mut encoder, &[first.as_slice(), second.as_slice()]);

    let mut decoder = StreamDecoder::new();
    let plain = decode_blocks(&mut decoder, &blocks, &[first.len(), second.len()]);
    decoder.close();

    let mut expected = first.clone();
    expected.extend_from_slice(&second);
    assert_eq!(plain, expected);
}

#[test]
fn test_second_block_depends_on_first() {
    let block = log_lines(40);
    let mut encoder = StreamEncoder::new();
    let blocks = encode_blocks(&mut encoder, &[block.as_slice(), block.as_slice()]);
    assert!(blocks[1].len() < blocks[0].len() / 4);

    // Without the history the second block cannot be decoded.
    let mut out = vec![0u8; block.len()];
    assert!(decompress_safe(&blocks[1], &mut out).is_err());
    // With the first block supplied as a dictionary it can.
    assert_eq!(
        decompress_safe_using_dict(&blocks[1], &mut out, &block),
        Ok(block.len())
    );
    assert_eq!(out, block);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: many blocks, history wraps
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_long_stream_wraps_history() {
    let text = log_lines(6_000);
    assert!(text.len() > 4 * WINDOW_SIZE);
    let chunks: Vec<&[u8]> = text.chunks(7_777).collect();
    let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();

    let mut encoder = StreamEncoder::new();
    let blocks = encode_blocks(&mut encoder, &chunks);

    let mut decoder = StreamDecoder::new();
    let plain = decode_blocks(&mut decoder, &blocks, &sizes);
    assert_eq!(plain, text);
    assert_eq!(decoder.history_len(), WINDOW_SIZE);
}

#[test]
fn test_streaming_beats_independent_blocks() {
    let text = log_lines(2_000);
    let chunks: Vec<&[u8]> = text.chunks(1_024).collect();

    let mut encoder = StreamEncoder::new();
    let streamed: usize = encode_blocks(&mut encoder, &chunks)
        .iter()
        .map(Vec::len)
        .sum();

    let independent: usize = chunks
        .iter()
        .map(|chunk| {
            let mut dst = vec![0u8; compress_bound(chunk.len())];
            compress_default(chunk, &mut dst).unwrap()
        })
        .sum();

    assert!(streamed < independent, "{streamed} vs {independent}");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: dictionaries
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_dictionary_primed_stream() {
    let dict = log_lines(300);
    let messages = log_lines(320);
    let tail = &messages[dict.len()..];
    let chunks: Vec<&[u8]> = tail.chunks(500).collect();
    let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();

    let mut encoder = StreamEncoder::new();
    encoder.load_dict(&dict);
    let blocks = encode_blocks(&mut encoder, &chunks);

    let mut decoder = StreamDecoder::new();
    decoder.set_dictionary(&dict);
    assert!(decoder.is_primed());
    let plain = decode_blocks(&mut decoder, &blocks, &sizes);
    assert_eq!(plain, tail);
}

#[test]
fn test_reset_restarts_stream() {
    let message = log_lines(50);
    let mut encoder = StreamEncoder::new();
    let first = encode_blocks(&mut encoder, &[message.as_slice()]);
    encoder.reset();
    let again = encode_blocks(&mut encoder, &[message.as_slice()]);
    assert_eq!(first, again);

    // A fresh decoder handles the restarted stream.
    let mut decoder = StreamDecoder::new();
    assert_eq!(decode_blocks(&mut decoder, &again, &[message.len()]), message);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: independent streams in parallel
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_parallel_streams_are_independent() {
    let results: Vec<bool> = (0..16u64)
        .into_par_iter()
        .map(|seed| {
            let text = log_lines(200 + seed as usize * 37);
            let chunks: Vec<&[u8]> = text.chunks(1_000 + seed as usize * 13).collect();
            let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();

            let mut encoder = StreamEncoder::with_acceleration(1 + seed as i32);
            let blocks = encode_blocks(&mut encoder, &chunks);
            let mut decoder = StreamDecoder::new();
            decode_blocks(&mut decoder, &blocks, &sizes) == text
        })
        .collect();
    assert!(results.into_iter().all(|ok| ok));
}
