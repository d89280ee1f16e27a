//! E2E Test Suite 03: Error Handling & Edge Cases
//!
//! Verifies that malformed input is reported through the error types and never
//! panics, reads out of bounds or writes past the caller's buffer.
//!
//! Coverage:
//! - Exhaustive single-bit flips and every truncation of real compressed blocks
//! - Output-buffer capacity errors on both sides
//! - Streaming decoder failure isolation
//! - Diagnostic logging of rejected blocks (set `RUST_LOG=lz4_block=debug`)

use lz4_block::{
    compress_bound, compress_default, decompress_safe, decompress_safe_partial,
    decompress_safe_using_dict, CompressError, DecompressError, StreamDecoder,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn compress_vec(src: &[u8]) -> Vec<u8> {
    let mut dst = vec![0u8; compress_bound(src.len())];
    let n = compress_default(src, &mut dst).expect("compression should succeed");
    dst.truncate(n);
    dst
}

fn corpus() -> Vec<Vec<u8>> {
    vec![
        vec![b'a'; 20],
        b"Hello, this is a test message for LZ4 compression!".to_vec(),
        b"abcabcabcabcabcabcabcabcabcabcabcabc-xyz".repeat(8),
        (0..600u32).map(|i| (i * i % 251) as u8).collect(),
    ]
}

// Extra capacity past `len` is filled with a canary and checked afterwards.
const CANARY: u8 = 0xA5;
const SLACK: usize = 64;

fn decode_guarded(block: &[u8], len: usize) -> Result<usize, DecompressError> {
    let mut buf = vec![CANARY; len + SLACK];
    let result = decompress_safe(block, &mut buf[..len]);
    assert!(
        buf[len..].iter().all(|&b| b == CANARY),
        "decoder wrote past the output buffer"
    );
    if let Ok(n) = result {
        assert!(n <= len);
    }
    result
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 1: corruption safety
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_single_bit_flips_never_panic() {
    init_tracing();
    for original in corpus() {
        let block = compress_vec(&original);
        for byte in 0..block.len() {
            for bit in 0..8 {
                let mut corrupted = block.clone();
                corrupted[byte] ^= 1 << bit;
                let _ = decode_guarded(&corrupted, original.len());
            }
        }
    }
}

#[test]
fn test_every_truncation_is_rejected_or_short() {
    init_tracing();
    for original in corpus() {
        let block = compress_vec(&original);
        for cut in 0..block.len() {
            let r = decode_guarded(&block[..cut], original.len());
            assert_ne!(r, Ok(original.len()), "truncated to {cut} bytes");
        }
    }
}

#[test]
fn test_garbage_input() {
    init_tracing();
    let garbage: Vec<u8> = (0..2_000u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8).collect();
    for len in [0usize, 1, 16, 100, 4_096] {
        let _ = decode_guarded(&garbage, len);
    }
}

#[test]
fn test_partial_decode_of_corrupt_block() {
    init_tracing();
    let original = b"partial corruption partial corruption partial corruption".repeat(4);
    let mut block = compress_vec(&original);
    let last = block.len() - 1;
    block[last / 2] ^= 0xFF;
    let mut dst = vec![CANARY; 64 + SLACK];
    let _ = decompress_safe_partial(&block, &mut dst[..64], 64);
    assert!(dst[64..].iter().all(|&b| b == CANARY));
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 2: capacity errors
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_decompress_dst_too_small() {
    let src = b"Hello, this is a test message for LZ4 compression!";
    let block = compress_vec(src);
    let mut dst = vec![0u8; 10];
    match decompress_safe(&block, &mut dst) {
        Err(DecompressError::MalformedStream) => {}
        other => panic!("expected Err(MalformedStream), got {other:?}"),
    }
}

#[test]
fn test_compress_dst_too_small() {
    let src = b"Hello, this is a test message for LZ4 compression!".repeat(4);
    let needed = compress_vec(&src).len();
    let mut dst = vec![0u8; needed - 1];
    assert_eq!(
        compress_default(&src, &mut dst),
        Err(CompressError::InsufficientOutputSpace)
    );
}

#[test]
fn test_empty_output_requires_empty_block() {
    assert_eq!(decompress_safe(&[0x00], &mut []), Ok(0));
    assert_eq!(
        decompress_safe(&[0x10, b'x'], &mut []),
        Err(DecompressError::MalformedStream)
    );
}

#[test]
fn test_dictionary_offset_checked() {
    // Match reaches three bytes back but only two exist (one literal + one of dict).
    let block = [0x16, b'a', 0x03, 0x00, 0x50, b'b', b'b', b'b', b'b', b'b'];
    let mut dst = [0u8; 16];
    assert_eq!(
        decompress_safe_using_dict(&block, &mut dst, b"z"),
        Err(DecompressError::MalformedStream)
    );
    assert_eq!(decompress_safe_using_dict(&block, &mut dst, b"yz"), Ok(16));
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 3: streaming failure isolation
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_stream_decoder_survives_bad_block() {
    init_tracing();
    let good = b"a block that decodes fine, a block that decodes fine".to_vec();
    let block = compress_vec(&good);

    let mut decoder = StreamDecoder::new();
    let mut out = vec![0u8; good.len()];
    assert_eq!(decoder.decompress(&block, &mut out), Ok(good.len()));
    let before = decoder.history_len();

    let mut corrupted = block.clone();
    corrupted.truncate(block.len() / 2);
    assert!(decoder.decompress(&corrupted, &mut out).is_err());
    assert_eq!(decoder.history_len(), before);

    assert_eq!(decoder.decompress(&block, &mut out), Ok(good.len()));
    assert_eq!(out, good);
    decoder.close();
}
